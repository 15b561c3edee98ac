//! Unit tests for CompileError and ErrorKind

use core_types::{CompileError, ErrorKind, SourceMap, SourcePosition};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_equality() {
        assert_eq!(ErrorKind::SyntaxError, ErrorKind::SyntaxError);
        assert_ne!(ErrorKind::SyntaxError, ErrorKind::MatchError);
    }

    #[test]
    fn test_error_kind_display_names() {
        assert_eq!(ErrorKind::TypeError.to_string(), "TypeError");
        assert_eq!(ErrorKind::RangeError.to_string(), "RangeError");
    }
}

#[cfg(test)]
mod compile_error_tests {
    use super::*;

    #[test]
    fn test_compile_error_minimal() {
        let error = CompileError::new(ErrorKind::SyntaxError, "oops");
        assert_eq!(error.kind, ErrorKind::SyntaxError);
        assert_eq!(error.message, "oops");
        assert!(error.position.is_none());
        assert!(error.construct.is_none());
        assert!(error.tokens.is_empty());
    }

    #[test]
    fn test_compile_error_display() {
        let error = CompileError::new(ErrorKind::MatchError, "Token Sequence does not match pattern");
        assert_eq!(
            error.to_string(),
            "MatchError: Token Sequence does not match pattern"
        );
    }

    #[test]
    fn test_compile_error_builder_chain() {
        let error = CompileError::new(ErrorKind::SyntaxError, "Invalid Syntax - Call")
            .in_construct("Call")
            .with_tokens(vec![SourcePosition::new("main", 7, 1)]);
        assert_eq!(error.construct.as_deref(), Some("Call"));
        assert_eq!(error.position, Some(SourcePosition::new("main", 7, 1)));
    }

    #[test]
    fn test_with_tokens_keeps_explicit_position() {
        let error = CompileError::new(ErrorKind::SyntaxError, "x")
            .at(SourcePosition::new("main", 1, 1))
            .with_tokens(vec![SourcePosition::new("main", 9, 1)]);
        assert_eq!(error.position.unwrap().offset, 1);
    }

    #[test]
    fn test_compile_error_is_std_error() {
        let error: Box<dyn std::error::Error> =
            Box::new(CompileError::new(ErrorKind::ReferenceError, "missing"));
        assert!(error.to_string().contains("ReferenceError"));
    }

    #[test]
    fn test_snippet_without_position() {
        let error = CompileError::new(ErrorKind::SyntaxError, "x");
        assert!(error.snippet(&SourceMap::new()).is_none());
    }
}
