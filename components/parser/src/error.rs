//! Parser error types and helpers

use crate::ast::ConstructKind;
use crate::lexer::Token;
use core_types::{CompileError, ErrorKind, SourcePosition};

/// Create a syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: Option<SourcePosition>) -> CompileError {
    let error = CompileError::new(ErrorKind::SyntaxError, message);
    match position {
        Some(pos) => error.at(pos),
        None => error,
    }
}

/// Create a lexer error for text no token predicate accepts
pub fn unrecognised_token(text: &str, position: SourcePosition) -> CompileError {
    syntax_error(format!("Token `{}` wasn't recognised", text), Some(position))
}

/// Create a syntax error for a token run a construct's grammar rejected
pub fn invalid_syntax(kind: ConstructKind, tokens: &[Token]) -> CompileError {
    CompileError::new(ErrorKind::SyntaxError, format!("Invalid Syntax - {}", kind))
        .in_construct(kind.to_string())
        .with_tokens(positions(tokens))
}

/// Create a syntax error for a construct, with a custom message
pub fn construct_error(kind: ConstructKind, message: impl Into<String>, tokens: &[Token]) -> CompileError {
    CompileError::new(ErrorKind::SyntaxError, message)
        .in_construct(kind.to_string())
        .with_tokens(positions(tokens))
}

/// Create a combinator match error
pub fn match_error(message: impl Into<String>, tokens: &[Token]) -> CompileError {
    CompileError::new(ErrorKind::MatchError, message).with_tokens(positions(tokens))
}

/// Create an unexpected token error
pub fn unexpected_token(expected: &str, got: &Token) -> CompileError {
    let shown = if got.source.is_empty() {
        got.kind.to_string()
    } else {
        format!("`{}`", got.source)
    };
    syntax_error(format!("Expected {}, got {}", expected, shown), Some(got.position()))
}

/// Create an unexpected end of input error
pub fn unexpected_eof(kind: ConstructKind, tokens: &[Token]) -> CompileError {
    construct_error(kind, "Unexpected end of input", tokens)
}

fn located(kind: ErrorKind, message: impl Into<String>, token: Option<&Token>) -> CompileError {
    let error = CompileError::new(kind, message);
    match token {
        Some(t) => error.at(t.position()),
        None => error,
    }
}

/// Create a reference error for an unbound name
pub fn reference_error(message: impl Into<String>, token: Option<&Token>) -> CompileError {
    located(ErrorKind::ReferenceError, message, token)
}

/// Create a type error for a value the generator cannot lower
pub fn type_error(message: impl Into<String>, token: Option<&Token>) -> CompileError {
    located(ErrorKind::TypeError, message, token)
}

/// Create a range error for a literal that does not fit its storage
pub fn range_error(message: impl Into<String>, token: &Token) -> CompileError {
    located(ErrorKind::RangeError, message, Some(token))
}

/// Positions of a token run
pub fn positions(tokens: &[Token]) -> Vec<SourcePosition> {
    tokens.iter().map(Token::position).collect()
}
