//! Compile error types.
//!
//! Every stage of the pipeline reports failure through [`CompileError`];
//! the [`ErrorKind`] tells callers which stage rejected the input.

use crate::{SourceMap, SourcePosition};
use std::fmt;

/// The kind of compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognised token, or a token run that does not fit a construct's grammar
    SyntaxError,
    /// A grammar combinator rule was violated (or is itself ambiguous)
    MatchError,
    /// A symbol or type name is not bound in any enclosing scope
    ReferenceError,
    /// A value has a shape the code generator cannot materialize
    TypeError,
    /// A literal does not fit the storage it is lowered into
    RangeError,
    /// The assembler rejected the instruction list
    AssemblyError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::MatchError => "MatchError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::AssemblyError => "AssemblyError",
        };
        f.write_str(name)
    }
}

/// A structured compile error.
///
/// # Examples
///
/// ```
/// use core_types::{CompileError, ErrorKind, SourcePosition};
///
/// let error = CompileError::new(ErrorKind::ReferenceError, "Reference to unknown symbol `x`")
///     .at(SourcePosition::new("main", 4, 1));
///
/// assert_eq!(error.kind, ErrorKind::ReferenceError);
/// assert_eq!(error.to_string(), "ReferenceError: Reference to unknown symbol `x`");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Where the error originated, when a single token is to blame
    pub position: Option<SourcePosition>,
    /// Name of the construct whose grammar rejected the input
    pub construct: Option<String>,
    /// Positions of the offending token run
    pub tokens: Vec<SourcePosition>,
}

impl CompileError {
    /// Create an error without any location information
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            construct: None,
            tokens: Vec::new(),
        }
    }

    /// Attach the position of the token that caused the error
    pub fn at(mut self, position: SourcePosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Attach the construct kind that failed to match
    pub fn in_construct(mut self, construct: impl Into<String>) -> Self {
        self.construct = Some(construct.into());
        self
    }

    /// Attach the offending token run
    pub fn with_tokens(mut self, tokens: Vec<SourcePosition>) -> Self {
        if self.position.is_none() {
            self.position = tokens.first().cloned();
        }
        self.tokens = tokens;
        self
    }

    /// Render the offending source line, if the origin is known to `sources`
    pub fn snippet(&self, sources: &SourceMap) -> Option<String> {
        self.position.as_ref().and_then(|pos| sources.snippet(pos))
    }
}

/// Result alias used across the compiler
pub type CompileResult<T> = Result<T, CompileError>;
