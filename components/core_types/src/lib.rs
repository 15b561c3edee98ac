//! Core error and source-location types for the script compiler.
//!
//! This crate provides the foundational types shared by every stage of the
//! pipeline: structured compile errors and source location tracking.
//!
//! # Overview
//!
//! - [`CompileError`] - Structured error with kind, message and location
//! - [`ErrorKind`] - Which stage rejected the input
//! - [`SourcePosition`] - Character offset inside a named source
//! - [`SourceMap`] - Origin → source text, used to render snippets
//!
//! # Examples
//!
//! ```
//! use core_types::{CompileError, ErrorKind, SourceMap, SourcePosition};
//!
//! let mut sources = SourceMap::new();
//! sources.insert("main", "a ~ b");
//!
//! let error = CompileError::new(ErrorKind::SyntaxError, "Token `~` wasn't recognised")
//!     .at(SourcePosition::new("main", 2, 1));
//!
//! assert_eq!(error.snippet(&sources).as_deref(), Some("  1 | a ~ b"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{CompileError, CompileResult, ErrorKind};
pub use source::{SourceMap, SourcePosition};
