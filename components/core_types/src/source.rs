//! Source positions and the origin → source text map used for diagnostics.
//!
//! Positions count characters (not bytes) from the start of the source the
//! token was lexed from. The [`SourceMap`] is only consulted when an error
//! is rendered; compilation never depends on it.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Represents a position in source code.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition::new("main.fn", 12, 3);
///
/// assert_eq!(pos.offset, 12);
/// assert_eq!(&*pos.origin, "main.fn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourcePosition {
    /// Identifier of the source the position belongs to (usually a path)
    pub origin: Arc<str>,
    /// Character offset from the start of the source
    pub offset: usize,
    /// Length of the spanned text in characters
    pub length: usize,
}

impl SourcePosition {
    /// Create a new source position
    pub fn new(origin: impl Into<Arc<str>>, offset: usize, length: usize) -> Self {
        Self {
            origin: origin.into(),
            offset,
            length,
        }
    }
}

/// Origin id → original source text.
///
/// Owned by a single compiler session rather than shared process-wide, so
/// compiling several units in one process cannot leak sources between them.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    sources: HashMap<Arc<str>, String>,
}

impl SourceMap {
    /// Create an empty source map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the source text for an origin
    pub fn insert(&mut self, origin: impl Into<Arc<str>>, source: impl Into<String>) {
        self.sources.insert(origin.into(), source.into());
    }

    /// Look up the source text of an origin
    pub fn get(&self, origin: &str) -> Option<&str> {
        self.sources.get(origin).map(String::as_str)
    }

    /// Take over every source registered in `other`
    pub fn merge(&mut self, other: SourceMap) {
        self.sources.extend(other.sources);
    }

    /// Number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when no source has been registered
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// 1-based line number of a position, if its origin is known
    pub fn line_number(&self, position: &SourcePosition) -> Option<usize> {
        let source = self.get(&position.origin)?;
        let newlines = source
            .chars()
            .take(position.offset)
            .filter(|c| *c == '\n')
            .count();
        Some(newlines + 1)
    }

    /// Render the line containing `position` as `"  n | text"`.
    ///
    /// Returns `None` when the origin was never registered.
    pub fn snippet(&self, position: &SourcePosition) -> Option<String> {
        let source = self.get(&position.origin)?;
        let line_number = self.line_number(position)?;
        let line = source
            .split('\n')
            .nth(line_number - 1)
            .unwrap_or_default()
            .trim_end_matches('\r');

        Some(format!("{:>3} | {}", line_number, line))
    }
}
