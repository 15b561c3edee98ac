//! Import resolution
//!
//! The code generator asks a [`ModuleResolver`] for the source text behind
//! each import specifier, then parses it under the specifier as origin.
//! Loading scripts from disk is left to the embedder.

use std::collections::HashMap;
use tracing::debug;

/// Source of imported scripts
pub trait ModuleResolver {
    /// Source text of the script named by `specifier` (quotes already
    /// removed), or `None` when the module is unknown.
    ///
    /// Unknown modules compile as empty scripts.
    fn source(&self, specifier: &str) -> Option<String>;
}

/// Knows no modules, so every import resolves to an empty script
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyModuleResolver;

impl ModuleResolver for EmptyModuleResolver {
    fn source(&self, _specifier: &str) -> Option<String> {
        None
    }
}

/// Resolves imports from in-memory sources
#[derive(Debug, Clone, Default)]
pub struct MapModuleResolver {
    sources: HashMap<String, String>,
}

impl MapModuleResolver {
    /// Empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source text of `specifier`
    pub fn with_module(mut self, specifier: impl Into<String>, source: impl Into<String>) -> Self {
        self.sources.insert(specifier.into(), source.into());
        self
    }
}

impl ModuleResolver for MapModuleResolver {
    fn source(&self, specifier: &str) -> Option<String> {
        let source = self.sources.get(specifier)?;
        debug!(specifier, "resolving module from memory");
        Some(source.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resolver() {
        assert_eq!(EmptyModuleResolver.source("io"), None);
    }

    #[test]
    fn test_map_resolver_source() {
        let resolver = MapModuleResolver::new().with_module("io", "println_out(s) => s");
        assert_eq!(resolver.source("io").as_deref(), Some("println_out(s) => s"));
        assert_eq!(resolver.source("missing"), None);
    }
}
