//! Lexical symbol and type resolution
//!
//! A [`Context`] maps names to value pointers and type names to value
//! kinds, and borrows the context it is nested in. Lookups walk toward the
//! root; a name missing from the whole chain is a reference error.

use crate::error::reference_error;
use crate::lexer::Token;
use bytecode_system::{ValueKind, ValuePointer};
use core_types::CompileResult;
use std::collections::HashMap;

/// One scope in the context chain
#[derive(Debug, Clone)]
pub struct Context<'p> {
    scope: HashMap<String, ValuePointer>,
    types: HashMap<String, ValueKind>,
    parent: Option<&'p Context<'p>>,
}

impl Context<'static> {
    /// Root context binding every built-in type name
    pub fn root() -> Self {
        ValueKind::all()
            .into_iter()
            .fold(ContextBuilder::new(), |builder, kind| {
                builder.type_alias(kind.type_name(), kind)
            })
            .build()
    }
}

impl<'p> Context<'p> {
    /// Number of enclosing contexts
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    fn ancestors(&self) -> impl Iterator<Item = &Context<'p>> {
        std::iter::successors(Some(self), |ctx| ctx.parent)
    }

    /// Nearest binding of `name`
    pub fn lookup_symbol(&self, name: &str) -> Option<&ValuePointer> {
        self.ancestors().find_map(|ctx| ctx.scope.get(name))
    }

    /// Nearest definition of the type `name`
    pub fn lookup_type(&self, name: &str) -> Option<ValueKind> {
        self.ancestors().find_map(|ctx| ctx.types.get(name).copied())
    }

    /// Resolve a (possibly dot-joined) symbol name, blaming `token` on failure
    pub fn resolve_name(&self, name: &str, token: Option<&Token>) -> CompileResult<&ValuePointer> {
        self.lookup_symbol(name).ok_or_else(|| {
            reference_error(format!("Reference to unknown symbol `{}`.", name), token)
        })
    }

    /// Resolve an identifier token to its value pointer
    pub fn resolve_symbol(&self, token: &Token) -> CompileResult<&ValuePointer> {
        self.resolve_name(&token.source, Some(token))
    }

    /// Resolve a type name token to its value kind
    pub fn resolve_type(&self, token: &Token) -> CompileResult<ValueKind> {
        self.lookup_type(&token.source).ok_or_else(|| {
            reference_error(
                format!("Reference to unknown type `{}`.", token.source),
                Some(token),
            )
        })
    }
}

/// Collects bindings for a new context
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    scope: HashMap<String, ValuePointer>,
    types: HashMap<String, ValueKind>,
}

impl ContextBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a symbol; a later binding of the same name replaces it
    pub fn symbol(mut self, name: impl Into<String>, pointer: ValuePointer) -> Self {
        self.scope.insert(name.into(), pointer);
        self
    }

    /// Bind a type name
    pub fn type_alias(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.types.insert(name.into(), kind);
        self
    }

    /// Finish as a root context
    pub fn build(self) -> Context<'static> {
        Context {
            scope: self.scope,
            types: self.types,
            parent: None,
        }
    }

    /// Finish as a child of `parent`
    pub fn build_child<'p>(self, parent: &'p Context<'p>) -> Context<'p> {
        Context {
            scope: self.scope,
            types: self.types,
            parent: Some(parent),
        }
    }
}
