//! Compilation session
//!
//! [`Compiler`] runs the whole pipeline for one source text: lex, parse,
//! generate, flatten and assemble. It keeps every compiled source in a
//! [`SourceMap`] so errors can be rendered with their source line.

use crate::ast::ScriptRoot;
use crate::bytecode_gen::BytecodeGenerator;
use crate::lexer::{lex, Token};
use crate::parser::Parser;
use crate::resolver::{EmptyModuleResolver, ModuleResolver};
use bytecode_system::{Assembler, BytecodeChunk, ListingAssembler};
use core_types::{CompileResult, SourceMap};
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// Every stage of one pipeline run
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Normalized token stream
    pub tokens: Vec<Token>,
    /// Parsed script
    pub script: ScriptRoot,
    /// Flattened instruction list
    pub chunk: BytecodeChunk,
}

/// Compiler session
pub struct Compiler {
    sources: SourceMap,
    resolver: Rc<dyn ModuleResolver>,
    assembler: Box<dyn Assembler>,
}

impl Compiler {
    /// Session with empty imports and the listing assembler
    pub fn new() -> Self {
        Self {
            sources: SourceMap::new(),
            resolver: Rc::new(EmptyModuleResolver),
            assembler: Box::new(ListingAssembler::new()),
        }
    }

    /// Resolve imports through `resolver`
    pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.resolver = Rc::new(resolver);
        self
    }

    /// Assemble with `assembler`
    pub fn with_assembler(mut self, assembler: impl Assembler + 'static) -> Self {
        self.assembler = Box::new(assembler);
        self
    }

    /// Every source compiled in this session
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Run the pipeline once, keeping every stage
    ///
    /// Imported module sources join the session's [`SourceMap`] whether or
    /// not generation succeeds, so errors inside an import render a snippet.
    pub fn run(&mut self, source: &str, origin: &str) -> CompileResult<Compilation> {
        let origin: Arc<str> = Arc::from(origin);
        self.sources.insert(origin.clone(), source);

        let tokens = lex(source, origin.clone())?;
        debug!(origin = %origin, tokens = tokens.len(), "lexed");

        let parser = Parser::new(tokens);
        let script = parser.parse_script()?;
        debug!(origin = %origin, statements = script.statements.len(), "parsed");

        let mut generator = BytecodeGenerator::with_resolver(Rc::clone(&self.resolver));
        let chunk = generator.generate(&script);
        self.sources.merge(generator.into_sources());
        debug!(sources = self.sources.len(), "sources recorded");

        Ok(Compilation {
            tokens: parser.into_tokens(),
            script,
            chunk: chunk?,
        })
    }

    /// Compile `source` up to the flattened instruction list
    pub fn instructions(&mut self, source: &str, origin: &str) -> CompileResult<BytecodeChunk> {
        Ok(self.run(source, origin)?.chunk)
    }

    /// Assemble an already generated chunk
    pub fn assemble(&self, chunk: &BytecodeChunk) -> CompileResult<Vec<u8>> {
        let binary = self.assembler.assemble(chunk)?;
        debug!(bytes = binary.len(), "assembled");
        Ok(binary)
    }

    /// Compile `source` to an assembled binary
    pub fn compile(&mut self, source: &str, origin: &str) -> CompileResult<Vec<u8>> {
        let chunk = self.instructions(source, origin)?;
        self.assemble(&chunk)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile `source` with a fresh default session
pub fn compile(source: &str, origin: &str) -> CompileResult<Vec<u8>> {
    Compiler::new().compile(source, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MapModuleResolver;
    use core_types::ErrorKind;

    #[test]
    fn test_compile_listing() {
        let binary = compile("id(x) => x\nid(1)", "main").unwrap();
        let text = String::from_utf8(binary).unwrap();
        assert!(text.starts_with("::fn-0\n"));
        assert!(text.ends_with("    jump %0\n"));
    }

    #[test]
    fn test_sources_are_recorded() {
        let mut compiler = Compiler::new();
        let err = compiler.compile("x + ~", "main").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert_eq!(compiler.sources().get("main"), Some("x + ~"));
        assert_eq!(err.snippet(compiler.sources()).unwrap(), "  1 | x + ~");
    }

    #[test]
    fn test_labels_restart_per_compile() {
        let mut compiler = Compiler::new();
        let first = compiler.instructions("f(x) => x", "a").unwrap();
        let second = compiler.instructions("g(x) => x", "b").unwrap();
        assert_eq!(first.labels(), second.labels());
    }

    #[test]
    fn test_with_resolver() {
        let mut compiler =
            Compiler::new().with_resolver(MapModuleResolver::new().with_module("io", "println_out(s) => s"));
        let chunk = compiler
            .instructions("import 'io'\nio.println_out('hi')", "main")
            .unwrap();
        assert_eq!(chunk.instruction_count(), 4);
    }

    #[test]
    fn test_run_keeps_every_stage() {
        let compilation = Compiler::new().run("f(x) => x\nf(1)", "main").unwrap();
        assert_eq!(compilation.tokens[0].kind, crate::lexer::TokenKind::Space);
        assert_eq!(compilation.script.statements.len(), 2);
        assert_eq!(compilation.chunk.labels(), vec!["fn-0"]);
    }

    #[test]
    fn test_import_error_has_snippet() {
        let mut compiler = Compiler::new()
            .with_resolver(MapModuleResolver::new().with_module("bad", "ok(x) => x\nf(x) => y"));
        let err = compiler.compile("import 'bad'", "main").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ReferenceError);
        assert_eq!(compiler.sources().get("bad"), Some("ok(x) => x\nf(x) => y"));
        assert_eq!(err.snippet(compiler.sources()).unwrap(), "  2 | f(x) => y");
    }

    #[test]
    fn test_with_assembler() {
        struct Counting;
        impl Assembler for Counting {
            fn assemble(&self, chunk: &BytecodeChunk) -> CompileResult<Vec<u8>> {
                Ok(vec![chunk.instruction_count() as u8])
            }
        }
        let binary = Compiler::new()
            .with_assembler(Counting)
            .compile("f(x) => x", "main")
            .unwrap();
        assert_eq!(binary, vec![1]);
    }
}
