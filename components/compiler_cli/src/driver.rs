//! Compilation driver for the CLI
//!
//! The [`Driver`] wraps a [`Compiler`] session, optionally dumps the
//! intermediate stages as JSON and hands back the assembled binary.

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use parser::{Compiler, ModuleResolver};
use std::io::Write;
use tracing::debug;

/// Runs one compilation per call and reports intermediate stages
pub struct Driver {
    compiler: Compiler,
    print_tokens: bool,
    print_ast: bool,
    print_instructions: bool,
}

impl Driver {
    /// Create a driver that prints nothing but the result
    ///
    /// # Example
    /// ```
    /// use compiler_cli::Driver;
    ///
    /// let mut driver = Driver::new();
    /// let mut report = Vec::new();
    /// let binary = driver.compile_string("id(x) => x", "main", &mut report).unwrap();
    /// assert_eq!(String::from_utf8(binary).unwrap(), "::fn-0\n");
    /// assert!(report.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            compiler: Compiler::new(),
            print_tokens: false,
            print_ast: false,
            print_instructions: false,
        }
    }

    /// Configure the reports requested on the command line
    pub fn from_cli(cli: &Cli) -> Self {
        Self::new()
            .with_print_tokens(cli.print_tokens)
            .with_print_ast(cli.print_ast)
            .with_print_instructions(cli.print_instructions)
    }

    /// Enable token stream printing
    pub fn with_print_tokens(mut self, enabled: bool) -> Self {
        self.print_tokens = enabled;
        self
    }

    /// Enable syntax tree printing
    pub fn with_print_ast(mut self, enabled: bool) -> Self {
        self.print_ast = enabled;
        self
    }

    /// Enable instruction printing
    pub fn with_print_instructions(mut self, enabled: bool) -> Self {
        self.print_instructions = enabled;
        self
    }

    /// Resolve imports through `resolver`
    pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
        self.compiler = self.compiler.with_resolver(resolver);
        self
    }

    /// Compile the file at `path`
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read or does not compile
    pub fn compile_file(&mut self, path: &str, origin: &str, report: &mut dyn Write) -> CliResult<Vec<u8>> {
        let source = std::fs::read_to_string(path)?;
        debug!(path, bytes = source.len(), "read source");
        self.compile_string(&source, origin, report)
    }

    /// Compile `source`, writing the requested JSON reports to `report`
    ///
    /// Reports are only written once the whole source compiled, so a
    /// failing input never produces partial output.
    pub fn compile_string(&mut self, source: &str, origin: &str, report: &mut dyn Write) -> CliResult<Vec<u8>> {
        let compilation = self.compiler.run(source, origin)?;

        if self.print_tokens {
            writeln!(report, "{}", serde_json::to_string_pretty(&compilation.tokens)?)?;
        }
        if self.print_ast {
            writeln!(report, "{}", serde_json::to_string_pretty(&compilation.script)?)?;
        }
        if self.print_instructions {
            writeln!(report, "{}", serde_json::to_string_pretty(&compilation.chunk)?)?;
        }

        Ok(self.compiler.assemble(&compilation.chunk)?)
    }

    /// Render an error for the terminal
    ///
    /// Compile errors are followed by the offending source line when the
    /// origin was compiled in this session.
    pub fn describe(&self, error: &CliError) -> String {
        match error {
            CliError::Compile(err) => match err.snippet(self.compiler.sources()) {
                Some(snippet) => format!("{}\n{}", err, snippet),
                None => err.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::MapModuleResolver;

    #[test]
    fn test_compile_string_listing() {
        let mut driver = Driver::new();
        let mut report = Vec::new();
        let binary = driver
            .compile_string("id(x) => x\nid(1)", "main", &mut report)
            .unwrap();
        let listing = String::from_utf8(binary).unwrap();
        assert!(listing.starts_with("::fn-0\n"));
        assert!(report.is_empty());
    }

    #[test]
    fn test_print_instructions_report() {
        let mut driver = Driver::new().with_print_instructions(true);
        let mut report = Vec::new();
        driver.compile_string("f(x) => x", "main", &mut report).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&report).unwrap();
        assert_eq!(json["instructions"][0]["Label"], "fn-0");
    }

    #[test]
    fn test_failed_compile_writes_no_report() {
        let mut driver = Driver::new().with_print_tokens(true).with_print_ast(true);
        let mut report = Vec::new();
        assert!(driver.compile_string("f(a b)", "main", &mut report).is_err());
        assert!(report.is_empty());
    }

    #[test]
    fn test_describe_includes_snippet() {
        let mut driver = Driver::new();
        let err = driver
            .compile_string("f(x) => x\nmissing(1)", "main", &mut Vec::new())
            .unwrap_err();
        assert_eq!(
            driver.describe(&err),
            "ReferenceError: Reference to unknown symbol `missing`.\n  2 | missing(1)"
        );
    }

    #[test]
    fn test_reports_come_from_one_run() {
        let mut driver = Driver::new()
            .with_print_tokens(true)
            .with_print_ast(true)
            .with_print_instructions(true);
        let mut report = Vec::new();
        driver.compile_string("f(x) => x", "main", &mut report).unwrap();

        let text = String::from_utf8(report).unwrap();
        let documents: Vec<serde_json::Value> = serde_json::Deserializer::from_str(&text)
            .into_iter::<serde_json::Value>()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0][1]["source"], "f");
        assert!(documents[1]["statements"].is_array());
        assert_eq!(documents[2]["instructions"][0]["Label"], "fn-0");
    }

    #[test]
    fn test_import_error_describes_module_line() {
        let mut driver =
            Driver::new().with_resolver(MapModuleResolver::new().with_module("bad", "f(x) => y"));
        let err = driver
            .compile_string("import 'bad'", "main", &mut Vec::new())
            .unwrap_err();
        assert!(driver.describe(&err).ends_with("  1 | f(x) => y"));
    }

    #[test]
    fn test_with_resolver() {
        let mut driver = Driver::new().with_resolver(MapModuleResolver::new().with_module("io", "println_out(s) => s"));
        let binary = driver
            .compile_string("import 'io'\nio.println_out('hi')", "main", &mut Vec::new())
            .unwrap();
        assert!(String::from_utf8(binary).unwrap().contains("jump %0"));
    }
}
