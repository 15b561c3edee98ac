//! Command line arguments

use clap::Parser;
use std::path::Path;

/// Origin used for inline code
pub const EVAL_ORIGIN: &str = "main";

/// `scriptc` arguments
#[derive(Debug, Parser)]
#[command(name = "scriptc", version, about = "Compile scripts to assembler listings")]
pub struct Cli {
    /// Source file to compile
    #[arg(short, long, conflicts_with = "eval")]
    pub file: Option<String>,

    /// Inline source to compile
    #[arg(short, long)]
    pub eval: Option<String>,

    /// Origin identifier reported in errors and used for imports
    #[arg(long)]
    pub origin: Option<String>,

    /// Print the token stream as JSON
    #[arg(long)]
    pub print_tokens: bool,

    /// Print the syntax tree as JSON
    #[arg(long)]
    pub print_ast: bool,

    /// Print the flattened instructions as JSON
    #[arg(long)]
    pub print_instructions: bool,

    /// Write the assembled output here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Log pipeline stages at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Origin of the compiled source
    ///
    /// An explicit `--origin` wins. Files default to their stem so that
    /// `lib/io.sc` reports as `io`; inline code reports as `main`.
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.origin {
            return origin.clone();
        }
        self.file
            .as_deref()
            .and_then(|file| Path::new(file).file_stem())
            .and_then(|stem| stem.to_str())
            .unwrap_or(EVAL_ORIGIN)
            .to_string()
    }

    /// Log filter directive when `RUST_LOG` is not consulted
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
