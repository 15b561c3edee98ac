//! `scriptc` compiler CLI
//!
//! Entry point for the compiler. Parses CLI arguments, installs the log
//! subscriber and delegates to the [`Driver`].

use clap::Parser as ClapParser;
use compiler_cli::cli::EVAL_ORIGIN;
use compiler_cli::{Cli, CliResult, Driver};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new(cli.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()))
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn emit(binary: &[u8], output: Option<&str>) -> CliResult<()> {
    match output {
        Some(path) => std::fs::write(path, binary)?,
        None => std::io::stdout().write_all(binary)?,
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut driver = Driver::from_cli(&cli);
    let origin = cli.origin();
    let mut stdout = std::io::stdout();

    let result = if let Some(file) = &cli.file {
        driver.compile_file(file, &origin, &mut stdout)
    } else if let Some(code) = &cli.eval {
        driver.compile_string(code, &origin, &mut stdout)
    } else {
        println!("scriptc v{}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Usage:");
        println!("  scriptc --file <FILE>     Compile a source file");
        println!("  scriptc --eval <CODE>     Compile inline source (origin `{}`)", EVAL_ORIGIN);
        println!();
        println!("Run 'scriptc --help' for more options.");
        return;
    };

    if let Err(e) = result.and_then(|binary| emit(&binary, cli.output.as_deref())) {
        eprintln!("{}", driver.describe(&e));
        std::process::exit(1);
    }
}
