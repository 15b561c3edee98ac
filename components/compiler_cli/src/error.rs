//! Error types for the CLI

use core_types::CompileError;

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The source failed to compile
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// File I/O error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// A report could not be serialized
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
