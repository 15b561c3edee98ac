//! Script compiler CLI library
//!
//! Provides the argument definitions and the [`Driver`] that runs the
//! compiler on behalf of the `scriptc` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod driver;
pub mod error;

pub use cli::Cli;
pub use driver::Driver;
pub use error::{CliError, CliResult};
