//! CLI module for argcheck
//!
//! Provides command-line interface for:
//! - check: Validate one JSON input against a definition file
//! - lint: Validate a definition file on its own

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, lint, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error_to, write_response_to};
