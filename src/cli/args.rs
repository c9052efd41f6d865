//! CLI argument definitions using clap
//!
//! Commands:
//! - argcheck check --schema <path> [--input <path>] [--lenient] [--auto-cast]
//! - argcheck lint --schema <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// argcheck - validate structured arguments against a definition
#[derive(Parser, Debug)]
#[command(name = "argcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log every definition and parse outcome to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON input and print the normalized arguments
    Check {
        /// Path to the definition file
        #[arg(long)]
        schema: PathBuf,

        /// Path to the input JSON (default: one line of stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Ignore undeclared keys instead of rejecting them
        #[arg(long)]
        lenient: bool,

        /// Convert text to int, float and bool where declared
        #[arg(long)]
        auto_cast: bool,
    },

    /// Check a definition file without parsing any input
    Lint {
        /// Path to the definition file
        #[arg(long)]
        schema: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from([
            "argcheck", "check", "--schema", "s.json", "--input", "in.json", "--auto-cast",
        ])
        .unwrap();
        match cli.command {
            Command::Check { schema, input, lenient, auto_cast } => {
                assert_eq!(schema, PathBuf::from("s.json"));
                assert_eq!(input, Some(PathBuf::from("in.json")));
                assert!(!lenient);
                assert!(auto_cast);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli =
            Cli::try_parse_from(["argcheck", "lint", "--schema", "s.json", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_schema_required() {
        assert!(Cli::try_parse_from(["argcheck", "check"]).is_err());
    }
}
