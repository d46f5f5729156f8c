// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag has a default, so running `vguard` with no arguments watches the
//! current directory for `*.v` changes and runs `make test`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::OverlapPolicy;

/// Default filename pattern.
pub const DEFAULT_PATTERN: &str = r"^.*\.v$";

/// Default command run on every matching change.
pub const DEFAULT_COMMAND: &str = "make test";

/// Command-line arguments for `vguard`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vguard",
    version,
    about = "Re-run a build/test command whenever matching files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to watch (not recursive). Also the command's working directory.
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub dir: PathBuf,

    /// Regular expression a changed filename must match.
    #[arg(long, value_name = "REGEX", default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Shell command to run on a match.
    #[arg(long, value_name = "CMD", default_value = DEFAULT_COMMAND)]
    pub cmd: String,

    /// What to do when a match arrives while a previous run is still going.
    #[arg(long, value_enum, value_name = "POLICY", default_value_t)]
    pub on_overlap: OverlapPolicy,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `VGUARD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_arguments_reproduce_the_default_behaviour() {
        let args = CliArgs::try_parse_from(["vguard"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.pattern, DEFAULT_PATTERN);
        assert_eq!(args.cmd, "make test");
        assert_eq!(args.on_overlap, OverlapPolicy::Overlap);
        assert!(args.log_level.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "vguard",
            "--dir",
            "src",
            "--cmd",
            "cargo test",
            "--on-overlap",
            "restart",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.dir, PathBuf::from("src"));
        assert_eq!(args.cmd, "cargo test");
        assert_eq!(args.on_overlap, OverlapPolicy::Restart);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
