// src/errors.rs

//! Crate-wide error types.
//!
//! `VguardError` covers everything that can stop the program at startup.
//! `RunError` describes a single failed command run; it is reported on the
//! console and then dropped, never propagated.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VguardError {
    #[error("cannot watch {path:?}: {reason}")]
    Setup { path: PathBuf, reason: String },

    #[error("invalid trigger pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl VguardError {
    pub fn setup(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        VguardError::Setup {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Why a command run did not succeed.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for `{cmd}`: {source}")]
    Wait {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {cmd} ({status}){}", stderr_suffix(.stderr))]
    Exit {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{trimmed}")
    }
}

pub type Result<T> = std::result::Result<T, VguardError>;
