// src/exec/mod.rs

//! Process execution layer.
//!
//! This module actually runs the configured command with
//! `tokio::process::Command`, reports the result on the console and tells the
//! runtime when a run is over.
//!
//! - [`command`] spawns one shell command and captures its output.
//! - [`backend`] provides the `RunBackend` trait and the production
//!   `RealRunBackend`; tests can replace it with a fake implementation.

use std::path::PathBuf;

use crate::errors::RunError;

pub mod backend;
pub mod command;

pub use backend::{RealRunBackend, RunBackend};
pub use command::run_command;

/// Identifier of a single command run, unique for the process lifetime.
pub type RunId = u64;

/// A run the runtime wants started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub run_id: RunId,
    /// Filename whose change caused this run.
    pub file: String,
    pub cmd: String,
    pub cwd: PathBuf,
}

/// Output captured from a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Succeeded(CapturedOutput),
    Failed(RunError),
    Cancelled,
}
