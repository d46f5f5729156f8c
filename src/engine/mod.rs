// src/engine/mod.rs

//! Orchestration engine for vguard.
//!
//! The engine reacts to:
//! - directory changes coming from the watcher
//! - run completions coming from the run backend
//! - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::exec::{RunId, RunRequest};
use crate::watch::ChangeEvent;

/// Events flowing into the runtime from the watcher, the backend, etc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// The watched directory reported a change.
    Changed(ChangeEvent),
    /// A run's process has exited (or was cancelled) and its output reported.
    RunFinished { run_id: RunId },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Print the timestamp and "file changed" banner.
    Announce { file: String },
    /// Hand this run to the backend.
    StartRun(RunRequest),
    /// Stop these in-flight runs.
    CancelRuns(Vec<RunId>),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

pub mod core;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use self::runtime::Runtime;
pub use crate::types::OverlapPolicy;
