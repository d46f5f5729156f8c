// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for reading
//! events from channels, talking to the run backend and writing the console.
//! The core has no Tokio types and performs no IO, so the overlap policies
//! can be tested without processes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::engine::{CoreCommand, CoreStep, RuntimeEvent};
use crate::exec::{RunId, RunRequest};
use crate::types::OverlapPolicy;
use crate::watch::{ChangeEvent, TriggerPattern};

/// Pure core runtime state.
#[derive(Debug)]
pub struct CoreRuntime {
    pattern: TriggerPattern,
    cmd: String,
    cwd: PathBuf,
    policy: OverlapPolicy,
    next_run_id: RunId,
    in_flight: BTreeSet<RunId>,
    /// File for the coalesced rerun under `OverlapPolicy::Queue`.
    pending: Option<String>,
}

impl CoreRuntime {
    pub fn new(
        pattern: TriggerPattern,
        cmd: impl Into<String>,
        cwd: impl Into<PathBuf>,
        policy: OverlapPolicy,
    ) -> Self {
        Self {
            pattern,
            cmd: cmd.into(),
            cwd: cwd.into(),
            policy,
            next_run_id: 1,
            in_flight: BTreeSet::new(),
            pending: None,
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Runs started and not yet reported finished (or cancelled).
    pub fn in_flight(&self) -> Vec<RunId> {
        self.in_flight.iter().copied().collect()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::Changed(change) => self.handle_change(change),
            RuntimeEvent::RunFinished { run_id } => self.handle_finished(run_id),
            RuntimeEvent::ShutdownRequested => {
                let mut commands = Vec::new();
                if !self.in_flight.is_empty() {
                    commands.push(CoreCommand::CancelRuns(self.in_flight()));
                }
                self.pending = None;
                CoreStep {
                    commands,
                    keep_running: false,
                }
            }
        }
    }

    fn handle_change(&mut self, change: ChangeEvent) -> CoreStep {
        let Some(file) = self.pattern.matching_name(&change).map(str::to_string) else {
            debug!(?change, "change does not match trigger pattern");
            return keep_going(Vec::new());
        };

        let mut commands = vec![CoreCommand::Announce { file: file.clone() }];

        match self.policy {
            OverlapPolicy::Overlap => commands.push(self.start(file)),
            OverlapPolicy::Restart => {
                if !self.in_flight.is_empty() {
                    let stale: Vec<RunId> =
                        std::mem::take(&mut self.in_flight).into_iter().collect();
                    commands.push(CoreCommand::CancelRuns(stale));
                }
                commands.push(self.start(file));
            }
            OverlapPolicy::Queue => {
                if self.in_flight.is_empty() {
                    commands.push(self.start(file));
                } else {
                    debug!(file = %file, "run in flight; coalescing into pending rerun");
                    self.pending = Some(file);
                }
            }
        }

        keep_going(commands)
    }

    fn handle_finished(&mut self, run_id: RunId) -> CoreStep {
        if !self.in_flight.remove(&run_id) {
            debug!(run_id, "finished run was not tracked (cancelled earlier)");
        }

        let mut commands = Vec::new();
        if self.policy == OverlapPolicy::Queue && self.in_flight.is_empty() {
            if let Some(file) = self.pending.take() {
                commands.push(self.start(file));
            }
        }
        keep_going(commands)
    }

    fn start(&mut self, file: String) -> CoreCommand {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.in_flight.insert(run_id);
        CoreCommand::StartRun(RunRequest {
            run_id,
            file,
            cmd: self.cmd.clone(),
            cwd: self.cwd.clone(),
        })
    }
}

fn keep_going(commands: Vec<CoreCommand>) -> CoreStep {
    CoreStep {
        commands,
        keep_running: true,
    }
}
