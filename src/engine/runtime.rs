// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::console::{announce_change, Console};
use crate::errors::Result;
use crate::exec::RunBackend;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Drives the core in response to `RuntimeEvent`s and delegates command
/// execution to a `RunBackend`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics.
pub struct Runtime<B: RunBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
    console: Arc<dyn Console>,
}

impl<B: RunBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: RunBackend> Runtime<B> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        backend: B,
        console: Arc<dyn Console>,
    ) -> Self {
        Self {
            core,
            event_rx,
            backend,
            console,
        }
    }

    /// Main event loop.
    ///
    /// Runs until `ShutdownRequested` arrives or every sender is dropped.
    pub async fn run(mut self) -> Result<()> {
        info!(policy = %self.core.policy(), "vguard runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::Announce { file } => {
                info!(file = %file, "matching file changed");
                announce_change(self.console.as_ref(), &file, Local::now());
            }
            CoreCommand::StartRun(run) => {
                self.backend.start_run(run).await?;
            }
            CoreCommand::CancelRuns(run_ids) => {
                debug!(?run_ids, "cancelling runs");
                self.backend.cancel_runs(run_ids).await?;
            }
        }
        Ok(())
    }
}
