// src/exec/backend.rs

//! Pluggable run backend abstraction.
//!
//! The runtime talks to a `RunBackend` instead of spawning processes itself.
//! This makes it easy to swap in a fake backend in tests while keeping the
//! production implementation in [`RealRunBackend`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::console::{report_outcome, Console};
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::exec::command::run_command;
use crate::exec::{RunId, RunRequest};

/// Trait abstracting how runs are started and cancelled.
///
/// Implementations must eventually send `RuntimeEvent::RunFinished` for every
/// started run, including cancelled ones.
pub trait RunBackend: Send {
    /// Start the given run without waiting for it to finish.
    fn start_run(
        &mut self,
        run: RunRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Ask the given runs to stop. Unknown or finished ids are ignored.
    fn cancel_runs(
        &mut self,
        run_ids: Vec<RunId>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Internal handle for a currently-running command.
struct ActiveRun {
    cancel: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

/// Backend used in production: one Tokio task per run, real processes.
pub struct RealRunBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    console: Arc<dyn Console>,
    active: HashMap<RunId, ActiveRun>,
}

impl RealRunBackend {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, console: Arc<dyn Console>) -> Self {
        Self {
            runtime_tx,
            console,
            active: HashMap::new(),
        }
    }

    /// Number of runs whose task has not finished yet.
    pub fn in_flight(&self) -> usize {
        self.active.values().filter(|a| !a.handle.is_finished()).count()
    }

    fn prune_finished(&mut self) {
        self.active.retain(|_, a| !a.handle.is_finished());
    }
}

impl RunBackend for RealRunBackend {
    fn start_run(
        &mut self,
        run: RunRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.prune_finished();

            let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
            let runtime_tx = self.runtime_tx.clone();
            let console = Arc::clone(&self.console);
            let run_id = run.run_id;

            info!(run_id, file = %run.file, cmd = %run.cmd, "starting run");

            let handle = tokio::spawn(async move {
                let outcome = run_command(&run.cmd, &run.cwd, cancel_rx).await;
                report_outcome(console.as_ref(), &outcome);
                debug!(run_id = run.run_id, ?outcome, "run finished");
                let _ = runtime_tx
                    .send(RuntimeEvent::RunFinished { run_id: run.run_id })
                    .await;
            });

            self.active.insert(
                run_id,
                ActiveRun {
                    cancel: Some(cancel_tx),
                    handle,
                },
            );
            Ok(())
        })
    }

    fn cancel_runs(
        &mut self,
        run_ids: Vec<RunId>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for run_id in run_ids {
                match self.active.get_mut(&run_id).and_then(|a| a.cancel.take()) {
                    Some(cancel) => {
                        info!(run_id, "cancelling run");
                        if cancel.send(()).is_err() {
                            debug!(run_id, "run already finished while cancelling");
                        }
                    }
                    None => debug!(run_id, "no cancellable run with this id"),
                }
            }
            Ok(())
        })
    }
}
