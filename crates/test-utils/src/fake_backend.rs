use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use vguard::engine::RuntimeEvent;
use vguard::errors::Result;
use vguard::exec::{RunBackend, RunId, RunRequest};

/// A fake backend that:
/// - records which runs were started and which were cancelled
/// - optionally reports `RunFinished` straight away for each started run.
#[derive(Clone)]
pub struct FakeBackend {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    finish_immediately: bool,
    started: Arc<Mutex<Vec<RunRequest>>>,
    cancelled: Arc<Mutex<Vec<RunId>>>,
}

impl FakeBackend {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>, finish_immediately: bool) -> Self {
        Self {
            runtime_tx,
            finish_immediately,
            started: Arc::new(Mutex::new(Vec::new())),
            cancelled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn started(&self) -> Vec<RunRequest> {
        self.started.lock().unwrap().clone()
    }

    pub fn started_files(&self) -> Vec<String> {
        self.started().into_iter().map(|r| r.file).collect()
    }

    pub fn cancelled(&self) -> Vec<RunId> {
        self.cancelled.lock().unwrap().clone()
    }
}

impl RunBackend for FakeBackend {
    fn start_run(
        &mut self,
        run: RunRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let started = Arc::clone(&self.started);
        let finish = self.finish_immediately;

        Box::pin(async move {
            let run_id = run.run_id;
            started.lock().unwrap().push(run);

            if finish {
                // Report from a separate task: the runtime is busy awaiting us
                // and the channel may be full.
                tokio::spawn(async move {
                    let _ = tx.send(RuntimeEvent::RunFinished { run_id }).await;
                });
            }
            Ok(())
        })
    }

    fn cancel_runs(
        &mut self,
        run_ids: Vec<RunId>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let cancelled = Arc::clone(&self.cancelled);
        Box::pin(async move {
            cancelled.lock().unwrap().extend(run_ids);
            Ok(())
        })
    }
}
