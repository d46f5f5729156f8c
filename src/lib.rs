// src/lib.rs

pub mod cli;
pub mod console;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::console::{Console, StdConsole};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::exec::RealRunBackend;
use crate::watch::{spawn_watcher, TriggerPattern};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - trigger pattern compilation
/// - directory watcher
/// - core runtime + real run backend
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let pattern = TriggerPattern::new(&args.pattern)?;

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Setup errors end the program here, before any event is delivered.
    let watcher = spawn_watcher(&args.dir, rt_tx.clone())?;
    let cwd = watcher.root().clone();

    info!(
        dir = ?cwd,
        pattern = %pattern.as_str(),
        cmd = %args.cmd,
        "watching for changes"
    );

    let console: Arc<dyn Console> = Arc::new(StdConsole);
    let backend = RealRunBackend::new(rt_tx.clone(), Arc::clone(&console));

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let core = CoreRuntime::new(pattern, args.cmd, cwd, args.on_overlap);
    let runtime = Runtime::new(core, rt_rx, backend, console);
    let result = runtime.run().await;

    drop(watcher);
    result
}
