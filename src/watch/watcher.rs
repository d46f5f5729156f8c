// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::{Result, VguardError};
use crate::watch::event::change_events;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    root: PathBuf,
    _inner: RecommendedWatcher,
}

impl WatcherHandle {
    /// Canonical path of the watched directory.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Start watching `dir` (non-recursively) and forward every change as a
/// `RuntimeEvent::Changed` into `runtime_tx`.
///
/// No filtering happens here; the runtime decides what to do with each
/// change. Fails with [`VguardError::Setup`] if `dir` cannot be watched.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_watcher(
    dir: impl Into<PathBuf>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let dir = dir.into();

    if !dir.is_dir() {
        return Err(VguardError::setup(&dir, "not an existing directory"));
    }
    let root = dir
        .canonicalize()
        .map_err(|e| VguardError::setup(&dir, e))?;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if event_tx.send(event).is_err() {
                    debug!("watch event dropped; forwarder has stopped");
                }
            }
            Err(err) => {
                warn!(error = %err, "file watch error");
            }
        },
        Config::default(),
    )
    .map_err(|e| VguardError::setup(&root, e))?;

    watcher
        .watch(&root, RecursiveMode::NonRecursive)
        .map_err(|e| VguardError::setup(&root, e))?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for change in change_events(&event) {
                if runtime_tx.send(RuntimeEvent::Changed(change)).await.is_err() {
                    debug!("runtime channel closed; stopping watch forwarder");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        root,
        _inner: watcher,
    })
}
