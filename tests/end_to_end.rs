#![cfg(unix)]

//! Watcher + runtime + real processes against a temporary directory.

use std::fs;
use std::sync::Arc;

use tokio::sync::mpsc;

use vguard::cli::DEFAULT_PATTERN;
use vguard::engine::{CoreRuntime, OverlapPolicy, Runtime, RuntimeEvent};
use vguard::exec::RealRunBackend;
use vguard::watch::{spawn_watcher, TriggerPattern};
use vguard_test_utils::memory_console::MemoryConsole;
use vguard_test_utils::{init_tracing, wait_until, with_timeout};

#[tokio::test]
async fn saving_a_v_file_runs_the_command_in_the_watched_dir() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    // Output file lives outside the watched dir so the run does not retrigger.
    let marker_dir = tempfile::tempdir().unwrap();
    let marker = marker_dir.path().join("ran");

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let watcher = spawn_watcher(dir.path(), rt_tx.clone()).unwrap();

    let console = MemoryConsole::new();
    let backend = RealRunBackend::new(rt_tx.clone(), Arc::new(console.clone()));
    let cmd = format!("ls; touch {}", marker.display());
    let core = CoreRuntime::new(
        TriggerPattern::new(DEFAULT_PATTERN).unwrap(),
        cmd,
        watcher.root().clone(),
        OverlapPolicy::Overlap,
    );
    let runtime = tokio::spawn(Runtime::new(core, rt_rx, backend, Arc::new(console.clone())).run());

    fs::write(dir.path().join("cpu.v"), "module cpu; endmodule").unwrap();

    wait_until(|| marker.exists() && console.stdout().contains("cpu.v\n")).await;

    let out = console.stdout();
    assert!(out.contains("File \"cpu.v\" changed.\n"), "got {out:?}");
    assert_eq!(console.stderr(), "");

    rt_tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    with_timeout(runtime).await.unwrap().unwrap();
}

#[tokio::test]
async fn ignored_files_produce_no_output() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let watcher = spawn_watcher(dir.path(), rt_tx.clone()).unwrap();

    let console = MemoryConsole::new();
    let backend = RealRunBackend::new(rt_tx.clone(), Arc::new(console.clone()));
    let core = CoreRuntime::new(
        TriggerPattern::new(DEFAULT_PATTERN).unwrap(),
        "echo should-not-run",
        watcher.root().clone(),
        OverlapPolicy::Overlap,
    );
    let runtime = tokio::spawn(Runtime::new(core, rt_rx, backend, Arc::new(console.clone())).run());

    fs::write(dir.path().join("notes.txt"), "todo").unwrap();
    fs::write(dir.path().join("cpu.vh"), "`define X").unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    rt_tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    with_timeout(runtime).await.unwrap().unwrap();

    assert!(console.writes().is_empty());
}

#[tokio::test]
async fn command_reading_the_sources_does_not_retrigger_itself() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("cpu.v");
    fs::write(&source, "module cpu; endmodule").unwrap();

    let log_dir = tempfile::tempdir().unwrap();
    let log = log_dir.path().join("runs");
    let runs = || {
        fs::read_to_string(&log)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    };

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);
    let watcher = spawn_watcher(dir.path(), rt_tx.clone()).unwrap();

    let console = MemoryConsole::new();
    let backend = RealRunBackend::new(rt_tx.clone(), Arc::new(console.clone()));
    let cmd = format!("cat cpu.v > /dev/null; echo ran >> {}", log.display());
    let core = CoreRuntime::new(
        TriggerPattern::new(DEFAULT_PATTERN).unwrap(),
        cmd,
        watcher.root().clone(),
        OverlapPolicy::Overlap,
    );
    let runtime = tokio::spawn(Runtime::new(core, rt_rx, backend, Arc::new(console.clone())).run());

    fs::write(&source, "module cpu(input clk); endmodule").unwrap();
    wait_until(|| runs() >= 1).await;

    // Let any follow-up events settle, then make sure the count stays put.
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    let settled = runs();
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    assert_eq!(runs(), settled, "runs kept triggering themselves");
    // inotify may report the truncate and the write of one save separately.
    assert!((1..=2).contains(&settled), "got {settled} runs for one save");

    rt_tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    with_timeout(runtime).await.unwrap().unwrap();
}
