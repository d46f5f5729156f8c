// src/console.rs

//! User-facing console output.
//!
//! Everything the watched command produces (and the "file changed" banner)
//! goes through a [`Console`], so tests can capture it without touching the
//! real stdout/stderr.

use std::io::Write;

use chrono::{DateTime, Local};

use crate::errors::RunError;
use crate::exec::{CapturedOutput, RunOutcome};

/// Sink for the two console streams.
///
/// Each call writes its text as one block; implementations must not split it.
pub trait Console: Send + Sync {
    fn out(&self, text: &str);
    fn err(&self, text: &str);
}

/// Console backed by the process stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn out(&self, text: &str) {
        let mut handle = std::io::stdout().lock();
        let _ = handle.write_all(text.as_bytes());
        let _ = handle.flush();
    }

    fn err(&self, text: &str) {
        let mut handle = std::io::stderr().lock();
        let _ = handle.write_all(text.as_bytes());
        let _ = handle.flush();
    }
}

/// Print the two banner lines for a matching change.
pub fn announce_change(console: &dyn Console, file: &str, now: DateTime<Local>) {
    console.out(&format!("{}\n", now.to_rfc3339()));
    console.out(&format!("File \"{file}\" changed.\n"));
}

/// Write a finished run's outcome.
///
/// - success: captured stderr (if any) to `err`, then stdout (if any) to `out`
/// - failure: a single `ERROR: ...` block to `err`
/// - cancelled: nothing
pub fn report_outcome(console: &dyn Console, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Succeeded(CapturedOutput { stdout, stderr }) => {
            if !stderr.is_empty() {
                console.err(stderr);
            }
            if !stdout.is_empty() {
                console.out(stdout);
            }
        }
        RunOutcome::Failed(err) => report_error(console, err),
        RunOutcome::Cancelled => {}
    }
}

fn report_error(console: &dyn Console, err: &RunError) {
    console.err(&format!("ERROR: {err}\n"));
}
