use std::fmt;

use clap::ValueEnum;

/// Behaviour when a matching change arrives while a run is still in flight.
///
/// - `Overlap`: start another independent run right away (default).
/// - `Restart`: kill every in-flight run, then start a fresh one.
/// - `Queue`: remember at most one pending rerun and start it once the
///   in-flight run finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverlapPolicy {
    Overlap,
    Restart,
    Queue,
}

impl Default for OverlapPolicy {
    fn default() -> Self {
        OverlapPolicy::Overlap
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverlapPolicy::Overlap => "overlap",
            OverlapPolicy::Restart => "restart",
            OverlapPolicy::Queue => "queue",
        };
        f.write_str(s)
    }
}
