use std::sync::{Arc, Mutex};

use vguard::console::Console;

/// Which console stream a write went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// A console that records every write in order.
///
/// Clones share the same buffer, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    writes: Arc<Mutex<Vec<(Stream, String)>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes so far, in order.
    pub fn writes(&self) -> Vec<(Stream, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Concatenated stdout text.
    pub fn stdout(&self) -> String {
        self.collect(Stream::Out)
    }

    /// Concatenated stderr text.
    pub fn stderr(&self) -> String {
        self.collect(Stream::Err)
    }

    fn collect(&self, stream: Stream) -> String {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, t)| t.as_str())
            .collect()
    }
}

impl Console for MemoryConsole {
    fn out(&self, text: &str) {
        self.writes.lock().unwrap().push((Stream::Out, text.to_string()));
    }

    fn err(&self, text: &str) {
        self.writes.lock().unwrap().push((Stream::Err, text.to_string()));
    }
}
