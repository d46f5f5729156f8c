// src/watch/event.rs

//! Conversion from raw `notify` events into [`ChangeEvent`]s.

use std::path::Path;

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::Event;

/// Coarse classification of a directory change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// An entry appeared, disappeared or was renamed.
    Rename,
    /// File contents or metadata were written.
    Write,
    /// Anything else the platform reported.
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) | EventKind::Remove(_) => ChangeKind::Rename,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
            EventKind::Modify(_) => ChangeKind::Write,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => ChangeKind::Other,
        }
    }
}

/// A single change notification for the watched directory.
///
/// `name` is the bare filename. It is `None` when the platform did not say
/// which entry changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub name: Option<String>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
        }
    }

    pub fn nameless(kind: ChangeKind) -> Self {
        Self { kind, name: None }
    }
}

/// Split one `notify` event into per-path [`ChangeEvent`]s.
///
/// Order follows `event.paths`. An event without paths still yields one
/// nameless change so it is not silently lost.
///
/// Access events (open, read, close) are not changes and yield nothing.
/// A `RenameMode::Both` event also yields nothing: inotify has already
/// delivered its `From` and `To` halves as separate events.
pub fn change_events(event: &Event) -> Vec<ChangeEvent> {
    match event.kind {
        EventKind::Access(_) => return Vec::new(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => return Vec::new(),
        _ => {}
    }

    let kind = ChangeKind::from(&event.kind);

    if event.paths.is_empty() {
        return vec![ChangeEvent::nameless(kind)];
    }

    event
        .paths
        .iter()
        .map(|path| ChangeEvent {
            kind,
            name: file_name(path),
        })
        .collect()
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}
