// src/watch/mod.rs

//! Directory watching and filename filtering.
//!
//! This module is responsible for:
//! - Wiring up a platform filesystem watcher (`notify`) on a single directory.
//! - Turning raw notifications into [`ChangeEvent`]s.
//! - Deciding which filenames should trigger a run ([`TriggerPattern`]).
//!
//! It does **not** run commands; it only feeds changes into the runtime.

pub mod event;
pub mod filter;
pub mod watcher;

pub use event::{change_events, ChangeEvent, ChangeKind};
pub use filter::TriggerPattern;
pub use watcher::{spawn_watcher, WatcherHandle};
