//! StatusReporter trait: the progress/error side channel.
//!
//! A reporter holds a small flat key/value snapshot. Every `update` overwrites
//! one field and persists the whole snapshot. The matching engine publishes
//! `current_entry`, `current_footnote`, `phase` and `error` through it.

use crate::error::StatusError;

/// Field holding the key of the entry being processed.
pub const CURRENT_ENTRY: &str = "current_entry";

/// Field holding the footnote being arbitrated.
pub const CURRENT_FOOTNOTE: &str = "current_footnote";

/// Field holding the engine phase (`matching`, `disambiguation`, `done`).
pub const PHASE: &str = "phase";

/// Field holding the most recent local failure.
pub const ERROR: &str = "error";

pub trait StatusReporter: Send + Sync {
    /// Overwrite `key` with `value` and persist the snapshot.
    fn update(&self, key: &str, value: &str) -> Result<(), StatusError>;
}
