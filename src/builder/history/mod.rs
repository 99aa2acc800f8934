//! Undo/Redo history for builder edits.
//!
//! Every recording operation on [`BuilderState`](super::BuilderState) appends
//! a [`HistoryAction`] carrying deep snapshots of the affected component. The
//! log never touches the tree itself: undo and redo hand an action back and the
//! state applies its before or after snapshot through the non-recording path.
//!
//! ## Pointer convention
//!
//! The log keeps a pointer to the last applied action. `None` means nothing is
//! applied (empty log, or everything undone). Undo returns the action under the
//! pointer and steps back; redo steps forward and returns the action there.
//!
//! ## Module Structure
//!
//! - [`action`] - HistoryAction, ActionKind and snapshot types
//! - [`history_log`] - HistoryLog with the bounded linear log

mod action;
mod history_log;

#[cfg(test)]
mod tests;

// Re-exports
pub use action::{ActionKind, HistoryAction, StateSnapshot};
pub use history_log::{HistoryLog, HistoryStats};
