//! Message types for driving the builder from other plugins.

use bevy::prelude::*;

use super::history::HistoryStats;

#[derive(Message)]
pub struct UndoRequest;

#[derive(Message)]
pub struct RedoRequest;

/// Undo or redo until the given action is the last applied one
#[derive(Message)]
pub struct JumpToActionRequest {
    pub action_id: String,
}

/// Drop every component, the history, the selection and the outline state
#[derive(Message)]
pub struct ClearBuilderRequest;

/// Written once per frame in which [`BuilderState`](super::BuilderState) changed
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct BuilderChanged {
    pub revision: u64,
    pub component_count: usize,
    pub history: HistoryStats,
}
