//! Recorded history actions and the snapshots they carry.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::builder::component::BuilderComponent;

/// Kind of edit an action records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Add,
    Remove,
    Update,
    Move,
    Duplicate,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Add => "ADD",
            ActionKind::Remove => "REMOVE",
            ActionKind::Update => "UPDATE",
            ActionKind::Move => "MOVE",
            ActionKind::Duplicate => "DUPLICATE",
        }
    }
}

/// Deep copy of a component together with where it sat in the tree
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub component: BuilderComponent,
    pub parent_id: Option<String>,
    pub index: Option<usize>,
}

impl StateSnapshot {
    pub fn new(component: BuilderComponent, parent_id: Option<String>, index: usize) -> Self {
        Self {
            component,
            parent_id,
            index: Some(index),
        }
    }

    /// Snapshot of a component without location data (updates)
    pub fn detached(component: BuilderComponent) -> Self {
        Self {
            component,
            parent_id: None,
            index: None,
        }
    }
}

/// One reversible edit
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryAction {
    pub id: String,
    pub kind: ActionKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    /// State to restore on undo; None for pure additions
    pub before_state: Option<StateSnapshot>,
    /// State to restore on redo; None for pure removals
    pub after_state: Option<StateSnapshot>,
}

impl HistoryAction {
    pub fn new(
        kind: ActionKind,
        description: impl Into<String>,
        before_state: Option<StateSnapshot>,
        after_state: Option<StateSnapshot>,
    ) -> Self {
        Self {
            id: format!("action_{}", Uuid::new_v4().simple()),
            kind,
            description: description.into(),
            timestamp: Utc::now(),
            before_state,
            after_state,
        }
    }
}
