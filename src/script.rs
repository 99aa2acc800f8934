//! Edit scripts: a JSON list of builder operations applied in order.
//!
//! ```json
//! [
//!   {"op": "add", "type": "section", "id": "hero"},
//!   {"op": "add", "type": "heading", "parent": "hero"},
//!   {"op": "update", "id": "hero", "changes": {"styles": {"padding": "2rem"}}},
//!   {"op": "select", "id": "hero", "mode": "multi"},
//!   {"op": "undo"}
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::builder::{
    BuilderError, BuilderState, ComponentType, ComponentUpdate, SelectionMode,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditStep {
    Add {
        #[serde(rename = "type")]
        component_type: ComponentType,
        /// Fixed id so later steps can refer to the node
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        parent: Option<String>,
        #[serde(default)]
        index: Option<usize>,
    },
    Remove {
        id: String,
    },
    Update {
        id: String,
        changes: ComponentUpdate,
    },
    Move {
        id: String,
        #[serde(default)]
        parent: Option<String>,
        index: usize,
    },
    Duplicate {
        id: String,
    },
    Select {
        id: String,
        #[serde(default)]
        mode: SelectionMode,
    },
    Undo,
    Redo,
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read edit script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid edit script {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_script(path: &Path) -> Result<Vec<EditStep>, ScriptError> {
    let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ScriptError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// What happened to each step of a script
#[derive(Debug, Default, PartialEq)]
pub struct ScriptReport {
    pub applied: usize,
    /// Undo/redo steps with nothing to replay
    pub skipped: usize,
    /// Step index and the reason the builder rejected it
    pub rejected: Vec<(usize, BuilderError)>,
}

/// Apply every step in order. A rejected step leaves the state untouched and
/// the script carries on.
pub fn apply_script(state: &mut BuilderState, steps: &[EditStep]) -> ScriptReport {
    let mut report = ScriptReport::default();
    for (index, step) in steps.iter().enumerate() {
        match apply_step(state, step) {
            Ok(true) => report.applied += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                warn!("Step {} rejected: {}", index, e);
                report.rejected.push((index, e));
            }
        }
    }
    debug!(
        "Script done: {} applied, {} skipped, {} rejected",
        report.applied,
        report.skipped,
        report.rejected.len()
    );
    report
}

fn apply_step(state: &mut BuilderState, step: &EditStep) -> Result<bool, BuilderError> {
    match step {
        EditStep::Add {
            component_type,
            id,
            parent,
            index,
        } => {
            let mut component = state.factory().create(*component_type);
            if let Some(id) = id {
                component.id = id.clone();
            }
            state.add_component(component, parent.as_deref(), *index)?;
        }
        EditStep::Remove { id } => {
            state.remove_component(id)?;
        }
        EditStep::Update { id, changes } => state.update_component(id, changes)?,
        EditStep::Move { id, parent, index } => {
            state.move_component(id, parent.as_deref(), *index)?
        }
        EditStep::Duplicate { id } => {
            state.duplicate_component(id)?;
        }
        EditStep::Select { id, mode } => {
            if state.find_component_by_id(id).is_none() {
                return Err(BuilderError::ComponentNotFound(id.clone()));
            }
            state.select(id, *mode);
        }
        EditStep::Undo => return Ok(state.undo().is_some()),
        EditStep::Redo => return Ok(state.redo().is_some()),
    }
    Ok(true)
}
