//! Systems that apply builder request messages and publish change notifications.

use bevy::prelude::*;
use tracing::{debug, info};

use super::layer_groups::LayerGroups;
use super::layers::LayerStates;
use super::messages::{
    BuilderChanged, ClearBuilderRequest, JumpToActionRequest, RedoRequest, UndoRequest,
};
use super::state::BuilderState;

pub fn handle_undo_requests(
    mut events: MessageReader<UndoRequest>,
    mut state: ResMut<BuilderState>,
) {
    for _ in events.read() {
        // Checked through Deref so an empty history does not mark the state changed
        if state.can_undo() {
            state.undo();
        }
    }
}

pub fn handle_redo_requests(
    mut events: MessageReader<RedoRequest>,
    mut state: ResMut<BuilderState>,
) {
    for _ in events.read() {
        if state.can_redo() {
            state.redo();
        }
    }
}

pub fn handle_jump_requests(
    mut events: MessageReader<JumpToActionRequest>,
    mut state: ResMut<BuilderState>,
) {
    for event in events.read() {
        // Unknown or already current targets stay on the Deref path
        let Some(target) = state.history().position_of(&event.action_id) else {
            continue;
        };
        if state.history().current_index() != Some(target) {
            state.go_to_action(&event.action_id);
        }
    }
}

pub fn handle_clear_requests(
    mut events: MessageReader<ClearBuilderRequest>,
    mut state: ResMut<BuilderState>,
    mut layers: ResMut<LayerStates>,
    mut groups: ResMut<LayerGroups>,
) {
    for _ in events.read() {
        state.clear();
        layers.clear();
        groups.clear();
        info!("Cleared builder");
    }
}

pub fn prune_layer_states(state: Res<BuilderState>, mut layers: ResMut<LayerStates>) {
    if layers.is_empty() {
        return;
    }
    let before = layers.len();
    layers.retain_existing(state.tree());
    if layers.len() != before {
        debug!("Forgot {} outline row(s)", before - layers.len());
    }
}

/// Publish a [`BuilderChanged`] when the state resource changed since the last run
pub fn notify_builder_changes(
    state: Res<BuilderState>,
    mut changed: MessageWriter<BuilderChanged>,
) {
    if !state.is_changed() || state.is_added() {
        return;
    }
    changed.write(BuilderChanged {
        revision: state.revision(),
        component_count: state.tree().len(),
        history: state.history().stats(),
    });
}
