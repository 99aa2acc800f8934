//! Page builder core: the component tree, its undo/redo history and the selection.
//!
//! ## Module Structure
//!
//! - [`component`] - Component node, property bag and partial updates
//! - [`catalog`] - Per-type definitions and the [`ComponentFactory`]
//! - [`tree`] - The component forest and its structural mutations
//! - [`history`] - Bounded linear undo/redo log
//! - [`selection`] - Single, multi and range selection
//! - [`state`] - [`BuilderState`], the recording owner of the three above
//! - [`clipboard`] - Copy/cut/paste of subtrees
//! - [`layers`] - Expanded state of the layers outline
//! - [`layer_groups`] - Named layer groups with order, visibility, lock and opacity
//! - [`messages`] / [`systems`] - Bevy request messages and their handlers
//!
//! ## Systems
//!
//! Request handlers run in [`BuilderSystems::Apply`], then
//! [`notify_builder_changes`](systems::notify_builder_changes) writes one
//! [`BuilderChanged`] for any frame in which the state changed.

pub mod catalog;
pub mod clipboard;
pub mod component;
pub mod error;
pub mod history;
pub mod layer_groups;
pub mod layers;
pub mod messages;
pub mod selection;
pub mod state;
pub mod systems;
pub mod tree;

#[cfg(test)]
mod tests;

pub use catalog::{ComponentDefinition, ComponentFactory};
pub use clipboard::Clipboard;
pub use component::{
    BuilderComponent, ComponentCategory, ComponentProperties, ComponentType, ComponentUpdate,
    PropertyMap, PropertyValue,
};
pub use error::BuilderError;
pub use history::{ActionKind, HistoryAction, HistoryLog, HistoryStats, StateSnapshot};
pub use layer_groups::{
    CreateLayerOptions, LayerGroup, LayerGroupStats, LayerGroupUpdate, LayerGroups,
    LayerGroupsViewConfig, LayerSortMode,
};
pub use layers::LayerStates;
pub use messages::{
    BuilderChanged, ClearBuilderRequest, JumpToActionRequest, RedoRequest, UndoRequest,
};
pub use selection::{SelectionMode, SelectionState};
pub use state::BuilderState;
pub use tree::ComponentTree;

use bevy::prelude::*;

/// Ordering for builder systems (other plugins can run after these)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuilderSystems {
    Apply,
    Notify,
}

pub struct BuilderPlugin;

impl Plugin for BuilderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BuilderState>()
            .init_resource::<Clipboard>()
            .init_resource::<LayerStates>()
            .init_resource::<LayerGroups>()
            .add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .add_message::<JumpToActionRequest>()
            .add_message::<ClearBuilderRequest>()
            .add_message::<BuilderChanged>()
            .configure_sets(Update, (BuilderSystems::Apply, BuilderSystems::Notify).chain())
            .add_systems(
                Update,
                (
                    systems::handle_undo_requests.run_if(on_message::<UndoRequest>),
                    systems::handle_redo_requests.run_if(on_message::<RedoRequest>),
                    systems::handle_jump_requests.run_if(on_message::<JumpToActionRequest>),
                    systems::handle_clear_requests.run_if(on_message::<ClearBuilderRequest>),
                )
                    .chain()
                    .in_set(BuilderSystems::Apply),
            )
            .add_systems(
                Update,
                (
                    systems::prune_layer_states.run_if(resource_changed::<BuilderState>),
                    systems::notify_builder_changes,
                )
                    .in_set(BuilderSystems::Notify),
            );
    }
}
