//! Dirty state detection for tracking unsaved changes.

use bevy::prelude::*;

use crate::builder::BuilderState;

use super::resources::PageDirtyState;

/// Compare the builder revision against the one recorded at the last save/load
pub fn detect_page_changes(state: Res<BuilderState>, mut dirty_state: ResMut<PageDirtyState>) {
    let is_dirty = state.revision() != dirty_state.clean_revision;
    if dirty_state.is_dirty != is_dirty {
        dirty_state.is_dirty = is_dirty;
    }
}
