//! Clipboard for copy/cut/paste of component subtrees.
//!
//! Copied subtrees are stored as detached snapshots. Pasting inserts fresh
//! copies (new ids, flags reset), so the same clipboard can be pasted many
//! times. Cut and paste go through the recording operations on
//! [`BuilderState`], which makes both undoable.

use bevy::prelude::*;
use tracing::{debug, info, warn};

use super::component::BuilderComponent;
use super::error::BuilderError;
use super::state::BuilderState;

/// Resource that holds copied subtrees
#[derive(Resource, Debug, Default, Clone)]
pub struct Clipboard {
    components: Vec<BuilderComponent>,
}

impl Clipboard {
    /// Copy the subtrees rooted at `ids`, replacing the clipboard contents.
    ///
    /// Ids nested inside another copied id are skipped so no node is copied
    /// twice. Unknown ids are ignored. Returns the number of copied roots;
    /// when nothing resolves the clipboard is left as it was.
    pub fn copy(&mut self, state: &BuilderState, ids: &[String]) -> usize {
        let tree = state.tree();
        let copied: Vec<BuilderComponent> = ids
            .iter()
            .filter(|id| {
                !ids.iter()
                    .any(|other| other != *id && tree.is_in_subtree(id, other))
            })
            .filter_map(|id| tree.find_component_by_id(id).cloned())
            .collect();

        if copied.is_empty() {
            return 0;
        }
        self.components = copied;
        debug!("Copied {} component(s)", self.components.len());
        self.components.len()
    }

    /// Copy then remove. Each removal is recorded separately.
    pub fn cut(&mut self, state: &mut BuilderState, ids: &[String]) -> usize {
        let count = self.copy(state, ids);
        if count == 0 {
            return 0;
        }
        let roots: Vec<String> = self.components.iter().map(|c| c.id.clone()).collect();
        for id in &roots {
            if let Err(e) = state.remove_component(id) {
                warn!("Cut skipped {}: {}", id, e);
            }
        }
        info!("Cut {} component(s)", count);
        count
    }

    /// Insert fresh copies of every clipboard root, at root level or as the
    /// last children of `parent_id`. Returns the new root ids.
    pub fn paste(
        &self,
        state: &mut BuilderState,
        parent_id: Option<&str>,
    ) -> Result<Vec<String>, BuilderError> {
        let factory = state.factory();
        let mut pasted = Vec::with_capacity(self.components.len());
        for component in &self.components {
            let copy = factory.paste_copy(component);
            pasted.push(state.add_component(copy, parent_id, None)?);
        }
        if !pasted.is_empty() {
            info!("Pasted {} component(s)", pasted.len());
        }
        Ok(pasted)
    }

    pub fn components(&self) -> &[BuilderComponent] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }
}
