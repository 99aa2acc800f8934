//! Selection manager: turns click gestures into a set of selected component ids.
//!
//! - **Single** (plain click) replaces the selection.
//! - **Multi** (Ctrl+click) toggles one id.
//! - **Range** (Shift+click) adds the span between the pivot and the clicked id
//!   in pre-order, the same order the layers panel lists components in.
//!
//! The pivot and last-selected ids are always members of the selection or None.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::component::BuilderComponent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
    Range,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    /// Selected ids in the order they were selected
    selected: Vec<String>,
    pivot: Option<String>,
    last_selected: Option<String>,
    mode: SelectionMode,
}

impl SelectionState {
    /// Apply a selection gesture.
    ///
    /// `flattened_order` is the pre-order list of all component ids and is only
    /// consulted for range selection.
    pub fn select(&mut self, id: &str, mode: SelectionMode, flattened_order: &[String]) {
        match mode {
            SelectionMode::Single => self.select_single(id),
            SelectionMode::Multi => self.toggle(id),
            SelectionMode::Range => self.select_range(id, flattened_order),
        }
        debug!(
            "Selection: {:?} on {} -> {} selected",
            self.mode,
            id,
            self.selected.len()
        );
    }

    pub fn deselect(&mut self, id: &str) {
        if !self.remove(id) {
            return;
        }
        if self.last_selected.as_deref() == Some(id) {
            self.last_selected = None;
        }
        if self.pivot.as_deref() == Some(id) {
            self.pivot = self.selected.first().cloned();
        }
    }

    /// Drop every id in `ids` from the selection (used when a subtree is deleted)
    pub fn prune(&mut self, ids: &[String]) {
        for id in ids {
            self.deselect(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.pivot = None;
        self.last_selected = None;
        self.mode = SelectionMode::Single;
    }

    pub fn select_all(&mut self, ids: &[String]) {
        self.selected.clear();
        for id in ids {
            self.insert(id);
        }
        self.mode = SelectionMode::Multi;
        self.pivot = self.selected.first().cloned();
        self.last_selected = self.selected.last().cloned();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|selected| selected == id)
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn has_multiple(&self) -> bool {
        self.selected.len() > 1
    }

    pub fn pivot(&self) -> Option<&str> {
        self.pivot.as_deref()
    }

    pub fn last_selected(&self) -> Option<&str> {
        self.last_selected.as_deref()
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The selected components among `components`, in their given order
    pub fn selected_components<'a>(
        &self,
        components: impl IntoIterator<Item = &'a BuilderComponent>,
    ) -> Vec<&'a BuilderComponent> {
        components
            .into_iter()
            .filter(|component| self.is_selected(&component.id))
            .collect()
    }

    fn select_single(&mut self, id: &str) {
        self.selected = vec![id.to_string()];
        self.pivot = Some(id.to_string());
        self.last_selected = Some(id.to_string());
        self.mode = SelectionMode::Single;
    }

    fn toggle(&mut self, id: &str) {
        self.mode = SelectionMode::Multi;
        if self.remove(id) {
            if self.pivot.as_deref() == Some(id) {
                self.pivot = self.selected.first().cloned();
            }
            // The toggled id is gone; anchor the next range on the pivot
            self.last_selected = self.pivot.clone();
        } else {
            self.insert(id);
            if self.pivot.is_none() {
                self.pivot = Some(id.to_string());
            }
            self.last_selected = Some(id.to_string());
        }
    }

    fn select_range(&mut self, id: &str, flattened_order: &[String]) {
        let anchor = self.pivot.clone().or_else(|| self.last_selected.clone());
        let anchor_index = anchor
            .as_deref()
            .and_then(|anchor| flattened_order.iter().position(|other| other == anchor));
        let Some(anchor_index) = anchor_index else {
            // No usable pivot yet: behave like a plain click
            self.select_single(id);
            return;
        };
        let Some(target_index) = flattened_order.iter().position(|other| other == id) else {
            return;
        };

        let (start, end) = if anchor_index <= target_index {
            (anchor_index, target_index)
        } else {
            (target_index, anchor_index)
        };
        for other in &flattened_order[start..=end] {
            self.insert(other);
        }
        self.last_selected = Some(id.to_string());
        self.mode = SelectionMode::Range;
    }

    fn insert(&mut self, id: &str) {
        if !self.is_selected(id) {
            self.selected.push(id.to_string());
        }
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|selected| selected != id);
        self.selected.len() != before
    }
}
