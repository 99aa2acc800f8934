//! Expanded/collapsed state of the layers outline.
//!
//! Only the expanded flag lives here. Visibility and locking are component
//! flags changed through `update_component`, so they go through history.

use std::collections::HashSet;

use bevy::prelude::*;

use super::component::BuilderComponent;
use super::tree::ComponentTree;

/// Resource tracking which outline rows are expanded. Rows start collapsed.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct LayerStates {
    expanded: HashSet<String>,
}

impl LayerStates {
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn set_expanded(&mut self, id: &str, expanded: bool) {
        if expanded {
            self.expanded.insert(id.to_string());
        } else {
            self.expanded.remove(id);
        }
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        let expanded = self.is_expanded(id);
        self.set_expanded(id, !expanded);
    }

    /// Expand a row and every ancestor so the row becomes visible
    pub fn expand_to_component(&mut self, id: &str, ancestor_ids: &[String]) {
        for ancestor in ancestor_ids {
            self.expanded.insert(ancestor.clone());
        }
        self.expanded.insert(id.to_string());
    }

    pub fn expand_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        self.expanded.extend(ids.into_iter().cloned());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Forget the row's state (back to collapsed)
    pub fn reset(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    /// Forget rows whose component is no longer in the tree
    pub fn retain_existing(&mut self, tree: &ComponentTree) {
        if self.expanded.is_empty() {
            return;
        }
        self.expanded.retain(|id| tree.contains(id));
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    /// Rows the outline shows: pre-order, descending only into expanded rows
    pub fn visible_rows<'a>(&self, tree: &'a ComponentTree) -> Vec<(usize, &'a BuilderComponent)> {
        let mut rows = Vec::new();
        for root in tree.roots() {
            self.collect_rows(root, 0, &mut rows);
        }
        rows
    }

    fn collect_rows<'a>(
        &self,
        node: &'a BuilderComponent,
        depth: usize,
        rows: &mut Vec<(usize, &'a BuilderComponent)>,
    ) {
        rows.push((depth, node));
        if self.is_expanded(&node.id) {
            for child in &node.children {
                self.collect_rows(child, depth + 1, rows);
            }
        }
    }
}
