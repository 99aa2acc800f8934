//! Named layer groups that components can be assigned to.
//!
//! A group carries its own stacking order, visibility, lock and opacity.
//! Membership is the `layer_id` field on each component and changes through
//! recorded updates, so this resource only holds the group records. Group
//! orders stay contiguous (0..n) and `groups` is kept sorted by order.

use std::collections::HashSet;

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::{COPY_SUFFIX, DEFAULT_LAYER_NAME, LAYER_COLORS, MAX_LAYER_OPACITY};

use super::tree::ComponentTree;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGroup {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Stacking position, 0 is the bottom
    pub order: usize,
    pub is_visible: bool,
    pub is_locked: bool,
    /// Percentage, 0 to 100
    pub opacity: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Options for [`LayerGroups::create_layer`]; unset fields get defaults
#[derive(Debug, Clone, Default)]
pub struct CreateLayerOptions {
    pub name: Option<String>,
    pub color: Option<String>,
    /// Position in the stack; appended on top when unset
    pub order: Option<usize>,
    pub is_visible: Option<bool>,
    pub is_locked: Option<bool>,
}

/// Partial update of a group: every set field overwrites
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGroupUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub is_visible: Option<bool>,
    pub is_locked: Option<bool>,
    pub opacity: Option<u8>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerSortMode {
    #[default]
    Order,
    Name,
    /// Newest first
    Created,
}

/// How the layer group list is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerGroupsViewConfig {
    pub show_hidden_layers: bool,
    pub show_locked_layers: bool,
    pub show_component_count: bool,
    pub sort_mode: LayerSortMode,
}

impl Default for LayerGroupsViewConfig {
    fn default() -> Self {
        Self {
            show_hidden_layers: true,
            show_locked_layers: true,
            show_component_count: true,
            sort_mode: LayerSortMode::Order,
        }
    }
}

/// Component counts for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerGroupStats {
    pub layer_id: String,
    pub component_count: usize,
    pub visible_count: usize,
    pub locked_count: usize,
}

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct LayerGroups {
    groups: Vec<LayerGroup>,
    selected: Option<String>,
    view: LayerGroupsViewConfig,
}

impl LayerGroups {
    fn generate_id() -> String {
        format!("layer_{}", Uuid::new_v4().simple())
    }

    /// Groups in stacking order
    pub fn groups(&self) -> &[LayerGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LayerGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replace every group (page load). Repeated ids keep their first record.
    pub fn set_groups(&mut self, mut groups: Vec<LayerGroup>) {
        let mut seen = HashSet::new();
        groups.retain(|group| seen.insert(group.id.clone()));
        groups.sort_by_key(|group| group.order);
        self.groups = groups;
        self.selected = None;
        self.renumber();
    }

    // ===== CRUD =====

    pub fn create_layer(&mut self, options: CreateLayerOptions) -> LayerGroup {
        let count = self.groups.len();
        let now = Utc::now();
        let group = LayerGroup {
            id: Self::generate_id(),
            name: options
                .name
                .unwrap_or_else(|| format!("Layer {}", count + 1)),
            color: options
                .color
                .unwrap_or_else(|| LAYER_COLORS[count % LAYER_COLORS.len()].to_string()),
            order: 0,
            is_visible: options.is_visible.unwrap_or(true),
            is_locked: options.is_locked.unwrap_or(false),
            opacity: MAX_LAYER_OPACITY,
            description: None,
            created_at: now,
            updated_at: now,
        };
        let position = options.order.unwrap_or(count).min(count);
        debug!("Created layer group {:?} at {}", group.name, position);
        self.groups.insert(position, group.clone());
        self.renumber();
        LayerGroup {
            order: position,
            ..group
        }
    }

    pub fn delete_layer(&mut self, id: &str) -> bool {
        let Some(position) = self.position(id) else {
            warn!("Delete ignored, unknown layer group {}", id);
            return false;
        };
        let removed = self.groups.remove(position);
        self.renumber();
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        debug!("Deleted layer group {:?}", removed.name);
        true
    }

    pub fn update_layer(&mut self, id: &str, update: &LayerGroupUpdate) -> bool {
        let Some(group) = self.groups.iter_mut().find(|group| group.id == id) else {
            warn!("Update ignored, unknown layer group {}", id);
            return false;
        };
        if let Some(name) = &update.name {
            group.name = name.clone();
        }
        if let Some(color) = &update.color {
            group.color = color.clone();
        }
        if let Some(visible) = update.is_visible {
            group.is_visible = visible;
        }
        if let Some(locked) = update.is_locked {
            group.is_locked = locked;
        }
        if let Some(opacity) = update.opacity {
            group.opacity = opacity.min(MAX_LAYER_OPACITY);
        }
        if let Some(description) = &update.description {
            group.description = Some(description.clone());
        }
        group.updated_at = Utc::now();
        true
    }

    pub fn rename_layer(&mut self, id: &str, name: &str) -> bool {
        self.update_layer(
            id,
            &LayerGroupUpdate {
                name: Some(name.to_string()),
                ..Default::default()
            },
        )
    }

    // ===== Actions =====

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        let Some(visible) = self.get(id).map(|group| group.is_visible) else {
            return false;
        };
        self.update_layer(
            id,
            &LayerGroupUpdate {
                is_visible: Some(!visible),
                ..Default::default()
            },
        )
    }

    pub fn toggle_lock(&mut self, id: &str) -> bool {
        let Some(locked) = self.get(id).map(|group| group.is_locked) else {
            return false;
        };
        self.update_layer(
            id,
            &LayerGroupUpdate {
                is_locked: Some(!locked),
                ..Default::default()
            },
        )
    }

    /// Set opacity, clamped to 0..=100
    pub fn set_opacity(&mut self, id: &str, opacity: i32) -> bool {
        let clamped = opacity.clamp(0, i32::from(MAX_LAYER_OPACITY)) as u8;
        self.update_layer(
            id,
            &LayerGroupUpdate {
                opacity: Some(clamped),
                ..Default::default()
            },
        )
    }

    /// Move a group to `new_order` in the stack; the others shift to make room
    pub fn reorder_layer(&mut self, id: &str, new_order: usize) -> bool {
        let Some(position) = self.position(id) else {
            warn!("Reorder ignored, unknown layer group {}", id);
            return false;
        };
        let group = self.groups.remove(position);
        let target = new_order.min(self.groups.len());
        self.groups.insert(target, group);
        self.renumber();
        true
    }

    /// Copy a group on top of the stack with a fresh id
    pub fn duplicate_layer(&mut self, id: &str) -> Option<LayerGroup> {
        let Some(source) = self.get(id) else {
            warn!("Duplicate ignored, unknown layer group {}", id);
            return None;
        };
        let now = Utc::now();
        let copy = LayerGroup {
            id: Self::generate_id(),
            name: format!("{}{}", source.name, COPY_SUFFIX),
            order: self.groups.len(),
            created_at: now,
            updated_at: now,
            ..source.clone()
        };
        self.groups.push(copy.clone());
        debug!("Duplicated layer group as {:?}", copy.name);
        Some(copy)
    }

    /// Replace two or more groups with one new group on top of the stack.
    ///
    /// The merged group takes the first source's color; it is visible only if
    /// every source was and locked only if every source was. An empty `name`
    /// gets a generated one. Component membership is not touched here; see
    /// `BuilderState::reassign_layer`.
    pub fn merge_layers(&mut self, ids: &[String], name: &str) -> Option<LayerGroup> {
        let mut sources: Vec<LayerGroup> = Vec::new();
        for id in ids {
            if sources.iter().all(|source| &source.id != id)
                && let Some(group) = self.get(id)
            {
                sources.push(group.clone());
            }
        }
        let [first, rest @ ..] = sources.as_slice() else {
            warn!("Merge needs at least two layer groups");
            return None;
        };
        if rest.is_empty() {
            warn!("Merge needs at least two layer groups");
            return None;
        }

        let name = if name.is_empty() {
            format!("{} + {} other(s)", first.name, rest.len())
        } else {
            name.to_string()
        };
        let merged = self.create_layer(CreateLayerOptions {
            name: Some(name),
            color: Some(first.color.clone()),
            order: None,
            is_visible: Some(sources.iter().all(|source| source.is_visible)),
            is_locked: Some(sources.iter().all(|source| source.is_locked)),
        });
        for source in &sources {
            self.delete_layer(&source.id);
        }
        debug!(
            "Merged {} layer groups into {:?}",
            sources.len(),
            merged.name
        );
        self.get(&merged.id).cloned()
    }

    // ===== Selection =====

    /// Select a group; unknown ids are ignored
    pub fn select_layer(&mut self, id: Option<&str>) {
        match id {
            Some(id) if !self.contains(id) => warn!("Select ignored, unknown layer group {}", id),
            _ => self.selected = id.map(str::to_string),
        }
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_layer(&self) -> Option<&LayerGroup> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    // ===== View =====

    pub fn view_config(&self) -> &LayerGroupsViewConfig {
        &self.view
    }

    pub fn view_config_mut(&mut self) -> &mut LayerGroupsViewConfig {
        &mut self.view
    }

    /// Groups sorted by the view's sort mode
    pub fn sorted(&self) -> Vec<&LayerGroup> {
        let mut groups: Vec<&LayerGroup> = self.groups.iter().collect();
        match self.view.sort_mode {
            LayerSortMode::Order => groups.sort_by_key(|group| group.order),
            LayerSortMode::Name => groups.sort_by_cached_key(|group| group.name.to_lowercase()),
            LayerSortMode::Created => groups.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        groups
    }

    /// Sorted groups minus the ones the view filters out
    pub fn visible(&self) -> Vec<&LayerGroup> {
        self.sorted()
            .into_iter()
            .filter(|group| self.view.show_hidden_layers || group.is_visible)
            .filter(|group| self.view.show_locked_layers || !group.is_locked)
            .collect()
    }

    // ===== Stats =====

    /// Count the components of every depth assigned to `id`
    pub fn stats(&self, id: &str, tree: &ComponentTree) -> LayerGroupStats {
        let mut stats = LayerGroupStats {
            layer_id: id.to_string(),
            component_count: 0,
            visible_count: 0,
            locked_count: 0,
        };
        for (_, node) in tree.walk() {
            if node.layer_id.as_deref() != Some(id) {
                continue;
            }
            stats.component_count += 1;
            if !node.is_hidden {
                stats.visible_count += 1;
            }
            if node.is_locked {
                stats.locked_count += 1;
            }
        }
        stats
    }

    pub fn all_stats(&self, tree: &ComponentTree) -> Vec<LayerGroupStats> {
        self.groups
            .iter()
            .map(|group| self.stats(&group.id, tree))
            .collect()
    }

    // ===== Utilities =====

    /// Bottom group, creating the default one when there are none
    pub fn initialize_default_layer(&mut self) -> LayerGroup {
        if let Some(first) = self.groups.first() {
            return first.clone();
        }
        self.create_layer(CreateLayerOptions {
            name: Some(DEFAULT_LAYER_NAME.to_string()),
            color: Some(LAYER_COLORS[0].to_string()),
            ..Default::default()
        })
    }

    /// Drop every group and the selection; the view settings stay
    pub fn clear(&mut self) {
        self.groups.clear();
        self.selected = None;
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.id == id)
    }

    fn renumber(&mut self) {
        for (order, group) in self.groups.iter_mut().enumerate() {
            group.order = order;
        }
    }
}
