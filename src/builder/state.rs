//! The editor session: component tree, history and selection in one owner.

use bevy::prelude::*;
use tracing::{debug, warn};

use super::catalog::ComponentFactory;
use super::component::{BuilderComponent, ComponentType, ComponentUpdate};
use super::error::BuilderError;
use super::history::{ActionKind, HistoryAction, HistoryLog, StateSnapshot};
use super::selection::{SelectionMode, SelectionState};
use super::tree::ComponentTree;

/// One editor session.
///
/// The only writer of the component tree. Every recording operation appends
/// one history action; undo and redo replay snapshots through the tree's
/// structural methods without recording.
#[derive(Resource, Debug, Default)]
pub struct BuilderState {
    tree: ComponentTree,
    history: HistoryLog,
    selection: SelectionState,
    factory: ComponentFactory,
    /// Bumped on every effective tree change (edits, replay, loads)
    revision: u64,
}

impl BuilderState {
    pub fn with_history_size(max_history_size: usize) -> Self {
        Self {
            history: HistoryLog::with_max_size(max_history_size),
            ..Default::default()
        }
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn components(&self) -> &[BuilderComponent] {
        self.tree.roots()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn factory(&self) -> ComponentFactory {
        self.factory
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn find_component_by_id(&self, id: &str) -> Option<&BuilderComponent> {
        self.tree.find_component_by_id(id)
    }

    pub fn set_max_history_size(&mut self, max_size: usize) {
        self.history.set_max_size(max_size);
    }

    /// Replace the whole forest (page load). History and selection start over.
    ///
    /// A malformed forest is rejected and the current session is kept.
    pub fn set_components(&mut self, roots: Vec<BuilderComponent>) -> Result<(), BuilderError> {
        self.tree = ComponentTree::from_roots(roots)?;
        self.history.clear();
        self.selection.clear_selection();
        self.revision += 1;
        debug!("Loaded {} component(s)", self.tree.len());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.tree = ComponentTree::new();
        self.history.clear();
        self.selection.clear_selection();
        self.revision += 1;
    }

    // ===== Recording operations =====

    /// Insert a component at root level or under `parent_id`; returns its id
    pub fn add_component(
        &mut self,
        component: BuilderComponent,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<String, BuilderError> {
        let id = component.id.clone();
        let description = format!("Add {}", component.display_name);
        let position = self
            .tree
            .insert(component, parent_id, index)
            .inspect_err(|e| warn!("Add rejected: {}", e))?;

        let snapshot = self.snapshot(&id)?;
        self.revision += 1;
        self.history.record_action(
            ActionKind::Add,
            description,
            None,
            Some(StateSnapshot::new(
                snapshot,
                parent_id.map(str::to_string),
                position,
            )),
        );
        Ok(id)
    }

    /// Create a component of `component_type` from the catalog and add it
    pub fn add_new(
        &mut self,
        component_type: ComponentType,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<String, BuilderError> {
        let component = self.factory.create(component_type);
        self.add_component(component, parent_id, index)
    }

    /// Detach a component and its subtree; returns the removed subtree
    pub fn remove_component(&mut self, id: &str) -> Result<BuilderComponent, BuilderError> {
        let Some((component, (parent_id, index))) = self.tree.detach(id) else {
            warn!("Remove ignored, unknown component {}", id);
            return Err(BuilderError::ComponentNotFound(id.to_string()));
        };

        self.selection.prune(&component.subtree_ids());
        self.revision += 1;
        self.history.record_action(
            ActionKind::Remove,
            format!("Remove {}", component.display_name),
            Some(StateSnapshot::new(component.clone(), parent_id, index)),
            None,
        );
        Ok(component)
    }

    /// Merge a partial update into a component.
    ///
    /// An update that changes nothing is not recorded.
    pub fn update_component(
        &mut self,
        id: &str,
        update: &ComponentUpdate,
    ) -> Result<(), BuilderError> {
        let Some(component) = self.tree.find_component_mut(id) else {
            warn!("Update ignored, unknown component {}", id);
            return Err(BuilderError::ComponentNotFound(id.to_string()));
        };

        let before = component.clone();
        component.apply_update(update);
        if *component == before {
            debug!("Update on {} changed nothing", id);
            return Ok(());
        }
        let after = component.clone();

        self.revision += 1;
        self.history.record_action(
            ActionKind::Update,
            format!("Update {}", after.display_name),
            Some(StateSnapshot::detached(before)),
            Some(StateSnapshot::detached(after)),
        );
        Ok(())
    }

    /// Re-parent a component; moves into its own subtree are rejected
    pub fn move_component(
        &mut self,
        id: &str,
        new_parent_id: Option<&str>,
        new_index: usize,
    ) -> Result<(), BuilderError> {
        let snapshot = self.snapshot(id).inspect_err(|e| warn!("Move ignored: {}", e))?;
        let ((old_parent, old_index), position) = self
            .tree
            .relocate(id, new_parent_id, new_index)
            .inspect_err(|e| warn!("Move rejected: {}", e))?;

        let new_parent = new_parent_id.map(str::to_string);
        if old_parent == new_parent && old_index == position {
            debug!("Move of {} kept it in place", id);
            return Ok(());
        }

        let description = format!("Move {}", snapshot.display_name);
        self.revision += 1;
        self.history.record_action(
            ActionKind::Move,
            description,
            Some(StateSnapshot::new(snapshot.clone(), old_parent, old_index)),
            Some(StateSnapshot::new(snapshot, new_parent, position)),
        );
        Ok(())
    }

    /// Insert a deep copy with fresh ids right after the original
    pub fn duplicate_component(&mut self, id: &str) -> Result<String, BuilderError> {
        let source = self
            .snapshot(id)
            .inspect_err(|e| warn!("Duplicate ignored: {}", e))?;
        let (parent_id, index) = self
            .tree
            .locate(id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))?;

        let copy = self.factory.duplicate(&source);
        let copy_id = copy.id.clone();
        let position = self.tree.insert(copy, parent_id.as_deref(), Some(index + 1))?;

        let snapshot = self.snapshot(&copy_id)?;
        self.revision += 1;
        self.history.record_action(
            ActionKind::Duplicate,
            format!("Duplicate {}", source.display_name),
            None,
            Some(StateSnapshot::new(snapshot, parent_id, position)),
        );
        Ok(copy_id)
    }

    /// Move every node in one of the `from` layer groups into `to`.
    ///
    /// Each node is a recorded update; returns how many nodes changed.
    pub fn reassign_layer(&mut self, from: &[String], to: Option<&str>) -> usize {
        let ids: Vec<String> = self
            .tree
            .walk()
            .into_iter()
            .filter(|(_, node)| {
                node.layer_id.as_deref() != to
                    && node
                        .layer_id
                        .as_ref()
                        .is_some_and(|layer| from.contains(layer))
            })
            .map(|(_, node)| node.id.clone())
            .collect();
        let update = ComponentUpdate::default().with_layer(to);
        ids.iter()
            .filter(|id| self.update_component(id, &update).is_ok())
            .count()
    }

    // ===== Replay =====

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the last applied action; returns its kind
    pub fn undo(&mut self) -> Option<ActionKind> {
        let action = self.history.undo()?.clone();
        self.apply_before(&action);
        self.revision += 1;
        debug!("Undo: {}", action.description);
        Some(action.kind)
    }

    /// Re-apply the next undone action; returns its kind
    pub fn redo(&mut self) -> Option<ActionKind> {
        let action = self.history.redo()?.clone();
        self.apply_after(&action);
        self.revision += 1;
        debug!("Redo: {}", action.description);
        Some(action.kind)
    }

    /// Undo or redo until `action_id` is the last applied action
    pub fn go_to_action(&mut self, action_id: &str) -> bool {
        let Some(target) = self.history.position_of(action_id) else {
            warn!("Unknown history action {}", action_id);
            return false;
        };
        while self.history.current_index().is_none_or(|current| current < target) {
            if self.redo().is_none() {
                break;
            }
        }
        while self.history.current_index().is_some_and(|current| current > target) {
            if self.undo().is_none() {
                break;
            }
        }
        self.history.current_index() == Some(target)
    }

    fn apply_before(&mut self, action: &HistoryAction) {
        let result = match (action.kind, &action.before_state, &action.after_state) {
            (ActionKind::Add | ActionKind::Duplicate, _, Some(after)) => {
                self.detach_quietly(&after.component.id)
            }
            (ActionKind::Remove, Some(before), _) => self
                .tree
                .insert(
                    before.component.clone(),
                    before.parent_id.as_deref(),
                    before.index,
                )
                .map(|_| ()),
            (ActionKind::Update, Some(before), _) => self.tree.restore_fields(&before.component),
            (ActionKind::Move, Some(before), _) => self
                .tree
                .relocate(
                    &before.component.id,
                    before.parent_id.as_deref(),
                    before.index.unwrap_or_default(),
                )
                .map(|_| ()),
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!("Could not undo {}: {}", action.description, e);
        }
    }

    fn apply_after(&mut self, action: &HistoryAction) {
        let result = match (action.kind, &action.before_state, &action.after_state) {
            (ActionKind::Add | ActionKind::Duplicate, _, Some(after)) => self
                .tree
                .insert(
                    after.component.clone(),
                    after.parent_id.as_deref(),
                    after.index,
                )
                .map(|_| ()),
            (ActionKind::Remove, Some(before), _) => self.detach_quietly(&before.component.id),
            (ActionKind::Update, _, Some(after)) => self.tree.restore_fields(&after.component),
            (ActionKind::Move, _, Some(after)) => self
                .tree
                .relocate(
                    &after.component.id,
                    after.parent_id.as_deref(),
                    after.index.unwrap_or_default(),
                )
                .map(|_| ()),
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!("Could not redo {}: {}", action.description, e);
        }
    }

    fn detach_quietly(&mut self, id: &str) -> Result<(), BuilderError> {
        let (component, _) = self
            .tree
            .detach(id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))?;
        self.selection.prune(&component.subtree_ids());
        Ok(())
    }

    fn snapshot(&self, id: &str) -> Result<BuilderComponent, BuilderError> {
        self.tree
            .find_component_by_id(id)
            .cloned()
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))
    }

    // ===== Selection =====

    /// Apply a selection gesture; stale ids are ignored
    pub fn select(&mut self, id: &str, mode: SelectionMode) {
        if !self.tree.contains(id) {
            debug!("Selection ignored, unknown component {}", id);
            return;
        }
        let order = self.tree.flattened_ids();
        self.selection.select(id, mode, &order);
    }

    pub fn deselect(&mut self, id: &str) {
        self.selection.deselect(id);
    }

    pub fn select_all(&mut self) {
        let order = self.tree.flattened_ids();
        self.selection.select_all(&order);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.is_selected(id)
    }

    /// Selected components in tree (pre-)order
    pub fn selected_components(&self) -> Vec<&BuilderComponent> {
        let nodes = self.tree.walk().into_iter().map(|(_, node)| node);
        self.selection.selected_components(nodes)
    }
}
