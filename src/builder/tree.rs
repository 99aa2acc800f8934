//! The component forest and its structural mutations.
//!
//! [`ComponentTree`] owns the ordered list of root components. Children are
//! owned by their parent, so a node can never be its own descendant; the
//! remaining invariants (unique ids, `parent_id` matching the owning node,
//! contiguous `order` among siblings) are re-established on every list an
//! insert, detach or relocate touches.
//!
//! Nothing here records history. The recording path lives in
//! [`BuilderState`](super::BuilderState), which calls these methods for both
//! fresh edits and undo/redo replay.

use std::collections::HashSet;

use super::component::BuilderComponent;
use super::error::BuilderError;

/// Where a node lives: its parent (None for roots) and its sibling index
pub type Location = (Option<String>, usize);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentTree {
    roots: Vec<BuilderComponent>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from saved roots, normalizing parent links and sibling order.
    ///
    /// Fails on a repeated id or on children stored under a leaf kind.
    pub fn from_roots(mut roots: Vec<BuilderComponent>) -> Result<Self, BuilderError> {
        let mut seen = HashSet::new();
        validate_list(&roots, &mut seen)?;
        renumber(&mut roots, None);
        for root in &mut roots {
            link_children(root);
        }
        Ok(Self { roots })
    }

    pub fn roots(&self) -> &[BuilderComponent] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<BuilderComponent> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of root-level components
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Total number of components in the forest
    pub fn len(&self) -> usize {
        self.roots.iter().map(BuilderComponent::subtree_len).sum()
    }

    pub fn find_component_by_id(&self, id: &str) -> Option<&BuilderComponent> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_component_by_id(id).is_some()
    }

    /// Parent and sibling index of a node
    pub fn locate(&self, id: &str) -> Option<Location> {
        locate_in(&self.roots, id, None)
    }

    /// Id of the node's parent; None for roots and for unknown ids
    pub fn find_parent_id(&self, id: &str) -> Option<String> {
        self.locate(id).and_then(|(parent, _)| parent)
    }

    /// Index of `id` within the children of `parent_id` (or the roots)
    pub fn find_component_index(&self, id: &str, parent_id: Option<&str>) -> Option<usize> {
        let siblings = match parent_id {
            Some(parent_id) => &self.find_component_by_id(parent_id)?.children,
            None => &self.roots,
        };
        siblings.iter().position(|node| node.id == id)
    }

    /// Parent chain of a node, nearest first
    pub fn ancestor_ids(&self, id: &str) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut current = self.find_parent_id(id);
        while let Some(parent) = current {
            current = self.find_parent_id(&parent);
            ancestors.push(parent);
        }
        ancestors
    }

    /// Whether `target` is `root` itself or sits somewhere below it.
    ///
    /// Walks the target's ancestor chain up to the forest root.
    pub fn is_in_subtree(&self, target: &str, root: &str) -> bool {
        target == root || self.ancestor_ids(target).iter().any(|id| id == root)
    }

    /// All ids in pre-order (the order range selection works over)
    pub fn flattened_ids(&self) -> Vec<String> {
        self.walk().into_iter().map(|(_, node)| node.id.clone()).collect()
    }

    /// Pre-order traversal yielding each node with its depth
    pub fn walk(&self) -> Vec<(usize, &BuilderComponent)> {
        let mut out = Vec::new();
        for root in &self.roots {
            walk_into(root, 0, &mut out);
        }
        out
    }

    /// Insert `node` under `parent_id` (or at root level) at `index`.
    ///
    /// A missing index appends; an index past the end is clamped. Returns the
    /// position the node ended up at.
    pub fn insert(
        &mut self,
        mut node: BuilderComponent,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> Result<usize, BuilderError> {
        if let Some(clash) = node.subtree_ids().into_iter().find(|id| self.contains(id)) {
            return Err(BuilderError::DuplicateId(clash));
        }
        if let Some(parent_id) = parent_id {
            let parent = self
                .find_component_by_id(parent_id)
                .ok_or_else(|| BuilderError::ParentNotFound(parent_id.to_string()))?;
            if !parent.accepts_children() {
                return Err(BuilderError::LeafParent(parent_id.to_string()));
            }
        }

        link_children(&mut node);
        let siblings = self
            .siblings_mut(parent_id)
            .ok_or_else(|| BuilderError::ParentNotFound(parent_id.unwrap_or_default().to_string()))?;
        let position = index.map_or(siblings.len(), |i| i.min(siblings.len()));
        siblings.insert(position, node);
        renumber(siblings, parent_id);
        Ok(position)
    }

    /// Remove a node and its whole subtree, returning it with its old location
    pub fn detach(&mut self, id: &str) -> Option<(BuilderComponent, Location)> {
        let (parent, _) = self.locate(id)?;
        let siblings = self.siblings_mut(parent.as_deref())?;
        let position = siblings.iter().position(|node| node.id == id)?;
        let mut node = siblings.remove(position);
        renumber(siblings, parent.as_deref());
        node.parent_id = None;
        Some((node, (parent, position)))
    }

    /// Move a node under a new parent in one step.
    ///
    /// `new_index` is a position in the target list after the node has left
    /// its old place. Rejects targets inside the moved node's own subtree.
    /// Returns the old location and the final index.
    pub fn relocate(
        &mut self,
        id: &str,
        new_parent: Option<&str>,
        new_index: usize,
    ) -> Result<(Location, usize), BuilderError> {
        let (old_parent, old_index) = self
            .locate(id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))?;

        if let Some(target) = new_parent {
            let parent = self
                .find_component_by_id(target)
                .ok_or_else(|| BuilderError::ParentNotFound(target.to_string()))?;
            if self.is_in_subtree(target, id) {
                return Err(BuilderError::MoveIntoOwnSubtree {
                    id: id.to_string(),
                    target: target.to_string(),
                });
            }
            if !parent.accepts_children() {
                return Err(BuilderError::LeafParent(target.to_string()));
            }
        }

        let (node, _) = self
            .detach(id)
            .ok_or_else(|| BuilderError::ComponentNotFound(id.to_string()))?;
        let Some(siblings) = self.siblings_mut(new_parent) else {
            // Unreachable while the target is outside the moved subtree; put the node back
            if let Some(siblings) = self.siblings_mut(old_parent.as_deref()) {
                siblings.insert(old_index.min(siblings.len()), node);
                renumber(siblings, old_parent.as_deref());
            }
            return Err(BuilderError::ParentNotFound(
                new_parent.unwrap_or_default().to_string(),
            ));
        };
        let position = new_index.min(siblings.len());
        siblings.insert(position, node);
        renumber(siblings, new_parent);
        Ok(((old_parent, old_index), position))
    }

    /// Overwrite a node's own fields from a snapshot, keeping its place and children
    pub fn restore_fields(&mut self, snapshot: &BuilderComponent) -> Result<(), BuilderError> {
        let node = find_in_mut(&mut self.roots, &snapshot.id)
            .ok_or_else(|| BuilderError::ComponentNotFound(snapshot.id.clone()))?;
        node.component_type = snapshot.component_type;
        node.category = snapshot.category;
        node.display_name = snapshot.display_name.clone();
        node.properties = snapshot.properties.clone();
        node.is_locked = snapshot.is_locked;
        node.is_hidden = snapshot.is_hidden;
        node.is_selected = snapshot.is_selected;
        node.layer_id = snapshot.layer_id.clone();
        Ok(())
    }

    pub fn find_component_mut(&mut self, id: &str) -> Option<&mut BuilderComponent> {
        find_in_mut(&mut self.roots, id)
    }

    /// Check every structural invariant; used by tests and debug assertions
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        check_list(&self.roots, None, &mut seen)
    }

    fn siblings_mut(&mut self, parent_id: Option<&str>) -> Option<&mut Vec<BuilderComponent>> {
        match parent_id {
            Some(parent_id) => find_in_mut(&mut self.roots, parent_id).map(|node| &mut node.children),
            None => Some(&mut self.roots),
        }
    }
}

fn locate_in(list: &[BuilderComponent], id: &str, parent_id: Option<&str>) -> Option<Location> {
    for (index, node) in list.iter().enumerate() {
        if node.id == id {
            return Some((parent_id.map(str::to_string), index));
        }
        if let Some(found) = locate_in(&node.children, id, Some(&node.id)) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(list: &'a mut [BuilderComponent], id: &str) -> Option<&'a mut BuilderComponent> {
    for node in list.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn walk_into<'a>(node: &'a BuilderComponent, depth: usize, out: &mut Vec<(usize, &'a BuilderComponent)>) {
    out.push((depth, node));
    for child in &node.children {
        walk_into(child, depth + 1, out);
    }
}

fn renumber(list: &mut [BuilderComponent], parent_id: Option<&str>) {
    for (order, node) in list.iter_mut().enumerate() {
        node.order = order;
        node.parent_id = parent_id.map(str::to_string);
    }
}

fn link_children(node: &mut BuilderComponent) {
    let id = node.id.clone();
    renumber(&mut node.children, Some(&id));
    for child in &mut node.children {
        link_children(child);
    }
}

fn validate_list(list: &[BuilderComponent], seen: &mut HashSet<String>) -> Result<(), BuilderError> {
    for node in list {
        if !seen.insert(node.id.clone()) {
            return Err(BuilderError::DuplicateId(node.id.clone()));
        }
        if !node.children.is_empty() && !node.accepts_children() {
            return Err(BuilderError::LeafParent(node.id.clone()));
        }
        validate_list(&node.children, seen)?;
    }
    Ok(())
}

fn check_list(list: &[BuilderComponent], parent: Option<&BuilderComponent>, seen: &mut HashSet<String>) -> bool {
    list.iter().enumerate().all(|(order, node)| {
        let linked = node.parent_id.as_deref() == parent.map(|p| p.id.as_str());
        let leaf_ok = parent.is_none_or(BuilderComponent::accepts_children);
        linked
            && leaf_ok
            && node.order == order
            && seen.insert(node.id.clone())
            && check_list(&node.children, Some(node), seen)
    })
}
