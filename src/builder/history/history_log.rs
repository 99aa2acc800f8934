//! Bounded linear history log.

use tracing::debug;

use super::action::{ActionKind, HistoryAction, StateSnapshot};
use crate::constants::DEFAULT_MAX_HISTORY_SIZE;

/// Counters for a history timeline display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_actions: usize,
    pub current_index: Option<usize>,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Linear undo/redo log with a size cap
#[derive(Debug, Clone)]
pub struct HistoryLog {
    actions: Vec<HistoryAction>,
    /// Index of the last applied action
    current: Option<usize>,
    max_size: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_max_size(DEFAULT_MAX_HISTORY_SIZE)
    }
}

impl HistoryLog {
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            actions: Vec::new(),
            current: None,
            max_size: max_size.max(1),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Change the cap, evicting the oldest actions if the log is now too long
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(1);
        if self.actions.len() > self.max_size {
            let excess = self.actions.len() - self.max_size;
            self.actions.drain(..excess);
            self.current = self.current.and_then(|index| index.checked_sub(excess));
        }
    }

    /// Append a new action, discarding anything ahead of the pointer.
    ///
    /// Past the cap the oldest action is evicted; the pointer then stays on
    /// the last slot instead of advancing.
    pub fn record_action(
        &mut self,
        kind: ActionKind,
        description: impl Into<String>,
        before_state: Option<StateSnapshot>,
        after_state: Option<StateSnapshot>,
    ) -> &HistoryAction {
        let keep = self.current.map_or(0, |index| index + 1);
        if keep < self.actions.len() {
            debug!("Discarding {} redo action(s)", self.actions.len() - keep);
        }
        self.actions.truncate(keep);

        let action = HistoryAction::new(kind, description, before_state, after_state);
        debug!("Recorded {} action: {}", kind.label(), action.description);
        self.actions.push(action);

        if self.actions.len() > self.max_size {
            self.actions.remove(0);
        }
        let last = self.actions.len() - 1;
        self.current = Some(last);
        &self.actions[last]
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_index() < self.actions.len()
    }

    /// Step back: returns the action to revert (apply its before state)
    pub fn undo(&mut self) -> Option<&HistoryAction> {
        let index = self.current?;
        self.current = index.checked_sub(1);
        self.actions.get(index)
    }

    /// Step forward: returns the action to re-apply (apply its after state)
    pub fn redo(&mut self) -> Option<&HistoryAction> {
        let index = self.next_index();
        if index >= self.actions.len() {
            return None;
        }
        self.current = Some(index);
        self.actions.get(index)
    }

    /// Move the pointer straight onto an action (timeline jump)
    pub fn go_to_action(&mut self, action_id: &str) -> Option<&HistoryAction> {
        let index = self.position_of(action_id)?;
        self.current = Some(index);
        self.actions.get(index)
    }

    pub fn position_of(&self, action_id: &str) -> Option<usize> {
        self.actions.iter().position(|action| action.id == action_id)
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.current = None;
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The last applied action
    pub fn current_action(&self) -> Option<&HistoryAction> {
        self.current.and_then(|index| self.actions.get(index))
    }

    pub fn actions(&self) -> &[HistoryAction] {
        &self.actions
    }

    /// Applied actions, oldest first
    pub fn visible_actions(&self) -> &[HistoryAction] {
        &self.actions[..self.next_index()]
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_actions: self.actions.len(),
            current_index: self.current,
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    fn next_index(&self) -> usize {
        self.current.map_or(0, |index| index + 1)
    }
}
