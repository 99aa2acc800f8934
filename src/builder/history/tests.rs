//! Unit tests for the history module.

use super::action::{ActionKind, StateSnapshot};
use super::history_log::HistoryLog;
use crate::builder::catalog::ComponentFactory;
use crate::builder::component::ComponentType;
use crate::constants::DEFAULT_MAX_HISTORY_SIZE;

fn record(history: &mut HistoryLog, description: &str) -> String {
    let button = ComponentFactory.create(ComponentType::Button);
    history
        .record_action(
            ActionKind::Add,
            description,
            None,
            Some(StateSnapshot::new(button, None, 0)),
        )
        .id
        .clone()
}

#[test]
fn test_empty_history() {
    let mut history = HistoryLog::default();
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.current_index(), None);
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());
    assert_eq!(history.max_size(), DEFAULT_MAX_HISTORY_SIZE);
}

#[test]
fn test_record_advances_pointer() {
    let mut history = HistoryLog::default();
    record(&mut history, "first");
    assert_eq!(history.current_index(), Some(0));
    assert!(history.can_undo());
    assert!(!history.can_redo());

    record(&mut history, "second");
    assert_eq!(history.current_index(), Some(1));
    assert_eq!(history.current_action().unwrap().description, "second");
}

#[test]
fn test_single_action_can_be_undone() {
    let mut history = HistoryLog::default();
    record(&mut history, "only");

    let undone = history.undo().map(|a| a.description.clone());
    assert_eq!(undone.as_deref(), Some("only"));
    assert_eq!(history.current_index(), None);
    assert!(!history.can_undo());
    assert!(history.can_redo());
}

#[test]
fn test_undo_redo_walk() {
    let mut history = HistoryLog::default();
    record(&mut history, "a");
    record(&mut history, "b");
    record(&mut history, "c");

    assert_eq!(history.undo().unwrap().description, "c");
    assert_eq!(history.undo().unwrap().description, "b");
    assert_eq!(history.current_index(), Some(0));
    assert_eq!(history.redo().unwrap().description, "b");
    assert_eq!(history.redo().unwrap().description, "c");
    assert!(history.redo().is_none());
    assert_eq!(history.current_index(), Some(2));
}

#[test]
fn test_record_after_undo_truncates_redo() {
    let mut history = HistoryLog::default();
    record(&mut history, "a");
    record(&mut history, "b");
    record(&mut history, "c");
    history.undo();
    history.undo();

    record(&mut history, "d");
    assert_eq!(history.len(), 2);
    assert!(!history.can_redo());
    assert!(history.redo().is_none());
    let descriptions: Vec<&str> = history
        .actions()
        .iter()
        .map(|a| a.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["a", "d"]);
}

#[test]
fn test_record_after_undoing_everything() {
    let mut history = HistoryLog::default();
    record(&mut history, "a");
    history.undo();
    record(&mut history, "b");
    assert_eq!(history.len(), 1);
    assert_eq!(history.current_index(), Some(0));
}

#[test]
fn test_bounded_history_keeps_most_recent() {
    let mut history = HistoryLog::with_max_size(50);
    for i in 0..51 {
        record(&mut history, &format!("action {i}"));
    }
    assert_eq!(history.len(), 50);
    assert_eq!(history.current_index(), Some(49));
    assert_eq!(history.actions()[0].description, "action 1");
    assert_eq!(history.actions()[49].description, "action 50");
    assert!(!history.can_redo());
}

#[test]
fn test_bounded_history_far_past_cap() {
    let mut history = HistoryLog::with_max_size(5);
    for i in 0..200 {
        record(&mut history, &format!("action {i}"));
        assert!(history.len() <= 5);
    }
    assert_eq!(history.actions()[0].description, "action 195");
    let mut undone = 0;
    while history.undo().is_some() {
        undone += 1;
    }
    assert_eq!(undone, 5);
}

#[test]
fn test_set_max_size_evicts_oldest() {
    let mut history = HistoryLog::default();
    for i in 0..10 {
        record(&mut history, &format!("action {i}"));
    }
    history.undo();
    history.set_max_size(4);
    assert_eq!(history.len(), 4);
    assert_eq!(history.actions()[0].description, "action 6");
    assert_eq!(history.current_index(), Some(2));
    assert!(history.can_redo());
}

#[test]
fn test_zero_max_size_clamped() {
    let mut history = HistoryLog::with_max_size(0);
    record(&mut history, "a");
    assert_eq!(history.len(), 1);
    assert!(history.can_undo());
}

#[test]
fn test_go_to_action() {
    let mut history = HistoryLog::default();
    let first = record(&mut history, "a");
    record(&mut history, "b");
    record(&mut history, "c");

    let action = history.go_to_action(&first).map(|a| a.description.clone());
    assert_eq!(action.as_deref(), Some("a"));
    assert_eq!(history.current_index(), Some(0));
    assert!(history.can_redo());

    assert!(history.go_to_action("action_missing").is_none());
    assert_eq!(history.current_index(), Some(0));
}

#[test]
fn test_visible_actions_and_stats() {
    let mut history = HistoryLog::default();
    record(&mut history, "a");
    record(&mut history, "b");
    history.undo();

    assert_eq!(history.visible_actions().len(), 1);
    let stats = history.stats();
    assert_eq!(stats.total_actions, 2);
    assert_eq!(stats.current_index, Some(0));
    assert!(stats.can_undo);
    assert!(stats.can_redo);
}

#[test]
fn test_clear() {
    let mut history = HistoryLog::default();
    record(&mut history, "a");
    history.clear();
    assert!(history.is_empty());
    assert!(!history.can_undo());
    assert!(history.current_action().is_none());
}

#[test]
fn test_action_ids_unique() {
    let mut history = HistoryLog::default();
    let a = record(&mut history, "a");
    let b = record(&mut history, "b");
    assert_ne!(a, b);
    assert!(a.starts_with("action_"));
}
