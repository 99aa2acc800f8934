//! Session-level tests: recording operations, replay and the Bevy plugin.

use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;

fn heading_text(state: &BuilderState, id: &str) -> Option<String> {
    state
        .find_component_by_id(id)
        .and_then(|c| c.text().map(str::to_string))
}

/// section > [heading, card > [button]], paragraph
fn sample_state() -> (BuilderState, Vec<String>) {
    let mut state = BuilderState::default();
    let section = state.add_new(ComponentType::Section, None, None).unwrap();
    let heading = state
        .add_new(ComponentType::Heading, Some(&section), None)
        .unwrap();
    let card = state.add_new(ComponentType::Card, Some(&section), None).unwrap();
    let button = state.add_new(ComponentType::Button, Some(&card), None).unwrap();
    let paragraph = state.add_new(ComponentType::Paragraph, None, None).unwrap();
    (state, vec![section, heading, card, button, paragraph])
}

#[test]
fn test_add_select_delete_scenario() {
    let mut state = BuilderState::default();
    let id = state.add_new(ComponentType::Button, None, None).unwrap();
    assert_eq!(state.components().len(), 1);
    assert!(id.starts_with("comp_"));

    state.select(&id, SelectionMode::Single);
    assert!(state.is_selected(&id));

    state.remove_component(&id).unwrap();
    assert!(state.components().is_empty());
    assert!(!state.selection().has_selection());

    let kinds: Vec<ActionKind> = state.history().actions().iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Add, ActionKind::Remove]);
    assert!(state.can_undo());
    assert!(!state.can_redo());
}

#[test]
fn test_update_then_undo_scenario() {
    let mut state = BuilderState::default();
    let id = state.add_new(ComponentType::Heading, None, None).unwrap();
    assert_eq!(heading_text(&state, &id).as_deref(), Some("Heading"));

    state
        .update_component(&id, &ComponentUpdate::default().with_content("text", "Hello"))
        .unwrap();
    assert_eq!(heading_text(&state, &id).as_deref(), Some("Hello"));

    assert_eq!(state.undo(), Some(ActionKind::Update));
    assert_eq!(heading_text(&state, &id).as_deref(), Some("Heading"));
    assert!(state.can_redo());

    assert_eq!(state.redo(), Some(ActionKind::Update));
    assert_eq!(heading_text(&state, &id).as_deref(), Some("Hello"));
}

#[test]
fn test_single_add_can_be_undone_to_empty() {
    let mut state = BuilderState::default();
    state.add_new(ComponentType::Image, None, None).unwrap();
    assert_eq!(state.undo(), Some(ActionKind::Add));
    assert!(state.components().is_empty());
    assert!(!state.can_undo());
    assert_eq!(state.undo(), None);
}

/// Run `mutate`, then check undo restores the old tree and redo the new one
fn assert_inverse_law(state: &mut BuilderState, mutate: impl FnOnce(&mut BuilderState)) {
    let before = state.tree().clone();
    mutate(state);
    let after = state.tree().clone();
    assert_ne!(before, after, "mutation should change the tree");
    assert!(after.is_consistent());

    state.undo();
    assert_eq!(state.tree(), &before);
    state.redo();
    assert_eq!(state.tree(), &after);
}

#[test]
fn test_inverse_law_add_nested() {
    let (mut state, ids) = sample_state();
    let card = ids[2].clone();
    assert_inverse_law(&mut state, |s| {
        s.add_new(ComponentType::Icon, Some(&card), Some(0)).unwrap();
    });
}

#[test]
fn test_inverse_law_remove_middle_child() {
    let (mut state, ids) = sample_state();
    let heading = ids[1].clone();
    assert_inverse_law(&mut state, |s| {
        s.remove_component(&heading).unwrap();
    });
}

#[test]
fn test_inverse_law_remove_subtree() {
    let (mut state, ids) = sample_state();
    let section = ids[0].clone();
    assert_inverse_law(&mut state, |s| {
        let removed = s.remove_component(&section).unwrap();
        assert_eq!(removed.subtree_len(), 4);
    });
}

#[test]
fn test_inverse_law_update() {
    let (mut state, ids) = sample_state();
    let button = ids[3].clone();
    assert_inverse_law(&mut state, |s| {
        let update = ComponentUpdate::default()
            .with_style("color", "red")
            .with_display_name("Buy")
            .hidden(true);
        s.update_component(&button, &update).unwrap();
    });
}

#[test]
fn test_inverse_law_move_across_parents() {
    let (mut state, ids) = sample_state();
    let (card, paragraph) = (ids[2].clone(), ids[4].clone());
    assert_inverse_law(&mut state, |s| {
        s.move_component(&paragraph, Some(&card), 0).unwrap();
    });
    assert_eq!(
        state.tree().find_parent_id(&paragraph).as_deref(),
        Some(card.as_str())
    );
}

#[test]
fn test_inverse_law_move_within_siblings() {
    let (mut state, ids) = sample_state();
    let heading = ids[1].clone();
    let section = ids[0].clone();
    assert_inverse_law(&mut state, |s| {
        s.move_component(&heading, Some(&section), 1).unwrap();
    });
}

#[test]
fn test_inverse_law_move_to_root() {
    let (mut state, ids) = sample_state();
    let button = ids[3].clone();
    assert_inverse_law(&mut state, |s| {
        s.move_component(&button, None, 0).unwrap();
    });
}

#[test]
fn test_inverse_law_duplicate() {
    let (mut state, ids) = sample_state();
    let card = ids[2].clone();
    assert_inverse_law(&mut state, |s| {
        s.duplicate_component(&card).unwrap();
    });
}

#[test]
fn test_duplicate_lands_after_source() {
    let (mut state, ids) = sample_state();
    let (section, card) = (ids[0].clone(), ids[2].clone());
    let copy = state.duplicate_component(&card).unwrap();

    assert_eq!(state.tree().find_component_index(&copy, Some(&section)), Some(2));
    let node = state.find_component_by_id(&copy).unwrap();
    assert!(node.display_name.ends_with("(copy)"));
    assert_eq!(node.children.len(), 1);
    assert_ne!(node.children[0].id, ids[3]);
    assert!(state.tree().is_consistent());
}

#[test]
fn test_move_cycle_guard() {
    let (mut state, ids) = sample_state();
    let (section, card, paragraph) = (ids[0].clone(), ids[2].clone(), ids[4].clone());
    let before = state.tree().clone();
    let history_len = state.history().len();

    let result = state.move_component(&section, Some(&card), 0);
    assert!(matches!(result, Err(BuilderError::MoveIntoOwnSubtree { .. })));
    let result = state.move_component(&card, Some(&card), 0);
    assert!(matches!(result, Err(BuilderError::MoveIntoOwnSubtree { .. })));
    let result = state.move_component(&card, Some(&paragraph), 0);
    assert_eq!(result, Err(BuilderError::LeafParent(paragraph.clone())));

    assert_eq!(state.tree(), &before);
    assert_eq!(state.history().len(), history_len);
}

#[test]
fn test_unknown_ids_leave_state_untouched() {
    let (mut state, _) = sample_state();
    let before = state.tree().clone();
    let history_len = state.history().len();

    assert!(matches!(
        state.remove_component("ghost"),
        Err(BuilderError::ComponentNotFound(_))
    ));
    assert!(state
        .update_component("ghost", &ComponentUpdate::default().locked(true))
        .is_err());
    assert!(state.move_component("ghost", None, 0).is_err());
    assert!(state.duplicate_component("ghost").is_err());
    assert!(matches!(
        state.add_new(ComponentType::Button, Some("ghost"), None),
        Err(BuilderError::ParentNotFound(_))
    ));

    assert_eq!(state.tree(), &before);
    assert_eq!(state.history().len(), history_len);
}

#[test]
fn test_noop_update_and_move_not_recorded() {
    let (mut state, ids) = sample_state();
    let history_len = state.history().len();
    state
        .update_component(&ids[1], &ComponentUpdate::default())
        .unwrap();
    let location = state.tree().locate(&ids[4]).unwrap();
    state.move_component(&ids[4], None, location.1).unwrap();
    assert_eq!(state.history().len(), history_len);
}

#[test]
fn test_new_edit_after_undo_truncates_redo() {
    let (mut state, ids) = sample_state();
    state.undo();
    state.undo();
    assert!(state.can_redo());

    state.add_new(ComponentType::Divider, Some(&ids[0]), None).unwrap();
    assert!(!state.can_redo());
    assert_eq!(state.redo(), None);
    assert_eq!(state.history().len(), 4);
}

#[test]
fn test_undo_all_then_redo_all() {
    let (mut state, _) = sample_state();
    let full = state.tree().clone();
    while state.undo().is_some() {}
    assert!(state.components().is_empty());
    while state.redo().is_some() {}
    assert_eq!(state.tree(), &full);
}

#[test]
fn test_go_to_action() {
    let (mut state, _) = sample_state();
    let second = state.history().actions()[1].id.clone();
    let last = state.history().actions()[4].id.clone();

    assert!(state.go_to_action(&second));
    assert_eq!(state.tree().len(), 2);
    assert!(state.go_to_action(&last));
    assert_eq!(state.tree().len(), 5);
    assert!(!state.go_to_action("action_missing"));
}

#[test]
fn test_removing_subtree_prunes_selection() {
    let (mut state, ids) = sample_state();
    state.select(&ids[3], SelectionMode::Single);
    state.select(&ids[4], SelectionMode::Multi);
    state.remove_component(&ids[2]).unwrap();

    assert!(!state.is_selected(&ids[3]));
    assert!(state.is_selected(&ids[4]));
    assert_eq!(state.selection().last_selected(), Some(ids[4].as_str()));
}

#[test]
fn test_range_selection_uses_tree_order() {
    let (mut state, ids) = sample_state();
    state.select(&ids[1], SelectionMode::Single);
    state.select(&ids[4], SelectionMode::Range);
    // heading, card, button, paragraph
    assert_eq!(state.selection().count(), 4);
    let selected: Vec<&str> = state
        .selected_components()
        .into_iter()
        .map(|c| c.id.as_str())
        .collect();
    let expected: Vec<&str> = ids[1..].iter().map(String::as_str).collect();
    assert_eq!(selected, expected);

    state.select("ghost", SelectionMode::Single);
    assert_eq!(state.selection().count(), 4);
}

#[test]
fn test_history_cap_on_session() {
    let mut state = BuilderState::with_history_size(3);
    for _ in 0..5 {
        state.add_new(ComponentType::Divider, None, None).unwrap();
    }
    let mut undone = 0;
    while state.undo().is_some() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(state.components().len(), 2);
}

#[test]
fn test_set_components_resets_history() {
    let (mut state, _) = sample_state();
    let roots = state.tree().clone().into_roots();
    let revision = state.revision();

    state.set_components(roots).unwrap();
    assert!(!state.can_undo());
    assert_eq!(state.tree().len(), 5);
    assert!(state.revision() > revision);

    state.clear();
    assert!(state.components().is_empty());
}

#[test]
fn test_set_components_rejects_broken_forest() {
    let (mut state, _) = sample_state();
    let revision = state.revision();
    let factory = ComponentFactory;

    let mut container = factory.create(ComponentType::Container);
    container.id = "dup".to_string();
    let mut button = factory.create(ComponentType::Button);
    button.id = "dup".to_string();
    let result = state.set_components(vec![container, button]);
    assert_eq!(result, Err(BuilderError::DuplicateId("dup".to_string())));

    let mut leaf = factory.create(ComponentType::Button);
    leaf.children.push(factory.create(ComponentType::Heading));
    let leaf_id = leaf.id.clone();
    let result = state.set_components(vec![leaf]);
    assert_eq!(result, Err(BuilderError::LeafParent(leaf_id)));

    // The open session is untouched
    assert_eq!(state.tree().len(), 5);
    assert!(state.can_undo());
    assert_eq!(state.revision(), revision);
    assert!(state.tree().is_consistent());
}

#[test]
fn test_random_edit_sequence_stays_consistent() {
    let (mut state, _) = sample_state();
    // Deterministic pseudo-random walk over the recording operations
    let mut seed: u64 = 0x5eed;
    for _ in 0..200 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let ids = state.tree().flattened_ids();
        let pick = |n: u64| (seed >> 33) as usize % n.max(1) as usize;
        let target = ids.get(pick(ids.len() as u64)).cloned();
        let other = ids.get(pick(ids.len() as u64 + 7) % ids.len().max(1)).cloned();
        match (seed >> 60) % 5 {
            0 => {
                let _ = state.add_new(ComponentType::Container, target.as_deref(), Some(0));
            }
            1 => {
                if let Some(id) = target {
                    let _ = state.remove_component(&id);
                }
            }
            2 => {
                if let Some(id) = target {
                    let _ = state.move_component(&id, other.as_deref(), 1);
                }
            }
            3 => {
                state.undo();
            }
            _ => {
                state.redo();
            }
        }
        assert!(state.tree().is_consistent());
    }
}

// Plugin tests

fn builder_app() -> App {
    let mut app = App::new();
    app.add_plugins(BuilderPlugin);
    app.update();
    app
}

fn changed_messages(app: &App) -> Vec<BuilderChanged> {
    let messages = app.world().resource::<Messages<BuilderChanged>>();
    messages.get_cursor().read(messages).cloned().collect()
}

#[test]
fn test_plugin_undo_redo_requests() {
    let mut app = builder_app();
    let id = app
        .world_mut()
        .resource_mut::<BuilderState>()
        .add_new(ComponentType::Button, None, None)
        .unwrap();
    app.update();

    app.world_mut().write_message(UndoRequest);
    app.update();
    assert!(app.world().resource::<BuilderState>().components().is_empty());

    app.world_mut().write_message(RedoRequest);
    app.update();
    let state = app.world().resource::<BuilderState>();
    assert!(state.find_component_by_id(&id).is_some());
}

#[test]
fn test_plugin_jump_and_clear_requests() {
    let mut app = builder_app();
    let first = {
        let mut state = app.world_mut().resource_mut::<BuilderState>();
        state.add_new(ComponentType::Section, None, None).unwrap();
        state.add_new(ComponentType::Divider, None, None).unwrap();
        state.history().actions()[0].id.clone()
    };

    app.world_mut().write_message(JumpToActionRequest { action_id: first });
    app.update();
    assert_eq!(app.world().resource::<BuilderState>().components().len(), 1);

    app.world_mut()
        .resource_mut::<LayerStates>()
        .set_expanded("anything", true);
    app.world_mut()
        .resource_mut::<LayerGroups>()
        .initialize_default_layer();
    app.world_mut().write_message(ClearBuilderRequest);
    app.update();
    let state = app.world().resource::<BuilderState>();
    assert!(state.components().is_empty());
    assert!(state.history().is_empty());
    assert_eq!(*app.world().resource::<LayerStates>(), LayerStates::default());
    assert!(app.world().resource::<LayerGroups>().is_empty());
}

#[test]
fn test_plugin_jump_to_current_action_publishes_nothing() {
    let mut app = builder_app();
    let current = {
        let mut state = app.world_mut().resource_mut::<BuilderState>();
        state.add_new(ComponentType::Section, None, None).unwrap();
        state.add_new(ComponentType::Divider, None, None).unwrap();
        state.history().actions()[1].id.clone()
    };
    app.update();
    app.update();
    app.update();
    assert!(changed_messages(&app).is_empty());
    let revision = app.world().resource::<BuilderState>().revision();

    app.world_mut().write_message(JumpToActionRequest {
        action_id: current,
    });
    app.update();
    assert!(changed_messages(&app).is_empty());
    assert_eq!(app.world().resource::<BuilderState>().revision(), revision);

    app.world_mut().write_message(JumpToActionRequest {
        action_id: "action_missing".to_string(),
    });
    app.update();
    assert!(changed_messages(&app).is_empty());
}

#[test]
fn test_plugin_forgets_outline_rows_of_removed_components() {
    let mut app = builder_app();
    let (section, button, container) = {
        let mut state = app.world_mut().resource_mut::<BuilderState>();
        let section = state.add_new(ComponentType::Section, None, None).unwrap();
        let button = state
            .add_new(ComponentType::Button, Some(&section), None)
            .unwrap();
        let container = state.add_new(ComponentType::Container, None, None).unwrap();
        (section, button, container)
    };
    {
        let mut layers = app.world_mut().resource_mut::<LayerStates>();
        layers.expand_to_component(&button, std::slice::from_ref(&section));
        layers.set_expanded(&container, true);
    }
    app.update();
    assert_eq!(app.world().resource::<LayerStates>().len(), 3);

    app.world_mut()
        .resource_mut::<BuilderState>()
        .remove_component(&section)
        .unwrap();
    app.update();
    let layers = app.world().resource::<LayerStates>();
    assert_eq!(layers.len(), 1);
    assert!(layers.is_expanded(&container));
    assert!(!layers.is_expanded(&section));
}

#[test]
fn test_reassign_layer_is_undoable() {
    let (mut state, ids) = sample_state();
    let mut groups = LayerGroups::default();
    let hero = groups.create_layer(CreateLayerOptions::default()).id;
    let body = groups.create_layer(CreateLayerOptions::default()).id;
    for id in &ids[1..3] {
        state
            .update_component(id, &ComponentUpdate::default().with_layer(Some(&hero)))
            .unwrap();
    }
    state
        .update_component(&ids[4], &ComponentUpdate::default().with_layer(Some(&body)))
        .unwrap();

    let merged = groups
        .merge_layers(&[hero.clone(), body.clone()], "content")
        .unwrap();
    let moved = state.reassign_layer(&[hero, body], Some(&merged.id));
    assert_eq!(moved, 3);
    assert_eq!(groups.stats(&merged.id, state.tree()).component_count, 3);

    // Every reassignment is its own history entry
    for _ in 0..3 {
        assert!(state.undo().is_some());
    }
    assert_eq!(groups.stats(&merged.id, state.tree()).component_count, 0);
    assert_eq!(state.reassign_layer(&[merged.id.clone()], None), 0);
}

#[test]
fn test_plugin_notifies_changes() {
    let mut app = builder_app();
    assert!(changed_messages(&app).is_empty());

    app.world_mut()
        .resource_mut::<BuilderState>()
        .add_new(ComponentType::Heading, None, None)
        .unwrap();
    app.update();
    let changes = changed_messages(&app);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].component_count, 1);
    assert!(changes[0].history.can_undo);

    // A redo with nothing to redo publishes nothing
    app.update();
    app.update();
    app.world_mut().write_message(RedoRequest);
    app.update();
    assert!(changed_messages(&app).is_empty());
}
