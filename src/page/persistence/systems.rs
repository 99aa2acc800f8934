//! Save, load and new-page systems.

use bevy::prelude::*;
use tracing::{error, info};

use crate::builder::{BuilderState, LayerGroups, LayerStates};
use crate::config::UpdateLastPagePathRequest;
use crate::page::Page;

use super::io::{load_page, save_page};
use super::messages::{LoadPageRequest, NewPageRequest, SavePageRequest};
use super::resources::{CurrentPage, PageDirtyState, PageLoadError, PageSaveError};

/// Write the live component forest into the current page and save it
pub fn save_page_system(
    mut events: MessageReader<SavePageRequest>,
    state: Res<BuilderState>,
    groups: Res<LayerGroups>,
    mut current_page: ResMut<CurrentPage>,
    mut dirty_state: ResMut<PageDirtyState>,
    mut save_error: ResMut<PageSaveError>,
    mut config_events: MessageWriter<UpdateLastPagePathRequest>,
) {
    for event in events.read() {
        let mut page = current_page.page.clone();
        page.components = state.components().to_vec();
        page.layer_groups = groups.groups().to_vec();

        match save_page(&mut page, &event.path) {
            Ok(()) => {
                page.components.clear();
                page.layer_groups.clear();
                current_page.page = page;
                current_page.path = Some(event.path.clone());
                dirty_state.mark_clean(state.revision());
                save_error.message = None;
                config_events.write(UpdateLastPagePathRequest {
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                error!("{}", e);
                save_error.message = Some(e.to_string());
            }
        }
    }
}

/// Replace the open page; the builder history starts over
pub fn load_page_system(
    mut events: MessageReader<LoadPageRequest>,
    mut state: ResMut<BuilderState>,
    mut layers: ResMut<LayerStates>,
    mut groups: ResMut<LayerGroups>,
    mut current_page: ResMut<CurrentPage>,
    mut dirty_state: ResMut<PageDirtyState>,
    mut load_error: ResMut<PageLoadError>,
    mut config_events: MessageWriter<UpdateLastPagePathRequest>,
) {
    for event in events.read() {
        let mut page = match load_page(&event.path) {
            Ok(page) => page,
            Err(e) => {
                // The open page stays as it was
                error!("{}", e);
                load_error.message = Some(e.to_string());
                continue;
            }
        };

        if let Err(e) = state.set_components(std::mem::take(&mut page.components)) {
            error!("Rejected page {:?}: {}", event.path, e);
            load_error.message = Some(format!("Invalid page {:?}: {}", event.path, e));
            continue;
        }
        layers.clear();
        groups.set_groups(std::mem::take(&mut page.layer_groups));
        info!(
            "Loaded page {:?} ({} components) from {:?}",
            page.name,
            state.tree().len(),
            event.path
        );

        current_page.page = page;
        current_page.path = Some(event.path.clone());
        dirty_state.mark_clean(state.revision());
        load_error.message = None;
        config_events.write(UpdateLastPagePathRequest {
            path: event.path.clone(),
        });
    }
}

pub fn new_page_system(
    mut events: MessageReader<NewPageRequest>,
    mut state: ResMut<BuilderState>,
    mut layers: ResMut<LayerStates>,
    mut groups: ResMut<LayerGroups>,
    mut current_page: ResMut<CurrentPage>,
    mut dirty_state: ResMut<PageDirtyState>,
) {
    for _ in events.read() {
        state.clear();
        layers.clear();
        groups.clear();
        current_page.page = Page::default();
        current_page.path = None;
        dirty_state.mark_clean(state.revision());
        info!("Created new page");
    }
}
