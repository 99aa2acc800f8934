mod page_data;
pub mod persistence;

pub use page_data::{Page, PageMetadata, PageStatus};
pub use persistence::{
    CurrentPage, LoadPageRequest, NewPageRequest, PageDirtyState, PageError, PageLoadError,
    PageSaveError, SavePageRequest, load_page, save_page,
};

use bevy::prelude::*;

use crate::builder::{BuilderState, BuilderSystems};

pub struct PagePlugin;

impl Plugin for PagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentPage>()
            .init_resource::<PageDirtyState>()
            .init_resource::<PageLoadError>()
            .init_resource::<PageSaveError>()
            .add_message::<SavePageRequest>()
            .add_message::<LoadPageRequest>()
            .add_message::<NewPageRequest>()
            .add_systems(
                Update,
                (
                    persistence::new_page_system.run_if(on_message::<NewPageRequest>),
                    persistence::load_page_system.run_if(on_message::<LoadPageRequest>),
                    persistence::save_page_system.run_if(on_message::<SavePageRequest>),
                    persistence::detect_page_changes
                        .run_if(resource_changed::<BuilderState>),
                )
                    .chain()
                    .after(BuilderSystems::Apply)
                    .before(BuilderSystems::Notify),
            );
    }
}
