//! Resource types for page persistence state tracking.

use bevy::prelude::*;
use std::path::PathBuf;

use crate::page::Page;

/// The open page document.
///
/// `page.components` is left empty while the page is open; the live forest
/// belongs to [`BuilderState`](crate::builder::BuilderState) and is copied in
/// on save.
#[derive(Resource, Default)]
pub struct CurrentPage {
    pub page: Page,
    /// File the page was loaded from or last saved to
    pub path: Option<PathBuf>,
}

/// Resource tracking if the current page has unsaved changes
#[derive(Resource, Default)]
pub struct PageDirtyState {
    pub is_dirty: bool,
    /// Builder revision at the last save/load/new
    pub clean_revision: u64,
}

impl PageDirtyState {
    pub fn mark_clean(&mut self, revision: u64) {
        self.is_dirty = false;
        self.clean_revision = revision;
    }
}

#[derive(Resource, Default)]
pub struct PageLoadError {
    pub message: Option<String>,
}

/// Resource tracking save operation errors for display to user.
#[derive(Resource, Default)]
pub struct PageSaveError {
    pub message: Option<String>,
}
