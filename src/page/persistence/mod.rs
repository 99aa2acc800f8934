//! Page persistence: JSON save/load and unsaved-changes tracking.
//!
//! ## Module Structure
//!
//! - [`messages`] - Message types for page operations
//! - [`resources`] - Current page, dirty state and last-error resources
//! - [`io`] - [`save_page`] / [`load_page`] and [`PageError`]
//! - [`systems`] - Save, load and new-page systems
//! - [`dirty`] - Dirty state detection from builder revisions
//!
//! I/O is synchronous; page documents are small.

mod dirty;
mod io;
mod messages;
mod resources;
mod systems;


// Re-exports - Messages
pub use messages::{LoadPageRequest, NewPageRequest, SavePageRequest};

// Re-exports - Resources
pub use resources::{CurrentPage, PageDirtyState, PageLoadError, PageSaveError};

// Re-exports - I/O
pub use io::{load_page, save_page, PageError};

// Re-exports - Systems
pub use dirty::detect_page_changes;
pub use systems::{load_page_system, new_page_system, save_page_system};
