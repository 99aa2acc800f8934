//! Headless core of a visual page builder.
//!
//! A page is a forest of [`builder::BuilderComponent`] nodes edited through
//! [`builder::BuilderState`], which records every mutation in a bounded
//! undo/redo log and tracks the current selection. The Bevy plugins host that
//! state in an `App`: [`builder::BuilderPlugin`] for the session,
//! [`page::PagePlugin`] for JSON documents and [`config::ConfigPlugin`] for
//! user settings.

pub mod builder;
pub mod config;
pub mod constants;
pub mod page;
pub mod paths;
pub mod script;
