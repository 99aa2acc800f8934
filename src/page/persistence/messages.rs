//! Message types for page persistence operations.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct SavePageRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct LoadPageRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct NewPageRequest;
