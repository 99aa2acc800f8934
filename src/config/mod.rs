use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::builder::BuilderState;
use crate::constants::{DEFAULT_MAX_HISTORY_SIZE, MAX_RECENT_PAGES};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_max_history_size() -> usize {
    DEFAULT_MAX_HISTORY_SIZE
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Number of undoable actions kept per editing session
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    /// Last opened page file path (not auto-loaded, just remembered for quick access)
    #[serde(default)]
    pub last_page_path: Option<PathBuf>,

    /// Recently opened pages, most recent first
    #[serde(default)]
    pub recent_pages: Vec<PathBuf>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
            last_page_path: None,
            recent_pages: Vec::new(),
        }
    }
}

impl AppConfigData {
    /// Move `path` to the front of the recent list and remember it as the last page
    pub fn remember_page(&mut self, path: PathBuf) {
        self.recent_pages.retain(|p| p != &path);
        self.recent_pages.insert(0, path.clone());
        self.recent_pages.truncate(MAX_RECENT_PAGES);
        self.last_page_path = Some(path);
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Resource for the "page file missing" warning
#[derive(Resource, Default)]
pub struct MissingPageWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to record a page as last opened and recent
#[derive(Message)]
pub struct UpdateLastPagePathRequest {
    pub path: PathBuf,
}

/// Message to change the history cap; applied to the live session too
#[derive(Message)]
pub struct SetMaxHistorySizeRequest {
    pub max_size: usize,
}

/// Result of loading config from disk
struct LoadConfigResult {
    data: AppConfigData,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Load configuration from disk
fn load_config(config_path: &Path) -> LoadConfigResult {
    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded config from {:?}", config_path);
                    (data, None)
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}", e);
                    (
                        AppConfigData::default(),
                        Some(format!("Configuration file was corrupted: {}", e)),
                    )
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    LoadConfigResult { data, reset_reason }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config(&config.config_path);
    config.data = result.data;
    config.dirty = false;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check if last page exists
fn check_last_page_exists(config: Res<AppConfig>, mut warning: ResMut<MissingPageWarning>) {
    if let Some(ref path) = config.data.last_page_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        info!("Last opened page no longer exists: {:?}", path);
    }
}

/// Startup system to size the session history from config
fn apply_history_size(config: Res<AppConfig>, state: Option<ResMut<BuilderState>>) {
    if let Some(mut state) = state {
        state.set_max_history_size(config.data.max_history_size);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to update last page path and the recent list
fn update_last_page_path_system(
    mut events: MessageReader<UpdateLastPagePathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.remember_page(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

fn set_max_history_size_system(
    mut events: MessageReader<SetMaxHistorySizeRequest>,
    mut config: ResMut<AppConfig>,
    state: Option<ResMut<BuilderState>>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    let Some(max_size) = events.read().last().map(|e| e.max_size.max(1)) else {
        return;
    };
    config.data.max_history_size = max_size;
    config.dirty = true;
    if let Some(mut state) = state {
        state.set_max_history_size(max_size);
    }
    save_events.write(SaveConfigRequest);
    info!("History size set to {}", max_size);
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<MissingPageWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastPagePathRequest>()
            .add_message::<SetMaxHistorySizeRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_last_page_exists, apply_history_size)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    update_last_page_path_system.run_if(on_message::<UpdateLastPagePathRequest>),
                    set_max_history_size_system.run_if(on_message::<SetMaxHistorySizeRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
