use bevy::prelude::*;
use bevy::window::WindowCloseRequested;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::MAX_RECENT_SKETCHES;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_true() -> bool {
    true
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Roof-detection service endpoint. Detection is disabled when unset.
    #[serde(default)]
    pub detection_endpoint: Option<String>,

    /// Material catalog JSON path. The built-in catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Last saved/loaded sketch file (not auto-loaded, just remembered)
    #[serde(default)]
    pub last_sketch_path: Option<PathBuf>,

    /// Recently opened sketches for quick access
    #[serde(default)]
    pub recent_sketches: Vec<PathBuf>,

    /// Whether drawing snaps segment angles to the axis/relative candidates
    #[serde(default = "default_true")]
    pub angle_snap_enabled: bool,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            detection_endpoint: None,
            catalog_path: None,
            last_sketch_path: None,
            recent_sketches: Vec::new(),
            angle_snap_enabled: true,
        }
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
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

/// Live snap toggle, seeded from config at startup and persisted on change.
#[derive(Resource)]
pub struct SnapSettings {
    pub angle_snap: bool,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self { angle_snap: true }
    }
}

/// Resource for the "sketch file missing" warning dialog
#[derive(Resource, Default)]
pub struct MissingSketchWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to update the last sketch path in config
#[derive(Message)]
pub struct UpdateLastSketchPathRequest {
    pub path: PathBuf,
}

/// Message to add a sketch to the recent list
#[derive(Message)]
pub struct AddRecentSketchRequest {
    pub path: PathBuf,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Result of loading config from disk
struct LoadConfigResult {
    config: AppConfig,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Load configuration from disk
fn load_config() -> LoadConfigResult {
    let config_path = get_config_path();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
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

    LoadConfigResult {
        config: AppConfig {
            data,
            config_path,
            dirty: false,
        },
        reset_reason,
    }
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

/// Startup system to load config from disk into the existing resources
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut snap: ResMut<SnapSettings>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let result = load_config();
    config.data = result.config.data;
    config.config_path = result.config.config_path;
    config.dirty = result.config.dirty;
    snap.angle_snap = config.data.angle_snap_enabled;

    if config.data.detection_endpoint.is_none() {
        info!("No detection endpoint configured, roof detection disabled");
    }

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check if the last sketch still exists
fn check_last_sketch_exists(config: Res<AppConfig>, mut warning: ResMut<MissingSketchWarning>) {
    if let Some(ref path) = config.data.last_sketch_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        info!("Last opened sketch no longer exists: {:?}", path);
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

/// System to update last sketch path
fn update_last_sketch_path_system(
    mut events: MessageReader<UpdateLastSketchPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.last_sketch_path = Some(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

/// System to add a sketch to the recent list
fn add_recent_sketch_system(
    mut events: MessageReader<AddRecentSketchRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        // Remove if already in list (to move it to front)
        config.data.recent_sketches.retain(|p| p != &event.path);

        // Add to front
        config.data.recent_sketches.insert(0, event.path.clone());

        // Trim to max size
        config.data.recent_sketches.truncate(MAX_RECENT_SKETCHES);

        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

/// Persists the live snap toggle whenever the UI flips it.
fn persist_snap_setting(
    snap: Res<SnapSettings>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    if snap.is_changed()
        && !snap.is_added()
        && config.data.angle_snap_enabled != snap.angle_snap
    {
        config.data.angle_snap_enabled = snap.angle_snap;
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

/// Flushes a dirty config synchronously when the window is closing, since
/// the message-driven save may not get another frame to run.
fn flush_config_on_close(
    mut close_events: MessageReader<WindowCloseRequested>,
    mut config: ResMut<AppConfig>,
) {
    if close_events.read().next().is_some() && config.dirty {
        save_config(&config);
        config.dirty = false;
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<SnapSettings>()
            .init_resource::<MissingSketchWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastSketchPathRequest>()
            .add_message::<AddRecentSketchRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_last_sketch_exists)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    update_last_sketch_path_system
                        .run_if(on_message::<UpdateLastSketchPathRequest>),
                    add_recent_sketch_system.run_if(on_message::<AddRecentSketchRequest>),
                    persist_snap_setting,
                    flush_config_on_close.run_if(on_message::<WindowCloseRequested>),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert!(data.detection_endpoint.is_none());
        assert!(data.recent_sketches.is_empty());
        assert!(data.last_sketch_path.is_none());
        assert!(data.angle_snap_enabled);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            detection_endpoint: Some("https://detect.example.com/roofs".into()),
            catalog_path: Some(PathBuf::from("/path/to/catalog.json")),
            last_sketch_path: Some(PathBuf::from("/path/to/roof.json")),
            recent_sketches: vec![PathBuf::from("/path/one"), PathBuf::from("/path/two")],
            angle_snap_enabled: false,
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.detection_endpoint, data.detection_endpoint);
        assert_eq!(parsed.catalog_path, data.catalog_path);
        assert_eq!(parsed.recent_sketches, data.recent_sketches);
        assert!(!parsed.angle_snap_enabled);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: AppConfigData = serde_json::from_str("{}").unwrap();
        assert!(parsed.angle_snap_enabled, "snap defaults on");
        assert!(parsed.detection_endpoint.is_none());
    }
}
