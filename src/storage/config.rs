//! User profile and application configuration.

use crate::navigation::mode::WalkingMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Walking profile used for ETA, calories, and route requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Selected walking intensity
    pub walking_mode: WalkingMode,
    /// Body weight in kilograms, for calorie estimation
    pub body_weight_kg: f64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            walking_mode: WalkingMode::Walk,
            body_weight_kg: 70.0,
        }
    }
}

impl ProfileSettings {
    /// Validate weight value (30-200 kg).
    pub fn validate_weight(weight_kg: f64) -> bool {
        (30.0..=200.0).contains(&weight_kg)
    }
}

/// Class reminder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Master switch for class reminders
    pub class_notifications_enabled: bool,
    /// Minutes subtracted ahead of the depart offset for leave-now alerts
    pub buffer_minutes: i64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            class_notifications_enabled: true,
            buffer_minutes: 5,
        }
    }
}

/// Backend endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the recommendation backend
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Walking profile
    pub profile: ProfileSettings,
    /// Reminder settings
    pub notifications: NotificationSettings,
    /// Backend settings
    pub api: ApiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            profile: ProfileSettings::default(),
            notifications: NotificationSettings::default(),
            api: ApiSettings::default(),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "providenceit", "ClassWalk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from file.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = get_config_path();

    if !path.exists() {
        let config = AppConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        };
        return Ok(config);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = get_data_dir();

    Ok(config)
}

/// Save application configuration to file.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = get_config_path();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
