// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language
//! - `[playback]` - Volume, sync interval, seek step
//! - `[overlay]` - Controls overlay auto-hide timeout
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir` or set `ICED_PLAYER_CONFIG_DIR`
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_player::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.general.language = Some("fr".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;
pub mod paths;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Playback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    /// Playback volume (0.0 to 1.0).
    #[serde(default = "default_volume", skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    /// Interval between position sync ticks, in milliseconds.
    #[serde(
        default = "default_sync_interval_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub sync_interval_ms: Option<u64>,

    /// Rewind/fast-forward step in seconds (arrow keys).
    #[serde(
        default = "default_seek_step_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub seek_step_secs: Option<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            sync_interval_ms: default_sync_interval_ms(),
            seek_step_secs: default_seek_step_secs(),
        }
    }
}

/// Controls overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    /// Inactivity period before the controls hide, in milliseconds.
    #[serde(
        default = "default_overlay_timeout_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_ms: Option<u64>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_overlay_timeout_ms(),
        }
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_volume() -> Option<f32> {
    Some(DEFAULT_VOLUME)
}

fn default_sync_interval_ms() -> Option<u64> {
    Some(DEFAULT_SYNC_INTERVAL_MS)
}

fn default_seek_step_secs() -> Option<f64> {
    Some(DEFAULT_SEEK_STEP_SECS)
}

fn default_overlay_timeout_ms() -> Option<u64> {
    Some(DEFAULT_OVERLAY_TIMEOUT_MS)
}

// =============================================================================
// Load Functions
// =============================================================================

fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning to show the user.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "falling back to default config");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Stores `volume` in the settings file of a custom directory.
///
/// Other settings are preserved. A file that failed to parse is left
/// untouched so hand edits survive; returns `Ok(false)` in that case.
pub fn persist_volume_with_override(volume: f32, base_dir: Option<PathBuf>) -> Result<bool> {
    let (mut config, warning) = load_with_override(base_dir.clone());
    if warning.is_some() {
        tracing::warn!("settings file unreadable, volume not saved");
        return Ok(false);
    }
    config.playback.volume = Some(volume);
    save_with_override(&config, base_dir)?;
    Ok(true)
}

/// Stores `volume` in the default settings file.
pub fn persist_volume(volume: f32) -> Result<bool> {
    persist_volume_with_override(volume, None)
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
            },
            playback: PlaybackConfig {
                volume: Some(0.6),
                sync_interval_ms: Some(250),
                seek_step_secs: Some(5.0),
            },
            overlay: OverlayConfig {
                timeout_ms: Some(2_000),
            },
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_reports_warning_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[playback\nvolume = ")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
    }

    #[test]
    fn load_with_override_missing_file_is_silent_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[playback]\nvolume = 0.9\n").expect("failed to write toml");

        let loaded = load_from_path(&config_path).expect("failed to load config");
        assert_eq!(loaded.playback.volume, Some(0.9));
        assert_eq!(
            loaded.playback.sync_interval_ms,
            Some(DEFAULT_SYNC_INTERVAL_MS)
        );
        assert_eq!(loaded.overlay.timeout_ms, Some(DEFAULT_OVERLAY_TIMEOUT_MS));
        assert!(loaded.general.language.is_none());
    }

    #[test]
    fn save_with_override_creates_parent_directories() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let nested = temp_dir.path().join("deep").join("path");

        save_with_override(&Config::default(), Some(nested.clone()))
            .expect("save should create directories");
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn persisting_volume_keeps_other_settings() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "[general]\nlanguage = \"fr\"\n[playback]\nvolume = 0.2\n",
        )
        .expect("failed to write toml");

        let saved = persist_volume_with_override(0.7, Some(temp_dir.path().to_path_buf()))
            .expect("save should succeed");

        assert!(saved);
        let loaded = load_from_path(&temp_dir.path().join(CONFIG_FILE)).expect("reload");
        assert_eq!(loaded.playback.volume, Some(0.7));
        assert_eq!(loaded.general.language.as_deref(), Some("fr"));
    }

    #[test]
    fn persisting_volume_leaves_unreadable_file_untouched() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        let hand_edited = "[playback\nvolume = 0.4\nlanguage = \"de\"";
        fs::write(&config_path, hand_edited).expect("failed to write invalid toml");

        let saved = persist_volume_with_override(0.9, Some(temp_dir.path().to_path_buf()))
            .expect("skipping is not an error");

        assert!(!saved);
        let on_disk = fs::read_to_string(&config_path).expect("file still readable");
        assert_eq!(on_disk, hand_edited);
    }

    #[test]
    fn persisting_volume_creates_missing_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let saved = persist_volume_with_override(0.3, Some(temp_dir.path().to_path_buf()))
            .expect("save should succeed");

        assert!(saved);
        let loaded = load_from_path(&temp_dir.path().join(CONFIG_FILE)).expect("reload");
        assert_eq!(loaded.playback.volume, Some(0.3));
    }
}
