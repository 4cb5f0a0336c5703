//! Configuration and settings management for MagnetPNP
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in the platform config directory.
//!
//! Configuration is organized into logical sections:
//! - Tray geometry (position on the bed, grid, box and rim sizes, per-box layout)
//! - Magnetic nozzle (offset, pressure depth, tool number, magnet G-code)
//! - Bed camera position used as the alignment station
//! - Feed rate for pick-and-place moves

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Thread size written into the generated default box layout
const DEFAULT_BOX_THREAD: f64 = 3.0;

/// Tray settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraySettings {
    /// X offset of the tray corner on the bed (mm)
    pub x: f64,
    /// Y offset of the tray corner on the bed (mm)
    pub y: f64,
    /// Z height of the tray floor (mm)
    pub z: f64,
    /// Number of box rows
    pub rows: u32,
    /// Number of box columns
    pub columns: u32,
    /// Inner box size (mm)
    pub boxsize: f64,
    /// Wall thickness between boxes (mm)
    pub rimsize: f64,
    /// Per-box layout as serialized JSON, column-major
    #[serde(default)]
    pub box_configuration: String,
}

impl TraySettings {
    /// Number of boxes in the tray
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Builds a box layout giving every box a hex outline of the default thread.
    pub fn default_box_configuration(columns: u32, rows: u32) -> String {
        let entry = serde_json::json!({ "thread": DEFAULT_BOX_THREAD, "nut": "hex" });
        let entries = vec![entry; columns as usize * rows as usize];
        serde_json::Value::Array(entries).to_string()
    }

    /// Returns the configured box layout, generating the default one when unset.
    pub fn effective_box_configuration(&self) -> String {
        if self.box_configuration.trim().is_empty() {
            Self::default_box_configuration(self.columns, self.rows)
        } else {
            self.box_configuration.clone()
        }
    }
}

impl Default for TraySettings {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rows: 5,
            columns: 5,
            boxsize: 10.0,
            rimsize: 1.0,
            box_configuration: Self::default_box_configuration(5, 5),
        }
    }
}

/// Magnetic nozzle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NozzleSettings {
    /// X offset from the print head origin (mm)
    pub x: f64,
    /// Y offset from the print head origin (mm)
    pub y: f64,
    /// How far the nozzle presses into a part when gripping (mm)
    pub z_pressure: f64,
    /// Tool number selected before picking
    pub extruder_nr: u32,
    /// G-code that energizes the magnet, one command per line
    pub grip_magnet_gcode: String,
    /// G-code that releases the magnet
    pub release_magnet_gcode: String,
    /// G-code that lowers the nozzle into working position
    #[serde(default)]
    pub lower_nozzle_gcode: String,
    /// G-code that lifts the nozzle out of the way
    #[serde(default)]
    pub lift_nozzle_gcode: String,
}

impl Default for NozzleSettings {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z_pressure: 0.0,
            extruder_nr: 2,
            grip_magnet_gcode: "M42 P48 S255".to_string(),
            release_magnet_gcode: "M42 P48 S0".to_string(),
            lower_nozzle_gcode: String::new(),
            lift_nozzle_gcode: String::new(),
        }
    }
}

/// A fixed position on the machine (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MachinePosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Camera settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Bed camera, used as the stop between pick and place
    pub bed: MachinePosition,
}

fn default_feedrate() -> f64 {
    4000.0
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Feed rate for pick-and-place moves (mm/min)
    #[serde(default = "default_feedrate")]
    pub feedrate: f64,
    /// Tray settings
    pub tray: TraySettings,
    /// Magnetic nozzle settings
    #[serde(default)]
    pub nozzle: NozzleSettings,
    /// Camera settings
    #[serde(default)]
    pub camera: CameraSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feedrate: default_feedrate(),
            tray: TraySettings::default(),
            nozzle: NozzleSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDirectory)?;
        Ok(dir.join("magnetpnp").join("config.toml"))
    }

    /// Load config from `path`, or return the defaults when the file is missing
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        // Validate tray settings
        if self.tray.rows == 0 {
            return Err(invalid("tray.rows", "must be > 0"));
        }

        if self.tray.columns == 0 {
            return Err(invalid("tray.columns", "must be > 0"));
        }

        if self.tray.boxsize <= 0.0 {
            return Err(invalid("tray.boxsize", "must be > 0"));
        }

        if self.tray.rimsize < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "tray.rimsize".to_string(),
                value: self.tray.rimsize.to_string(),
            }
            .into());
        }

        if !self.tray.box_configuration.trim().is_empty() {
            let entries: Vec<serde_json::Value> =
                serde_json::from_str(&self.tray.box_configuration).map_err(|e| {
                    invalid("tray.box_configuration", &e.to_string())
                })?;
            if entries.len() != self.tray.capacity() {
                return Err(ConfigError::BoxCountMismatch {
                    expected: self.tray.capacity(),
                    actual: entries.len(),
                }
                .into());
            }
        }

        // Validate motion settings
        if self.feedrate <= 0.0 {
            return Err(invalid("feedrate", "must be > 0"));
        }

        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Supported config file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tray.capacity(), 25);
        assert_eq!(config.nozzle.extruder_nr, 2);
        assert_eq!(config.feedrate, 4000.0);
    }

    #[test]
    fn test_default_box_configuration_covers_tray() {
        let json = TraySettings::default_box_configuration(3, 2);
        let entries: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0]["nut"], "hex");
    }

    #[test]
    fn test_box_count_mismatch_rejected() {
        let mut config = Config::default();
        config.tray.rows = 4;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::BoxCountMismatch {
                expected: 20,
                actual: 25
            })
        ));
    }

    #[test]
    fn test_empty_box_configuration_falls_back() {
        let mut config = Config::default();
        config.tray.columns = 2;
        config.tray.rows = 2;
        config.tray.box_configuration = String::new();
        assert!(config.validate().is_ok());

        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&config.tray.effective_box_configuration()).unwrap();
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.tray.boxsize = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tray.rimsize = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.feedrate = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Config::default()
            .save_to_file(Path::new("settings.yaml"))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::UnsupportedFormat(_))
        ));
    }
}
