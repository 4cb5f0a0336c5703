//! Settings errors.

use std::io;
use thiserror::Error;

/// Failure to read, write or accept a settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    #[error("Failed to save settings: {0}")]
    SaveError(String),

    /// A value the tray or nozzle cannot work with, e.g. zero rows.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Structural problems with a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Only `.json` and `.toml` files are understood.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    /// The box layout must hold one entry per tray box.
    #[error("Box configuration has {actual} entries, tray needs {expected}")]
    BoxCountMismatch { expected: usize, actual: usize },

    #[error("No configuration directory on this platform")]
    NoConfigDirectory,
}

pub type SettingsResult<T> = Result<T, SettingsError>;
