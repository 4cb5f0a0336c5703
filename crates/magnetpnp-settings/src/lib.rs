//! MagnetPNP Settings Crate
//!
//! Handles tray, nozzle, and camera configuration and its persistence.

pub mod config;
pub mod error;

pub use config::{CameraSettings, Config, MachinePosition, NozzleSettings, TraySettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
