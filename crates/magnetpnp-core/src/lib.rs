//! # MagnetPNP Core
//!
//! Core types, traits, and errors for MagnetPNP.
//! Provides the part model, the printer connection state, the messages
//! the printer host pushes to the tray view, and the outbound command
//! channel abstraction.

pub mod channel;
pub mod data;
pub mod error;
pub mod events;
pub mod part;

pub use channel::CommandChannel;

pub use data::PrinterState;

pub use error::{CommandError, Error, PartFileError, Result, SequencerError, TrayError};

pub use events::{
    ErrorPayload, FilePayload, HostMessage, InfoPayload, OperationPayload, PLUGIN_NAME,
};

pub use part::{CellPosition, NutType, PartDescriptor, PartId, TrayPart};
