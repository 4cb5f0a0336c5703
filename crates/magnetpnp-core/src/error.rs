//! Error handling for MagnetPNP
//!
//! Provides error types for all layers of the application:
//! - Tray errors (cell configuration, part placement, drawing surface)
//! - Command errors (outbound command channel, `M361` parsing)
//! - Sequencer errors (pick-and-place state machine)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Tray error type
///
/// Represents errors raised by the tray engine while it is constructed,
/// while parts are registered, or when the drawing surface is queried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrayError {
    /// The per-cell configuration could not be decoded
    #[error("Invalid cell configuration: {reason}")]
    MalformedConfig {
        /// The decoder's description of the problem.
        reason: String,
    },

    /// The per-cell configuration does not cover the grid exactly
    #[error("Cell configuration has {actual} entries, grid {columns}x{rows} needs {expected}")]
    ConfigSizeMismatch {
        /// Number of grid columns.
        columns: u32,
        /// Number of grid rows.
        rows: u32,
        /// Number of entries the grid requires.
        expected: usize,
        /// Number of entries that were supplied.
        actual: usize,
    },

    /// A grid parameter is zero or negative
    #[error("Invalid grid parameter '{name}': {value}")]
    InvalidGrid {
        /// The parameter name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A part's position index does not address a cell of the grid
    #[error("Part {part_id} position {position} is outside the tray (1..={capacity})")]
    OutOfRange {
        /// The offending part id.
        part_id: u32,
        /// The 1-based position index the host supplied.
        position: u32,
        /// Number of cells in the tray.
        capacity: u32,
    },

    /// The drawing surface or its context cannot be obtained
    #[error("Drawing surface unavailable: {reason}")]
    SurfaceUnavailable {
        /// Why the surface could not be used.
        reason: String,
    },

    /// The surface is too small to give every cell at least one pixel
    #[error("Surface {width}x{height} is too small for a {columns}x{rows} tray")]
    DegenerateSurface {
        /// Surface width in pixels.
        width: u32,
        /// Surface height in pixels.
        height: u32,
        /// Number of grid columns.
        columns: u32,
        /// Number of grid rows.
        rows: u32,
    },
}

impl TrayError {
    /// Whether this error only means "nothing can be drawn right now".
    ///
    /// Resize and detach transients fall in this class; callers keep the
    /// registry and redraw once the surface comes back.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TrayError::SurfaceUnavailable { .. } | TrayError::DegenerateSurface { .. }
        )
    }
}

/// Command error type
///
/// Represents errors on the outbound command path to the printer host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command channel no longer accepts commands
    #[error("Command channel is closed")]
    ChannelClosed,

    /// A pick-and-place command line could not be parsed
    #[error("Malformed pick-and-place command '{line}': {reason}")]
    Malformed {
        /// The raw command line.
        line: String,
        /// The reason parsing failed.
        reason: String,
    },
}

/// Sequencer error type
///
/// Represents errors raised while expanding a pick-and-place request
/// into printer moves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequencerError {
    /// No catalog entry exists for the requested part
    #[error("Part {part_id} is not in the loaded file")]
    UnknownPart {
        /// The requested part id.
        part_id: u32,
    },

    /// The catalog has no placement destination for the part
    #[error("Part {part_id} has no placement destination")]
    MissingDestination {
        /// The requested part id.
        part_id: u32,
    },

    /// The part's tray position cannot be mapped onto the configured tray
    #[error("Part {part_id} position {position} does not fit a tray with {columns} columns")]
    InvalidTrayPosition {
        /// The requested part id.
        part_id: u32,
        /// The position index from the catalog.
        position: u32,
        /// Configured tray columns.
        columns: u32,
    },
}

/// Part file error type
///
/// Raised while reading the part description embedded in a G-code file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartFileError {
    /// The embedded markup is not well-formed
    #[error("{0}")]
    Xml(String),

    /// A required attribute is absent
    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute or element value could not be understood
    #[error("<{element}> has invalid {attribute} '{value}'")]
    InvalidValue {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    #[error("Part {0} is described twice")]
    DuplicatePart(u32),
}

/// Main error type for MagnetPNP
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Tray error
    #[error(transparent)]
    Tray(#[from] TrayError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Sequencer error
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    /// Part file error
    #[error("XML parsing error: {0}")]
    PartFile(#[from] PartFileError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a tray error
    pub fn is_tray_error(&self) -> bool {
        matches!(self, Error::Tray(_))
    }

    /// Check if this is a command error
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::Command(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
