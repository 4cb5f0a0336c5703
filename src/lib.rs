//! # MagnetPNP
//!
//! Parts tray view and pick-and-place host for placing magnetic nuts into
//! 3D prints.
//!
//! ## Architecture
//!
//! MagnetPNP is organized as a workspace with multiple crates:
//!
//! 1. **magnetpnp-core** - Part model, printer state, host messages, errors
//! 2. **magnetpnp-settings** - Tray, nozzle and camera configuration
//! 3. **magnetpnp-tray** - Tray geometry, rendering, hit-testing, view controller
//! 4. **magnetpnp-communication** - `M361` codec, command channel, G-code part
//!    extraction, sequencer
//! 5. **magnetpnp** - Logging setup and the command-line front end
//!
//! ## Features
//!
//! - **Tray View**: grid of boxes drawn with the nut outline each box is cut for
//! - **Selection**: click a box to highlight its part, double-click to fetch it
//! - **Pick and Place**: `M361 P<id>` expands into pick, align and place moves
//! - **Output**: PNG via tiny-skia or SVG

pub mod cli;

pub use magnetpnp_communication::{
    load_gcode, load_gcode_file, simulate, Destination, FileLoad, HookOutcome, JobAction,
    PartCatalog, PartRecord, PartTable, PickPlaceCommand, PickPlaceSequencer,
    QueuedCommandChannel, SequenceTranscript, SequencerState, SYNC_MARKER,
};

pub use magnetpnp_core::{
    CellPosition, CommandChannel, CommandError, Error, HostMessage, NutType, PartDescriptor,
    PartFileError, PartId, PrinterState, Result, SequencerError, TrayError, TrayPart,
};

pub use magnetpnp_settings::{Config, SettingsError};

pub use magnetpnp_tray::{
    CellConfigTable, PixmapSurface, RecordingSurface, Surface, SvgSurface, TrayController,
    TrayEngine, TrayGrid, TrayLayout,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so command output on stdout stays clean
/// - RUST_LOG environment variable support, `info` by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
