//! # MagnetPNP Communication
//!
//! The printer-host side of pick-and-place: the `M361` command codec, a
//! queued command channel for the tray view, the part catalog of the loaded
//! file and its extraction from G-code, and the sequencer that turns a
//! request into printer moves.

pub mod catalog;
pub mod channel;
pub mod part_file;
pub mod pick_place;
pub mod sequencer;
pub mod tray_position;

pub use catalog::{Destination, PartCatalog, PartRecord, PartTable};
pub use channel::QueuedCommandChannel;
pub use part_file::{extract_markup, load_gcode, load_gcode_file, parse_parts, FileLoad};
pub use pick_place::{is_sync_marker, PickPlaceCommand, PICK_PLACE_CODE, SYNC_MARKER};
pub use sequencer::{
    settle_block, simulate, HookOutcome, JobAction, PickPlaceSequencer, SequenceTranscript,
    SequencerState,
};
pub use tray_position::box_center;
