//! # MagnetPNP Tray
//!
//! Geometry, rendering and hit-testing for the parts tray.
//!
//! ## Architecture
//!
//! ```text
//! TrayController (host messages, pointer events, pick command)
//!   └── TrayEngine (part registry, selection)
//!         ├── TrayGrid / TrayLayout (cell size, pixel <-> cell)
//!         ├── CellConfigTable (per-box nut outline)
//!         └── TrayPainter (boxes, outlines, part glyphs)
//!               └── Surface (recording, tiny-skia pixmap, SVG)
//! ```
//!
//! Cells are addressed by 1-based column and row with row 1 at the bottom
//! of the surface. Parts are placed by a 1-based position that runs row by
//! row; the per-box layout is stored column by column.

pub mod cell_config;
pub mod controller;
pub mod engine;
mod fonts;
pub mod geometry;
pub mod glyph;
pub mod pixmap;
pub mod render;
pub mod surface;
pub mod svg;

pub use cell_config::{CellConfig, CellConfigTable, CellNut};
pub use controller::{TrayController, NO_FILE_STATUS};
pub use engine::TrayEngine;
pub use geometry::{TrayGrid, TrayLayout};
pub use glyph::GlyphShape;
pub use pixmap::PixmapSurface;
pub use render::TrayPainter;
pub use surface::{Color, DrawCommand, Point, Rect, RecordingSurface, Surface, SurfaceSize, TextStyle};
pub use svg::SvgSurface;
