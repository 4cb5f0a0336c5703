//! Nut glyph outlines.

use crate::cell_config::CellNut;
use crate::surface::Point;
use magnetpnp_core::NutType;

/// Pixels of glyph per unit of thread size
pub const THREAD_TO_PIXELS: f64 = 5.0;

/// Extra pixels added to a box's background outline so the part glyph
/// leaves a rim of it visible
pub const OUTLINE_MARGIN: f64 = 2.0;

/// Hexagon radius as a fraction of the glyph size
const HEX_RADIUS_FACTOR: f64 = 0.45;

/// Hole radius as a fraction of the glyph size
const HOLE_FACTOR: f64 = 1.0 / 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphShape {
    Hex,
    Square,
}

impl From<NutType> for GlyphShape {
    fn from(nut: NutType) -> Self {
        match nut {
            NutType::HexNut => GlyphShape::Hex,
            NutType::SquareNut => GlyphShape::Square,
        }
    }
}

impl From<CellNut> for GlyphShape {
    fn from(nut: CellNut) -> Self {
        match nut {
            CellNut::Hex => GlyphShape::Hex,
            CellNut::Square => GlyphShape::Square,
        }
    }
}

/// Glyph size in pixels of a part with the given thread.
pub fn part_glyph_size(thread: f64) -> f64 {
    thread * THREAD_TO_PIXELS
}

/// Size of the empty-box outline cut for the given thread.
pub fn box_outline_size(thread: f64) -> f64 {
    thread * THREAD_TO_PIXELS + OUTLINE_MARGIN
}

/// Radius of the hole punched into a part glyph.
pub fn hole_radius(size: f64) -> f64 {
    size * HOLE_FACTOR
}

/// Corner points of a glyph of `size` centered on `center`.
///
/// The hexagon has a vertex straight below the center and its corners at
/// 60 degree steps; the square is axis aligned with side `size`.
pub fn outline(shape: GlyphShape, center: Point, size: f64) -> Vec<Point> {
    match shape {
        GlyphShape::Hex => {
            let radius = size * HEX_RADIUS_FACTOR;
            (0..6)
                .map(|step| {
                    let angle = f64::from(step * 60).to_radians();
                    Point::new(
                        center.x + angle.sin() * radius,
                        center.y + angle.cos() * radius,
                    )
                })
                .collect()
        }
        GlyphShape::Square => {
            let half = size / 2.0;
            vec![
                Point::new(center.x - half, center.y - half),
                Point::new(center.x + half, center.y - half),
                Point::new(center.x + half, center.y + half),
                Point::new(center.x - half, center.y + half),
            ]
        }
    }
}
