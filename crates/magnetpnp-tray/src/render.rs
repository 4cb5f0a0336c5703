//! Tray painter
//! Paints the box grid and part glyphs onto a [`Surface`].
//!
//! Drawing is layered per box:
//! - box outline and cleared interior
//! - background outline of the nut the box is cut for
//! - part glyph with its hole and name label, when a part sits in the box

use crate::cell_config::CellConfigTable;
use crate::geometry::{TrayLayout, BOX_LINE_WIDTH};
use crate::glyph::{self, GlyphShape};
use crate::surface::{Color, Rect, Surface, TextStyle};
use magnetpnp_core::{CellPosition, TrayPart};

const OUTLINE_LINE_WIDTH: f64 = 1.0;

/// Paints one frame of the tray for a fixed layout.
///
/// A painter is built per redraw; the layout it carries reflects the
/// surface size at the time the redraw started.
pub struct TrayPainter<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    layout: &'a TrayLayout,
    cells: &'a CellConfigTable,
    label_style: TextStyle,
}

impl<'a, S: Surface + ?Sized> TrayPainter<'a, S> {
    pub fn new(surface: &'a mut S, layout: &'a TrayLayout, cells: &'a CellConfigTable) -> Self {
        Self {
            surface,
            layout,
            cells,
            label_style: TextStyle::default(),
        }
    }

    /// Clears the surface and paints every box empty.
    pub fn paint_tray(&mut self) {
        let size = self.layout.surface_size();
        let frame = Rect::new(0.0, 0.0, f64::from(size.width), f64::from(size.height));
        self.surface.fill_rect(frame, Color::WHITE);
        self.surface
            .stroke_rect(frame, Color::BLACK, OUTLINE_LINE_WIDTH);

        let grid = *self.layout.grid();
        for column in 1..=grid.columns() {
            for row in 1..=grid.rows() {
                self.paint_box(CellPosition::new(column, row));
            }
        }
    }

    /// Paints one box empty, erasing whatever glyph it held.
    pub fn paint_box(&mut self, cell: CellPosition) {
        self.surface
            .stroke_rect(self.layout.box_outline(cell), Color::BLACK, BOX_LINE_WIDTH);
        self.surface
            .fill_rect(self.layout.box_interior(cell), Color::WHITE);

        if let Some(entry) = self.cells.get(cell) {
            let points = glyph::outline(
                GlyphShape::from(entry.nut),
                self.layout.cell_center(cell),
                glyph::box_outline_size(entry.thread),
            );
            self.surface
                .stroke_polygon(&points, Color::BLACK, OUTLINE_LINE_WIDTH);
        }
    }

    /// Repaints a part's box and draws the part glyph in `color`.
    pub fn paint_part(&mut self, part: &TrayPart, color: Color) {
        self.paint_box(part.cell);

        let center = self.layout.cell_center(part.cell);
        let size = glyph::part_glyph_size(part.descriptor.thread);
        let points = glyph::outline(GlyphShape::from(part.descriptor.nut_type), center, size);
        self.surface.fill_polygon(&points, color);
        self.surface
            .fill_circle(center, glyph::hole_radius(size), Color::WHITE);
        self.surface.fill_text(
            &part.descriptor.name,
            self.layout.label_anchor(part.cell),
            &self.label_style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::TrayGrid;
    use crate::surface::{DrawCommand, RecordingSurface, SurfaceSize};
    use magnetpnp_core::{NutType, PartDescriptor};

    fn setup() -> (TrayLayout, CellConfigTable) {
        let grid = TrayGrid::new(2, 2, 10.0).unwrap();
        let layout = grid.layout(SurfaceSize::new(104, 104)).unwrap();
        let cells = CellConfigTable::parse(
            r#"[{"thread":3,"nut":"hex"},{"thread":4,"nut":"square"},
                {"thread":5,"nut":"hex"},{"thread":6,"nut":"square"}]"#,
            2,
            2,
        )
        .unwrap();
        (layout, cells)
    }

    #[test]
    fn test_paint_tray_draws_every_box() {
        let (layout, cells) = setup();
        let mut surface = RecordingSurface::new(104, 104);
        TrayPainter::new(&mut surface, &layout, &cells).paint_tray();

        let outlines = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePolygon { .. }))
            .count();
        assert_eq!(outlines, 4);
        assert!(matches!(
            surface.commands()[0],
            DrawCommand::FillRect {
                color: Color::WHITE,
                ..
            }
        ));
    }

    #[test]
    fn test_box_outline_follows_cell_config() {
        let (layout, cells) = setup();
        let mut surface = RecordingSurface::new(104, 104);
        // column 1, row 2 is entry 1: square, thread 4
        TrayPainter::new(&mut surface, &layout, &cells).paint_box(CellPosition::new(1, 2));

        let points = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::StrokePolygon { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[1].x - points[0].x, 22.0);
    }

    #[test]
    fn test_paint_part_uses_part_shape_and_label() {
        let (layout, cells) = setup();
        let mut surface = RecordingSurface::new(104, 104);
        let part = TrayPart {
            descriptor: PartDescriptor::new(7, "M3 nut", 3.0, NutType::HexNut, 1),
            cell: CellPosition::new(1, 1),
        };
        TrayPainter::new(&mut surface, &layout, &cells).paint_part(&part, Color::HIGHLIGHT);

        let center = layout.cell_center(part.cell);
        assert_eq!(surface.color_at(center), Some(Color::WHITE));
        let off_hole = crate::surface::Point::new(center.x + 4.0, center.y);
        assert_eq!(surface.color_at(off_hole), Some(Color::HIGHLIGHT));
        assert_eq!(surface.texts(), vec!["M3 nut"]);
    }
}
