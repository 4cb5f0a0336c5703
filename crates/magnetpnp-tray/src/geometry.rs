//! Tray geometry and coordinate mapping.
//!
//! Handles conversion between surface pixels (origin top-left, Y down) and
//! logical cells (1-based column and row, row 1 at the bottom of the
//! surface). The cell size is derived from the live surface size so the
//! mapping follows the canvas when its container is resized.

use crate::surface::{Point, Rect, SurfaceSize};
use magnetpnp_core::{CellPosition, TrayError};

/// Pixels kept free around the tray for the outer border
pub const BORDER: f64 = 4.0;

/// Outline width of a box
pub const BOX_LINE_WIDTH: f64 = 4.0;

/// Grid dimensions, fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayGrid {
    columns: u32,
    rows: u32,
    nominal_cell_size: f64,
}

impl TrayGrid {
    pub fn new(columns: u32, rows: u32, nominal_cell_size: f64) -> Result<Self, TrayError> {
        if columns == 0 {
            return Err(TrayError::InvalidGrid {
                name: "columns",
                value: columns.to_string(),
            });
        }
        if rows == 0 {
            return Err(TrayError::InvalidGrid {
                name: "rows",
                value: rows.to_string(),
            });
        }
        if !nominal_cell_size.is_finite() || nominal_cell_size <= 0.0 {
            return Err(TrayError::InvalidGrid {
                name: "nominal_cell_size",
                value: nominal_cell_size.to_string(),
            });
        }
        Ok(Self {
            columns,
            rows,
            nominal_cell_size,
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn nominal_cell_size(&self) -> f64 {
        self.nominal_cell_size
    }

    /// Number of cells in the grid
    pub fn capacity(&self) -> u32 {
        self.columns * self.rows
    }

    /// Cell addressed by a 1-based linear position, `None` outside the grid.
    pub fn cell_for_position(&self, position: u32) -> Option<CellPosition> {
        CellPosition::from_position_index(position, self.columns)
            .filter(|cell| cell.is_within(self.columns, self.rows))
    }

    /// Whole-pixel cell size that fits the grid into `size`:
    /// `floor(min((width - 4) / columns, (height - 4) / rows))`.
    pub fn cell_pixel_size(&self, size: SurfaceSize) -> f64 {
        let by_width = (f64::from(size.width) - BORDER) / f64::from(self.columns);
        let by_height = (f64::from(size.height) - BORDER) / f64::from(self.rows);
        by_width.min(by_height).floor()
    }

    /// Lays the grid out on a surface of the given size.
    pub fn layout(&self, size: SurfaceSize) -> Result<TrayLayout, TrayError> {
        let cell = self.cell_pixel_size(size);
        if cell < 1.0 {
            return Err(TrayError::DegenerateSurface {
                width: size.width,
                height: size.height,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(TrayLayout {
            grid: *self,
            size,
            cell,
        })
    }
}

/// A grid laid out on a surface of a particular size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayLayout {
    grid: TrayGrid,
    size: SurfaceSize,
    cell: f64,
}

impl TrayLayout {
    pub fn grid(&self) -> &TrayGrid {
        &self.grid
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    /// Edge length of one cell in pixels
    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    /// Ratio of the pixel cell size to the nominal (physical) box size.
    pub fn glyph_scale(&self) -> f64 {
        self.cell / self.grid.nominal_cell_size
    }

    /// Top-left pixel corner of a cell's slot, before outline insets.
    fn slot_origin(&self, cell: CellPosition) -> Point {
        let column = f64::from(cell.column) - 1.0;
        let row = f64::from(cell.row) - 1.0;
        let rows = f64::from(self.grid.rows);
        Point::new(column * self.cell, (rows - 1.0 - row) * self.cell)
    }

    /// Rectangle the box outline is stroked along.
    pub fn box_outline(&self, cell: CellPosition) -> Rect {
        let origin = self.slot_origin(cell);
        let half = BOX_LINE_WIDTH / 2.0;
        Rect::new(
            origin.x + half,
            origin.y + half,
            self.cell - half,
            self.cell - half,
        )
    }

    /// Rectangle cleared to the background inside the box outline.
    pub fn box_interior(&self, cell: CellPosition) -> Rect {
        let origin = self.slot_origin(cell);
        Rect::new(
            origin.x + BOX_LINE_WIDTH,
            origin.y + BOX_LINE_WIDTH,
            self.cell - BOX_LINE_WIDTH,
            self.cell - BOX_LINE_WIDTH,
        )
    }

    /// Center of a box, where the nut glyphs are drawn.
    pub fn cell_center(&self, cell: CellPosition) -> Point {
        let origin = self.slot_origin(cell);
        let half = BOX_LINE_WIDTH / 2.0;
        Point::new(
            origin.x + half + self.cell / 2.0,
            origin.y + half + self.cell / 2.0,
        )
    }

    /// Top-left anchor of a part's name label.
    pub fn label_anchor(&self, cell: CellPosition) -> Point {
        let origin = self.slot_origin(cell);
        Point::new(origin.x + BORDER, origin.y + BORDER)
    }

    /// Resolves a pixel to the cell under it.
    ///
    /// Uses `col = floor(x / (cell + 1)) + 1` and
    /// `row = floor((rows * cell - y) / (cell - 1)) + 1`; the Y axis is
    /// inverted because row 1 is at the bottom. Returns `None` for pixels
    /// that resolve outside the grid and for cells too small to divide by.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<CellPosition> {
        if self.cell <= 1.0 || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let rows = f64::from(self.grid.rows);
        let column = (x / (self.cell + 1.0)).floor() + 1.0;
        let row = ((rows * self.cell - y) / (self.cell - 1.0)).floor() + 1.0;

        if column < 1.0
            || row < 1.0
            || column > f64::from(self.grid.columns)
            || row > rows
        {
            return None;
        }
        Some(CellPosition::new(column as u32, row as u32))
    }
}
