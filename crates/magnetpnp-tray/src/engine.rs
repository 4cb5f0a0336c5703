//! Tray engine
//!
//! Owns the grid, the per-box layout, the part registry and the drawing
//! surface. Every draw and hit-test derives the cell size from the
//! surface's live size, so the engine follows container resizes without
//! being rebuilt.
//!
//! When the surface cannot be drawn on (detached, or too small for one
//! pixel per cell) paint calls are skipped and logged, while the registry
//! keeps being updated. [`TrayEngine::layout`] reports the reason to
//! callers that want it.

use crate::cell_config::CellConfigTable;
use crate::geometry::{TrayGrid, TrayLayout};
use crate::render::TrayPainter;
use crate::surface::{Color, Surface};
use magnetpnp_core::{CellPosition, PartDescriptor, PartId, TrayError, TrayPart};

pub struct TrayEngine<S: Surface> {
    grid: TrayGrid,
    cells: CellConfigTable,
    surface: S,
    /// Registered parts in insertion order
    parts: Vec<TrayPart>,
    highlighted: Option<PartId>,
}

impl<S: Surface> TrayEngine<S> {
    /// Builds an engine for a `columns` x `rows` tray.
    ///
    /// `cell_config_json` must decode to exactly one entry per box. Nothing
    /// is drawn until the first [`erase`](Self::erase) or part.
    pub fn new(
        columns: u32,
        rows: u32,
        nominal_cell_size: f64,
        surface: S,
        cell_config_json: &str,
    ) -> Result<Self, TrayError> {
        let grid = TrayGrid::new(columns, rows, nominal_cell_size)?;
        let cells = CellConfigTable::parse(cell_config_json, columns, rows)?;
        Ok(Self::with_cells(grid, cells, surface))
    }

    /// Builds an engine from an already validated layout.
    pub fn with_cells(grid: TrayGrid, cells: CellConfigTable, surface: S) -> Self {
        tracing::debug!(
            "Tray engine created for {}x{} grid",
            grid.columns(),
            grid.rows()
        );
        Self {
            grid,
            cells,
            surface,
            parts: Vec::new(),
            highlighted: None,
        }
    }

    pub fn grid(&self) -> &TrayGrid {
        &self.grid
    }

    pub fn cells(&self) -> &CellConfigTable {
        &self.cells
    }

    /// Layout for the surface's current size.
    pub fn layout(&self) -> Result<TrayLayout, TrayError> {
        let size = self.surface.size()?;
        self.grid.layout(size)
    }

    /// Empties the registry and repaints the whole tray.
    pub fn erase(&mut self) {
        self.parts.clear();
        self.highlighted = None;
        self.repaint();
    }

    /// Registers a part and paints its box.
    ///
    /// A part with an id already in the registry replaces the old entry;
    /// if it moved, its previous box is painted empty. Positions outside
    /// the grid are rejected and leave the registry untouched.
    pub fn add_part(&mut self, descriptor: PartDescriptor) -> Result<CellPosition, TrayError> {
        let cell = self
            .grid
            .cell_for_position(descriptor.position)
            .ok_or(TrayError::OutOfRange {
                part_id: descriptor.id.value(),
                position: descriptor.position,
                capacity: self.grid.capacity(),
            })?;

        let part = TrayPart { descriptor, cell };
        let id = part.id();
        let vacated = match self.parts.iter().position(|p| p.id() == id) {
            Some(index) => {
                let previous = std::mem::replace(&mut self.parts[index], part);
                (previous.cell != cell).then_some(previous.cell)
            }
            None => {
                self.parts.push(part);
                None
            }
        };
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }

        tracing::debug!("Part {} registered at {}", id, cell);

        let Some(layout) = self.drawable_layout() else {
            return Ok(cell);
        };
        let mut painter = TrayPainter::new(&mut self.surface, &layout, &self.cells);
        if let Some(old_cell) = vacated {
            if !self.parts.iter().any(|p| p.cell == old_cell) {
                painter.paint_box(old_cell);
            }
        }
        if let Some(part) = self.parts.iter().find(|p| p.id() == id) {
            painter.paint_part(part, Color::PART);
        }
        Ok(cell)
    }

    /// Resolves a pixel to a part and highlights it.
    ///
    /// Every registered part is first repainted unselected, so at most one
    /// part is highlighted afterwards. Returns `None` when the pixel is
    /// outside the grid, lands on an empty box, or the surface cannot be
    /// used.
    pub fn select_part(&mut self, x: f64, y: f64) -> Option<PartId> {
        self.highlighted = None;
        let layout = self.drawable_layout()?;
        let cell = layout.hit_test(x, y);

        let mut painter = TrayPainter::new(&mut self.surface, &layout, &self.cells);
        for part in &self.parts {
            painter.paint_part(part, Color::PART);
        }

        let part = self.parts.iter().find(|p| Some(p.cell) == cell)?;
        painter.paint_part(part, Color::HIGHLIGHT);
        self.highlighted = Some(part.id());

        tracing::debug!("Selected part {} at {}", part.id(), part.cell);
        self.highlighted
    }

    /// Repaints the tray and every registered part, keeping the highlight.
    pub fn repaint(&mut self) {
        let Some(layout) = self.drawable_layout() else {
            return;
        };
        tracing::debug!(
            "Repainting tray, cell size {} px, {} parts",
            layout.cell_size(),
            self.parts.len()
        );

        let mut painter = TrayPainter::new(&mut self.surface, &layout, &self.cells);
        painter.paint_tray();
        for part in &self.parts {
            let color = if Some(part.id()) == self.highlighted {
                Color::HIGHLIGHT
            } else {
                Color::PART
            };
            painter.paint_part(part, color);
        }
    }

    /// Part registered in `cell`, if any.
    pub fn part_at(&self, cell: CellPosition) -> Option<&TrayPart> {
        self.parts.iter().find(|p| p.cell == cell)
    }

    pub fn part(&self, id: PartId) -> Option<&TrayPart> {
        self.parts.iter().find(|p| p.id() == id)
    }

    pub fn parts(&self) -> &[TrayPart] {
        &self.parts
    }

    pub fn highlighted(&self) -> Option<PartId> {
        self.highlighted
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn drawable_layout(&self) -> Option<TrayLayout> {
        match self.layout() {
            Ok(layout) => Some(layout),
            Err(e) => {
                tracing::debug!("Skipping tray drawing: {}", e);
                None
            }
        }
    }
}
