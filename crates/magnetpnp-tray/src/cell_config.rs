//! Per-box layout of the tray.
//!
//! The host stores the layout as a JSON array with one entry per box,
//! ordered column by column starting at the bottom-left box:
//! entry `(column - 1) * rows + (row - 1)` describes cell `(column, row)`.
//! Each entry names the nut outline printed into the empty box and the
//! thread size that outline is drawn for:
//!
//! ```json
//! [{"thread": 3, "nut": "hex"}, {"thread": 4, "nut": "square"}]
//! ```

use magnetpnp_core::{CellPosition, TrayError};
use serde::{Deserialize, Serialize};

fn default_thread() -> f64 {
    3.0
}

/// Outline printed into an empty box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellNut {
    Hex,
    Square,
}

/// Layout entry of a single box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellConfig {
    /// Thread size the box is cut for
    #[serde(default = "default_thread")]
    pub thread: f64,
    /// Outline shape of the box
    pub nut: CellNut,
}

/// Validated layout covering every box of a grid
#[derive(Debug, Clone, PartialEq)]
pub struct CellConfigTable {
    columns: u32,
    rows: u32,
    entries: Vec<CellConfig>,
}

impl CellConfigTable {
    /// Decodes and validates a serialized layout for a `columns` x `rows` grid.
    pub fn parse(json: &str, columns: u32, rows: u32) -> Result<Self, TrayError> {
        let entries: Vec<CellConfig> =
            serde_json::from_str(json).map_err(|e| TrayError::MalformedConfig {
                reason: e.to_string(),
            })?;
        Self::from_entries(entries, columns, rows)
    }

    /// Validates an already decoded layout.
    pub fn from_entries(
        entries: Vec<CellConfig>,
        columns: u32,
        rows: u32,
    ) -> Result<Self, TrayError> {
        let expected = columns as usize * rows as usize;
        if entries.len() != expected {
            return Err(TrayError::ConfigSizeMismatch {
                columns,
                rows,
                expected,
                actual: entries.len(),
            });
        }

        if let Some((index, entry)) = entries
            .iter()
            .enumerate()
            .find(|(_, entry)| !entry.thread.is_finite() || entry.thread <= 0.0)
        {
            return Err(TrayError::MalformedConfig {
                reason: format!("entry {} has thread size {}", index, entry.thread),
            });
        }

        Ok(Self {
            columns,
            rows,
            entries,
        })
    }

    /// A layout giving every box the same entry.
    pub fn uniform(entry: CellConfig, columns: u32, rows: u32) -> Result<Self, TrayError> {
        Self::from_entries(vec![entry; columns as usize * rows as usize], columns, rows)
    }

    /// Column-major index of a cell, `None` outside the grid.
    pub fn index(&self, cell: CellPosition) -> Option<usize> {
        if !cell.is_within(self.columns, self.rows) {
            return None;
        }
        Some((cell.column as usize - 1) * self.rows as usize + (cell.row as usize - 1))
    }

    /// Layout entry of a cell.
    pub fn get(&self, cell: CellPosition) -> Option<&CellConfig> {
        self.index(cell).map(|index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CellConfig] {
        &self.entries
    }
}
