//! Part model shared by the tray view and the pick-and-place host.
//!
//! A part is one nut loaded from a G-code file. The host identifies it by a
//! numeric id and places it in the tray by a 1-based linear position that
//! runs row by row, starting in the bottom-left box.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a part within a loaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub u32);

impl PartId {
    /// Returns the raw numeric id.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PartId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Nut type of a part, which decides the glyph drawn for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutType {
    /// Hexagonal nut
    HexNut,
    /// Square nut
    SquareNut,
}

impl fmt::Display for NutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HexNut => write!(f, "hexnut"),
            Self::SquareNut => write!(f, "squarenut"),
        }
    }
}

/// A part as described by the host when a file is loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDescriptor {
    /// Unique part id
    pub id: PartId,
    /// Display label
    pub name: String,
    /// Thread size (M3 = 3.0), controls the glyph size
    ///
    /// Hosts that read it from an XML attribute send it as a string.
    #[serde(deserialize_with = "thread_size")]
    pub thread: f64,
    /// Nut type
    #[serde(rename = "type")]
    pub nut_type: NutType,
    /// 1-based linear tray position
    #[serde(rename = "partPosition")]
    pub position: u32,
    /// Free-form shape description from the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Decodes a thread size given as a JSON number or a numeric string.
///
/// The size must be finite and positive.
fn thread_size<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let thread = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => value,
        NumberOrText::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("invalid thread size '{}'", text))
        })?,
    };
    if !thread.is_finite() || thread <= 0.0 {
        return Err(serde::de::Error::custom(format!(
            "thread size {} must be positive",
            thread
        )));
    }
    Ok(thread)
}

impl PartDescriptor {
    /// Creates a descriptor without a shape description.
    pub fn new(
        id: impl Into<PartId>,
        name: impl Into<String>,
        thread: f64,
        nut_type: NutType,
        position: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thread,
            nut_type,
            position,
            shape: None,
        }
    }
}

/// A 1-based (column, row) cell address.
///
/// Row 1 is the bottom row of the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub column: u32,
    pub row: u32,
}

impl CellPosition {
    /// Creates a new cell position.
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Derives the cell holding a 1-based linear position.
    ///
    /// Positions run row-major: `row = (p-1) / columns + 1`,
    /// `column = (p-1) % columns + 1`. Returns `None` for position 0 or
    /// zero columns; the upper bound depends on the row count and is the
    /// caller's to check.
    pub fn from_position_index(position: u32, columns: u32) -> Option<Self> {
        if position == 0 || columns == 0 {
            return None;
        }
        let zero_based = position - 1;
        Some(Self {
            column: zero_based % columns + 1,
            row: zero_based / columns + 1,
        })
    }

    /// Inverse of [`CellPosition::from_position_index`].
    pub fn to_position_index(&self, columns: u32) -> u32 {
        (self.row - 1) * columns + self.column
    }

    /// Whether the cell lies inside a `columns` x `rows` grid.
    pub fn is_within(&self, columns: u32, rows: u32) -> bool {
        (1..=columns).contains(&self.column) && (1..=rows).contains(&self.row)
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "col {} row {}", self.column, self.row)
    }
}

/// A part registered in the tray, with its derived cell
#[derive(Debug, Clone, PartialEq)]
pub struct TrayPart {
    pub descriptor: PartDescriptor,
    pub cell: CellPosition,
}

impl TrayPart {
    pub fn id(&self) -> PartId {
        self.descriptor.id
    }
}
