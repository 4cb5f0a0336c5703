//! Part catalog
//!
//! The parts described by the loaded print file: where each one waits in
//! the tray, how tall it is, and where on the printed object it goes.
//! A catalog is stored as JSON:
//!
//! ```json
//! {
//!   "parts": [
//!     {"id": 1, "name": "M3 nut", "position": 4, "height": 2.4,
//!      "thread": 3, "type": "hexnut",
//!      "destination": {"x": 60.5, "y": 40, "z": 5, "rotation": 30}}
//!   ]
//! }
//! ```

use magnetpnp_core::{NutType, PartDescriptor, PartId, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where a part goes on the printed object (mm, degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Destination {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// Lookup of part data needed to pick and place a part.
pub trait PartCatalog {
    /// 1-based tray position of the part
    fn position(&self, part: PartId) -> Option<u32>;

    /// Part height in mm
    fn height(&self, part: PartId) -> Option<f64>;

    fn destination(&self, part: PartId) -> Option<Destination>;
}

fn default_thread() -> f64 {
    3.0
}

fn default_nut_type() -> NutType {
    NutType::HexNut
}

/// One part of a catalog file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub id: PartId,
    #[serde(default)]
    pub name: String,
    pub position: u32,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_thread")]
    pub thread: f64,
    #[serde(rename = "type", default = "default_nut_type")]
    pub nut_type: NutType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
}

impl PartRecord {
    /// Descriptor sent to the tray view for this part.
    pub fn descriptor(&self) -> PartDescriptor {
        let name = if self.name.is_empty() {
            format!("part {}", self.id)
        } else {
            self.name.clone()
        };
        PartDescriptor {
            id: self.id,
            name,
            thread: self.thread,
            nut_type: self.nut_type,
            position: self.position,
            shape: self.shape.clone(),
        }
    }
}

/// An in-memory catalog loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartTable {
    pub parts: Vec<PartRecord>,
}

impl PartTable {
    pub fn new(parts: Vec<PartRecord>) -> Self {
        Self { parts }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json(&content)?;
        tracing::info!(
            "Loaded {} parts from {}",
            table.parts.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn get(&self, part: PartId) -> Option<&PartRecord> {
        self.parts.iter().find(|record| record.id == part)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Descriptors of every part, in file order.
    pub fn descriptors(&self) -> Vec<PartDescriptor> {
        self.parts.iter().map(PartRecord::descriptor).collect()
    }
}

impl PartCatalog for PartTable {
    fn position(&self, part: PartId) -> Option<u32> {
        self.get(part).map(|record| record.position)
    }

    fn height(&self, part: PartId) -> Option<f64> {
        self.get(part).map(|record| record.height)
    }

    fn destination(&self, part: PartId) -> Option<Destination> {
        self.get(part).and_then(|record| record.destination)
    }
}

impl<T: PartCatalog + ?Sized> PartCatalog for &T {
    fn position(&self, part: PartId) -> Option<u32> {
        (**self).position(part)
    }

    fn height(&self, part: PartId) -> Option<f64> {
        (**self).height(part)
    }

    fn destination(&self, part: PartId) -> Option<Destination> {
        (**self).destination(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "parts": [
            {"id": 1, "name": "M3 nut", "position": 4, "height": 2.4,
             "destination": {"x": 60.5, "y": 40, "z": 5, "rotation": 30}},
            {"id": 2, "position": 1, "type": "squarenut", "thread": 4}
        ]
    }"#;

    #[test]
    fn test_lookup() {
        let table = PartTable::from_json(CATALOG).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.position(PartId(1)), Some(4));
        assert_eq!(table.height(PartId(1)), Some(2.4));
        assert_eq!(table.destination(PartId(1)).unwrap().rotation, 30.0);

        assert_eq!(table.height(PartId(2)), Some(0.0));
        assert_eq!(table.destination(PartId(2)), None);
        assert_eq!(table.position(PartId(3)), None);
    }

    #[test]
    fn test_descriptors() {
        let table = PartTable::from_json(CATALOG).unwrap();
        let descriptors = table.descriptors();
        assert_eq!(descriptors[0].name, "M3 nut");
        assert_eq!(descriptors[0].nut_type, NutType::HexNut);
        assert_eq!(descriptors[0].thread, 3.0);
        assert_eq!(descriptors[1].name, "part 2");
        assert_eq!(descriptors[1].nut_type, NutType::SquareNut);
        assert_eq!(descriptors[1].thread, 4.0);
    }

    #[test]
    fn test_invalid_json() {
        assert!(PartTable::from_json("{\"parts\": [{\"id\": 1}]}").is_err());
    }
}
