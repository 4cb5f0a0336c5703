//! Part descriptions embedded in G-code files.
//!
//! A slicer post-processor writes the parts of a print as markup inside
//! G-code comments, one tag per line:
//!
//! ```text
//! ;<object name="bracket">
//! ;<part id="1" name="M3 nut">
//! ;  <position box="4"/>
//! ;  <size height="2.4"/>
//! ;  <nut type="hexnut" thread="3"/>
//! ;  <destination x="60.5" y="40" z="5" orientation="30"/>
//! ;</part>
//! ;</object>
//! ```
//!
//! The `<object>` root may be left out, in which case the parts are wrapped
//! in `<object name="defaultpart">`. `<size>`, `<nut>`, `<shape>` and
//! `<destination>` are optional.

use crate::catalog::{Destination, PartRecord, PartTable};
use magnetpnp_core::{HostMessage, NutType, PartFileError, PartId, Result};
use regex::Regex;
use roxmltree::{Document, Node};
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Root wrapped around markup that has none
const DEFAULT_OBJECT: &str = "defaultpart";

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<.*>").unwrap_or_else(|e| panic!("invalid tag pattern: {e}")))
}

fn object_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<object.*>").unwrap_or_else(|e| panic!("invalid object pattern: {e}"))
    })
}

/// Result of reading the parts of a G-code file
#[derive(Debug, Clone, PartialEq)]
pub struct FileLoad {
    /// Parts found in the file, empty when there are none or parsing failed
    pub table: PartTable,
    /// FILE or ERROR message for the tray view
    pub message: HostMessage,
}

/// Collects the tagged lines of a G-code file into one markup document.
///
/// Returns `None` when the file carries no tags. A root `<object>` is added
/// when the first tag is not one.
pub fn extract_markup(gcode: &str) -> Option<String> {
    let mut markup = String::new();
    for line in gcode.lines() {
        if let Some(tag) = tag_pattern().find(line) {
            markup.push_str(tag.as_str());
            markup.push('\n');
        }
    }
    if markup.is_empty() {
        return None;
    }

    let first = markup.lines().next().unwrap_or_default();
    if !object_pattern().is_match(first) {
        markup = format!(
            "<object name=\"{}\">\n{}\n</object>",
            DEFAULT_OBJECT, markup
        );
    }
    Some(markup)
}

/// Parses a markup document into a part table.
pub fn parse_parts(markup: &str) -> std::result::Result<PartTable, PartFileError> {
    let document = Document::parse(markup).map_err(|e| PartFileError::Xml(e.to_string()))?;

    let mut parts: Vec<PartRecord> = Vec::new();
    for node in document
        .root_element()
        .children()
        .filter(|node| node.has_tag_name("part"))
    {
        let record = parse_part(node)?;
        if parts.iter().any(|part| part.id == record.id) {
            return Err(PartFileError::DuplicatePart(record.id.value()));
        }
        parts.push(record);
    }
    Ok(PartTable::new(parts))
}

fn parse_part(node: Node<'_, '_>) -> std::result::Result<PartRecord, PartFileError> {
    let id: u32 = number(node, "part", "id")?;
    let name = node.attribute("name").unwrap_or_default().to_string();

    let position_node = child(node, "position").ok_or(PartFileError::MissingAttribute {
        element: "position",
        attribute: "box",
    })?;
    let position: u32 = number(position_node, "position", "box")?;
    if position == 0 {
        return Err(PartFileError::InvalidValue {
            element: "position",
            attribute: "box",
            value: "0".to_string(),
        });
    }

    let height = match child(node, "size") {
        Some(size) => number::<f64>(size, "size", "height")?,
        None => 0.0,
    };

    let (nut_type, thread) = match child(node, "nut") {
        Some(nut) => {
            let nut_type = match nut.attribute("type") {
                Some(kind) => parse_nut_type(kind)?,
                None => NutType::HexNut,
            };
            let thread = match nut.attribute("thread") {
                Some(_) => number::<f64>(nut, "nut", "thread")?,
                None => 3.0,
            };
            (nut_type, thread)
        }
        None => (NutType::HexNut, 3.0),
    };
    if !thread.is_finite() || thread <= 0.0 {
        return Err(PartFileError::InvalidValue {
            element: "nut",
            attribute: "thread",
            value: thread.to_string(),
        });
    }

    let shape = child(node, "shape")
        .and_then(|shape| shape.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    let destination = match child(node, "destination") {
        Some(dest) => Some(Destination {
            x: number(dest, "destination", "x")?,
            y: number(dest, "destination", "y")?,
            z: number(dest, "destination", "z")?,
            rotation: match dest.attribute("orientation") {
                Some(_) => number(dest, "destination", "orientation")?,
                None => 0.0,
            },
        }),
        None => None,
    };

    Ok(PartRecord {
        id: PartId(id),
        name,
        position,
        height,
        thread,
        nut_type,
        shape,
        destination,
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(tag))
}

fn number<T: FromStr>(
    node: Node<'_, '_>,
    element: &'static str,
    attribute: &'static str,
) -> std::result::Result<T, PartFileError> {
    let value = node
        .attribute(attribute)
        .ok_or(PartFileError::MissingAttribute { element, attribute })?;
    value.trim().parse().map_err(|_| PartFileError::InvalidValue {
        element,
        attribute,
        value: value.to_string(),
    })
}

fn parse_nut_type(kind: &str) -> std::result::Result<NutType, PartFileError> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "hexnut" | "hex" => Ok(NutType::HexNut),
        "squarenut" | "square" => Ok(NutType::SquareNut),
        _ => Err(PartFileError::InvalidValue {
            element: "nut",
            attribute: "type",
            value: kind.to_string(),
        }),
    }
}

/// Reads the parts of a G-code file and builds the message for the tray view.
///
/// A file without tags yields a FILE message without part data; markup
/// that does not parse yields an ERROR message.
pub fn load_gcode(gcode: &str) -> FileLoad {
    let Some(markup) = extract_markup(gcode) else {
        tracing::info!("G-code file carries no part information");
        return FileLoad {
            table: PartTable::default(),
            message: HostMessage::File(Default::default()),
        };
    };

    match parse_parts(&markup) {
        Ok(table) => {
            tracing::info!("Extracted information on {} parts", table.len());
            let message = HostMessage::file(table.descriptors());
            FileLoad { table, message }
        }
        Err(e) => {
            tracing::warn!("XML parsing error: {}", e);
            FileLoad {
                table: PartTable::default(),
                message: HostMessage::error(format!("XML parsing error: {}", e), None),
            }
        }
    }
}

/// Reads a G-code file from disk, see [`load_gcode`].
pub fn load_gcode_file(path: &Path) -> Result<FileLoad> {
    let gcode = std::fs::read_to_string(path)?;
    tracing::debug!("Scanning {} for part information", path.display());
    Ok(load_gcode(&gcode))
}
