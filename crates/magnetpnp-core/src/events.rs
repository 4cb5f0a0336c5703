//! Host message definitions.
//!
//! The printer host pushes plugin messages shaped as
//! `{"event": "FILE" | "OPERATION" | "ERROR" | "INFO", "data": {...}}`.
//! They are cloneable and serializable so they can be logged and replayed.

use serde::{Deserialize, Serialize};

use crate::part::{PartDescriptor, PartId};

/// Name under which the host routes plugin messages to the tray view
pub const PLUGIN_NAME: &str = "OctoMagnetPNP";

/// Root enum for all messages from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "UPPERCASE")]
pub enum HostMessage {
    /// A file was selected on the host
    File(FilePayload),
    /// The pick-and-place sequence entered a new step
    Operation(OperationPayload),
    /// The host reported a failure
    Error(ErrorPayload),
    /// Informational notice
    Info(InfoPayload),
}

impl HostMessage {
    /// Get a short description of this message for logging
    pub fn description(&self) -> String {
        match self {
            HostMessage::File(payload) => match payload.part_count {
                Some(count) => format!("File loaded with {} parts", count),
                None => "File loaded without part data".to_string(),
            },
            HostMessage::Operation(payload) => {
                format!("Operation {} on part {}", payload.kind, payload.part)
            }
            HostMessage::Error(payload) => match payload.part {
                Some(part) => format!("Error {} on part {}", payload.kind, part),
                None => format!("Error {}", payload.kind),
            },
            HostMessage::Info(payload) => format!("Info {}", payload.kind),
        }
    }

    /// Builds a FILE message from a part list.
    pub fn file(parts: Vec<PartDescriptor>) -> Self {
        HostMessage::File(FilePayload {
            part_count: Some(parts.len() as u32),
            parts: Some(parts),
        })
    }

    /// Builds an OPERATION message.
    pub fn operation(kind: impl Into<String>, part: PartId) -> Self {
        HostMessage::Operation(OperationPayload {
            kind: kind.into(),
            part,
        })
    }

    /// Builds an ERROR message.
    pub fn error(kind: impl Into<String>, part: Option<PartId>) -> Self {
        HostMessage::Error(ErrorPayload {
            kind: kind.into(),
            part,
        })
    }

    /// Builds an INFO message.
    pub fn info(kind: impl Into<String>) -> Self {
        HostMessage::Info(InfoPayload { kind: kind.into() })
    }
}

/// Payload of a FILE message.
///
/// Files without part information carry neither field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    #[serde(rename = "partCount", default, skip_serializing_if = "Option::is_none")]
    pub part_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<PartDescriptor>>,
}

/// Payload of an OPERATION message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub part: PartId,
}

/// Payload of an ERROR message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part: Option<PartId>,
}

/// Payload of an INFO message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoPayload {
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::NutType;

    #[test]
    fn test_file_message_decodes() {
        let json = r#"{
            "event": "FILE",
            "data": {
                "partCount": 1,
                "parts": [{"id": 3, "name": "M4", "partPosition": 2, "type": "squarenut", "thread": 4}]
            }
        }"#;
        let message: HostMessage = serde_json::from_str(json).unwrap();
        let HostMessage::File(payload) = message else {
            panic!("expected FILE message");
        };
        assert_eq!(payload.part_count, Some(1));
        let parts = payload.parts.unwrap();
        assert_eq!(parts[0].nut_type, NutType::SquareNut);
    }

    #[test]
    fn test_file_message_with_string_thread() {
        let json = r#"{"event":"FILE","data":{"partCount":1,"parts":[
            {"id":1,"name":"M3 nut","partPosition":4,"shape":"nut","type":"hexnut","thread":"3"}
        ]}}"#;
        let message: HostMessage = serde_json::from_str(json).unwrap();
        let HostMessage::File(payload) = message else {
            panic!("expected FILE message");
        };
        let parts = payload.parts.unwrap();
        assert_eq!(parts[0].thread, 3.0);
        assert_eq!(parts[0].position, 4);
    }

    #[test]
    fn test_file_message_without_parts() {
        let json = r#"{"event": "FILE", "data": {"info": "dummy"}}"#;
        let message: HostMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message, HostMessage::File(FilePayload::default()));
        assert_eq!(message.description(), "File loaded without part data");
    }

    #[test]
    fn test_error_message_part_is_optional() {
        let json = r#"{"event": "ERROR", "data": {"type": "XML parsing error"}}"#;
        let message: HostMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message, HostMessage::error("XML parsing error", None));

        let json = r#"{"event": "ERROR", "data": {"type": "grip", "part": 5}}"#;
        let message: HostMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message, HostMessage::error("grip", Some(PartId(5))));
    }

    #[test]
    fn test_operation_message_roundtrip() {
        let message = HostMessage::operation("pick", PartId(9));
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["event"], "OPERATION");
        assert_eq!(json["data"]["type"], "pick");
        assert_eq!(json["data"]["part"], 9);
    }
}
