//! `M361` pick-and-place command codec
//!
//! The tray view asks the printer host to fetch a part by sending
//! `M361 P<id>`. The host recognises the command in its G-code stream and
//! expands it into a pick / align / place sequence, synchronising each step
//! through an `M362` marker line the printer echoes back once its planner
//! is drained.

use magnetpnp_core::{CommandError, PartId};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// G-code word of the pick-and-place request
pub const PICK_PLACE_CODE: &str = "M361";

/// Marker line that hands control back to the sequencer
///
/// Carries the plugin name so the host can tell it from user `M362`s.
pub const SYNC_MARKER: &str = "M362 OctoMagnetPNP";

fn part_parameter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"M361[^;]*?P(\d+)").unwrap_or_else(|e| panic!("invalid M361 pattern: {e}"))
    })
}

/// A request to pick and place one part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickPlaceCommand {
    part: PartId,
}

impl PickPlaceCommand {
    pub fn new(part: PartId) -> Self {
        Self { part }
    }

    pub fn part(&self) -> PartId {
        self.part
    }

    /// Whether a G-code line carries a pick-and-place request.
    pub fn is_pick_place(line: &str) -> bool {
        line.contains(PICK_PLACE_CODE)
    }

    /// Parses the part id out of an `M361` line.
    ///
    /// Trailing comments after `;` are ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let captures = part_parameter()
            .captures(line)
            .ok_or_else(|| CommandError::Malformed {
                line: line.to_string(),
                reason: "missing P<part> parameter".to_string(),
            })?;

        let id = captures[1]
            .parse::<u32>()
            .map_err(|e| CommandError::Malformed {
                line: line.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::new(PartId(id)))
    }
}

impl fmt::Display for PickPlaceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} P{}", PICK_PLACE_CODE, self.part)
    }
}

/// Whether a line is the sequencer's synchronisation marker.
pub fn is_sync_marker(line: &str) -> bool {
    line.contains(SYNC_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(PickPlaceCommand::new(PartId(12)).to_string(), "M361 P12");
    }

    #[test]
    fn test_parse() {
        assert_eq!(PickPlaceCommand::parse("M361 P7").unwrap().part(), PartId(7));
        assert_eq!(
            PickPlaceCommand::parse("N10 M361 S1 P42 ; pick").unwrap().part(),
            PartId(42)
        );
        assert_eq!(PickPlaceCommand::parse("M361P3").unwrap().part(), PartId(3));
    }

    #[test]
    fn test_parse_rejects_missing_part() {
        assert!(matches!(
            PickPlaceCommand::parse("M361"),
            Err(CommandError::Malformed { .. })
        ));
        assert!(PickPlaceCommand::parse("M361 ; P4").is_err());
        assert!(PickPlaceCommand::parse("M361 P").is_err());
        assert!(PickPlaceCommand::parse("M361 P99999999999").is_err());
    }

    #[test]
    fn test_line_classification() {
        assert!(PickPlaceCommand::is_pick_place("M361 P1"));
        assert!(!PickPlaceCommand::is_pick_place("G1 X10"));
        assert!(is_sync_marker("M362 OctoMagnetPNP"));
        assert!(!is_sync_marker("M362"));
    }

    #[test]
    fn test_marker_names_the_plugin() {
        assert_eq!(
            SYNC_MARKER,
            format!("M362 {}", magnetpnp_core::PLUGIN_NAME)
        );
    }
}
