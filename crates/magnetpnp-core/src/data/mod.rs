//! Printer connection state as reported by the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Printer connection state
///
/// Mirrors the connection lifecycle the printer host reports, from an
/// offline port through job execution and error states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterState {
    /// No printer connected
    #[default]
    Offline,
    /// Serial port is being opened and the firmware handshake runs
    Connecting,
    /// Connected and idle, ready for commands
    Operational,
    /// Streaming a job
    Printing,
    /// Job pause requested, planner still draining
    Pausing,
    /// Job paused
    Paused,
    /// Job resume requested
    Resuming,
    /// Job cancel requested
    Cancelling,
    /// Connection in error state
    Error,
    /// Connection closed by the host
    Closed,
}

impl PrinterState {
    /// Check if the printer is connected and talking to the host
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            PrinterState::Operational
                | PrinterState::Printing
                | PrinterState::Pausing
                | PrinterState::Paused
                | PrinterState::Resuming
                | PrinterState::Cancelling
        )
    }

    /// Check if the printer is idle and accepts a new job
    pub fn is_ready(&self) -> bool {
        matches!(self, PrinterState::Operational)
    }

    /// Check if a job is streaming
    pub fn is_printing(&self) -> bool {
        matches!(self, PrinterState::Printing)
    }

    /// Check if a paused job is being resumed
    pub fn is_resuming(&self) -> bool {
        matches!(self, PrinterState::Resuming)
    }

    /// Check if a job is paused or about to be
    pub fn is_paused(&self) -> bool {
        matches!(self, PrinterState::Paused | PrinterState::Pausing)
    }

    /// Whether a pick-and-place command may be issued in this state
    pub fn accepts_pick_commands(&self) -> bool {
        self.is_operational() || self.is_ready()
    }
}

impl fmt::Display for PrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "Offline"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Operational => write!(f, "Operational"),
            Self::Printing => write!(f, "Printing"),
            Self::Pausing => write!(f, "Pausing"),
            Self::Paused => write!(f, "Paused"),
            Self::Resuming => write!(f, "Resuming"),
            Self::Cancelling => write!(f, "Cancelling"),
            Self::Error => write!(f, "Error"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for PrinterState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "offline" => Ok(Self::Offline),
            "connecting" => Ok(Self::Connecting),
            "operational" => Ok(Self::Operational),
            "printing" => Ok(Self::Printing),
            "pausing" => Ok(Self::Pausing),
            "paused" => Ok(Self::Paused),
            "resuming" => Ok(Self::Resuming),
            "cancelling" => Ok(Self::Cancelling),
            "error" => Ok(Self::Error),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown printer state '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_commands_need_a_connection() {
        assert!(PrinterState::Operational.accepts_pick_commands());
        assert!(PrinterState::Printing.accepts_pick_commands());
        assert!(PrinterState::Paused.accepts_pick_commands());
        assert!(!PrinterState::Offline.accepts_pick_commands());
        assert!(!PrinterState::Connecting.accepts_pick_commands());
        assert!(!PrinterState::Error.accepts_pick_commands());
        assert!(!PrinterState::Closed.accepts_pick_commands());
    }

    #[test]
    fn test_ready_only_when_idle() {
        assert!(PrinterState::Operational.is_ready());
        assert!(!PrinterState::Printing.is_ready());
        assert!(!PrinterState::Paused.is_ready());
    }

    #[test]
    fn test_parse_roundtrips_display() {
        for state in [
            PrinterState::Offline,
            PrinterState::Operational,
            PrinterState::Printing,
            PrinterState::Paused,
            PrinterState::Closed,
        ] {
            let parsed: PrinterState = state.to_string().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("warp".parse::<PrinterState>().is_err());
    }
}
