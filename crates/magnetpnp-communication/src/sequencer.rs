//! Pick-and-place sequencer
//!
//! Expands an `M361 P<id>` request into printer moves. The printer
//! executes G-code from a buffer, so the sequencer cannot know when a move
//! has finished. Each step therefore ends with a settle block (`M400` plus
//! short dwells) followed by the [`SYNC_MARKER`] line: the host only sends
//! the marker once the printer acknowledged everything before it, and the
//! marker passing through the sending hook triggers the next step.
//!
//! ```text
//! Idle --M361--> Pick --marker--> Align --marker--> Place --marker--> Idle
//! ```
//!
//! A running print job is paused while a part is handled and resumed once
//! it is placed.

use crate::catalog::PartCatalog;
use crate::pick_place::{is_sync_marker, PickPlaceCommand, SYNC_MARKER};
use crate::tray_position::box_center;
use magnetpnp_core::{HostMessage, PartId, PrinterState, SequencerError};
use magnetpnp_settings::{Config, MachinePosition};
use std::collections::VecDeque;
use std::fmt;

/// Feed rate of the slow Z moves onto a part
const APPROACH_FEEDRATE: f64 = 1000.0;

/// Clearance above a part before descending (mm)
const CLEARANCE: f64 = 10.0;

/// Lift after gripping a part (mm)
const GRIP_LIFT: f64 = 5.0;

/// Dwell lines in a settle block after the two `M400`s
const SETTLE_DWELLS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerState {
    #[default]
    Idle,
    Pick,
    Align,
    Place,
}

impl fmt::Display for SequencerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pick => write!(f, "pick"),
            Self::Align => write!(f, "align"),
            Self::Place => write!(f, "place"),
        }
    }
}

/// What the host should do with the print job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Pause,
    Resume,
}

/// Result of passing one G-code line through a hook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookOutcome {
    /// Drop the line instead of sending it to the printer
    pub suppress: bool,
    /// Lines to append to the host's command queue
    pub commands: Vec<String>,
    pub job_action: Option<JobAction>,
    /// Messages for the tray view
    pub messages: Vec<HostMessage>,
}

impl HookOutcome {
    /// Leave the line untouched.
    pub fn pass() -> Self {
        Self::default()
    }

    fn suppressed() -> Self {
        Self {
            suppress: true,
            ..Self::default()
        }
    }
}

/// Formats a coordinate with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// `M400`, a dwell, `M400` and more dwells, so the printer drains its
/// planner before the next line is acknowledged.
pub fn settle_block() -> Vec<String> {
    let mut lines = vec!["M400".to_string(), "G4 P1".to_string(), "M400".to_string()];
    lines.extend(std::iter::repeat_n("G4 P1".to_string(), SETTLE_DWELLS));
    lines
}

/// Wraps user-configured G-code between planner drains and dwells.
fn gcode_macro(gcode: &str) -> Vec<String> {
    let mut lines = vec!["M400".to_string(), "M400".to_string(), "G4 P500".to_string()];
    lines.extend(
        gcode
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
    );
    lines.push("G4 P500".to_string());
    lines
}

pub struct PickPlaceSequencer<P: PartCatalog> {
    config: Config,
    catalog: P,
    state: SequencerState,
    current_part: Option<PartId>,
}

impl<P: PartCatalog> PickPlaceSequencer<P> {
    pub fn new(config: Config, catalog: P) -> Self {
        Self {
            config,
            catalog,
            state: SequencerState::Idle,
            current_part: None,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn current_part(&self) -> Option<PartId> {
        self.current_part
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &P {
        &self.catalog
    }

    /// Replaces the catalog when a new file is loaded.
    pub fn set_catalog(&mut self, catalog: P) {
        self.catalog = catalog;
        self.current_part = None;
    }

    /// Hook for lines entering the host's send queue.
    ///
    /// Intercepts `M361` while idle and starts the pick step. A request
    /// arriving while another part is being handled is passed through.
    pub fn on_queuing(&mut self, line: &str, printer: PrinterState) -> HookOutcome {
        if !PickPlaceCommand::is_pick_place(line) {
            return HookOutcome::pass();
        }

        if self.state != SequencerState::Idle {
            tracing::warn!(
                "Received '{}' while handling part {:?} ({}), ignoring",
                line.trim(),
                self.current_part.map(|p| p.value()),
                self.state
            );
            return HookOutcome::pass();
        }

        let mut outcome = HookOutcome::suppressed();
        let command = match PickPlaceCommand::parse(line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("{}", e);
                outcome
                    .messages
                    .push(HostMessage::error(e.to_string(), None));
                return outcome;
            }
        };

        let part = command.part();
        tracing::info!("Received pick-and-place request for part {}", part);
        self.state = SequencerState::Pick;
        self.current_part = Some(part);

        if printer.is_printing() || printer.is_resuming() {
            outcome.job_action = Some(JobAction::Pause);
        }
        outcome.messages.push(HostMessage::operation("pick", part));
        outcome.commands = settle_block();
        outcome.commands.push(SYNC_MARKER.to_string());
        outcome
    }

    /// Hook for lines about to be written to the printer.
    ///
    /// Advances the sequence on the synchronisation marker; every other
    /// line passes.
    pub fn on_sending(&mut self, line: &str, printer: PrinterState) -> HookOutcome {
        if !is_sync_marker(line) {
            return HookOutcome::pass();
        }
        let Some(part) = self.current_part else {
            return HookOutcome::pass();
        };

        let step = match self.state {
            SequencerState::Idle => return HookOutcome::pass(),
            SequencerState::Pick => {
                tracing::info!("Pick part {}", part);
                self.pick_moves(part).map(|moves| (moves, SequencerState::Align))
            }
            SequencerState::Align => {
                tracing::info!("Align part {}", part);
                self.align_moves(part).map(|moves| (moves, SequencerState::Place))
            }
            SequencerState::Place => {
                tracing::info!("Place part {}", part);
                self.place_moves(part).map(|moves| (moves, SequencerState::Idle))
            }
        };

        let mut outcome = HookOutcome::suppressed();
        match step {
            Ok((moves, next)) => {
                outcome.commands = moves;
                outcome.commands.extend(settle_block());
                if next == SequencerState::Idle {
                    tracing::info!("Finished placing part {}", part);
                    self.finish(printer, &mut outcome);
                } else {
                    outcome.commands.push(SYNC_MARKER.to_string());
                    self.state = next;
                }
            }
            Err(e) => {
                tracing::warn!("Aborting pick-and-place of part {}: {}", part, e);
                outcome
                    .messages
                    .push(HostMessage::error(e.to_string(), Some(part)));
                self.finish(printer, &mut outcome);
            }
        }
        outcome
    }

    fn finish(&mut self, printer: PrinterState, outcome: &mut HookOutcome) {
        self.state = SequencerState::Idle;
        if printer.is_paused() {
            outcome.job_action = Some(JobAction::Resume);
        }
    }

    fn part_height(&self, part: PartId) -> Result<f64, SequencerError> {
        self.catalog
            .height(part)
            .ok_or(SequencerError::UnknownPart {
                part_id: part.value(),
            })
    }

    fn destination(&self, part: PartId) -> Result<crate::catalog::Destination, SequencerError> {
        if self.catalog.position(part).is_none() {
            return Err(SequencerError::UnknownPart {
                part_id: part.value(),
            });
        }
        self.catalog
            .destination(part)
            .ok_or(SequencerError::MissingDestination {
                part_id: part.value(),
            })
    }

    /// Moves the nozzle over the part's box, grips the part and carries it
    /// to the bed camera.
    fn pick_moves(&self, part: PartId) -> Result<Vec<String>, SequencerError> {
        let position = self
            .catalog
            .position(part)
            .ok_or(SequencerError::UnknownPart {
                part_id: part.value(),
            })?;
        let height = self.part_height(part)?;
        let nozzle = &self.config.nozzle;
        let feed = num(self.config.feedrate);

        let tray = box_center(&self.config.tray, part, position)?;
        let grip = MachinePosition {
            x: tray.x - nozzle.x,
            y: tray.y - nozzle.y,
            z: tray.z + height - nozzle.z_pressure,
        };

        let mut lines = vec![
            format!("T{}", nozzle.extruder_nr),
            format!("G1 X{} Y{} F{}", num(grip.x), num(grip.y), feed),
            format!("G1 Z{}", num(grip.z + CLEARANCE)),
        ];
        lines.extend(gcode_macro(&nozzle.release_magnet_gcode));
        lines.extend(gcode_macro(&nozzle.lower_nozzle_gcode));
        lines.push(format!("G1 Z{} F{}", num(grip.z), num(APPROACH_FEEDRATE)));
        lines.extend(gcode_macro(&nozzle.grip_magnet_gcode));
        lines.push("G4 P500".to_string());
        lines.push(format!(
            "G1 Z{} F{}",
            num(grip.z + GRIP_LIFT),
            num(APPROACH_FEEDRATE)
        ));

        let camera = &self.config.camera.bed;
        lines.push(format!(
            "G1 X{} Y{} F{}",
            num(camera.x - nozzle.x),
            num(camera.y - nozzle.y),
            feed
        ));
        lines.push(format!("G1 Z{} F{}", num(camera.z + height), feed));
        Ok(lines)
    }

    /// Turns the part to its destination angle.
    fn align_moves(&self, part: PartId) -> Result<Vec<String>, SequencerError> {
        let destination = self.destination(part)?;
        Ok(vec![
            "G92 E0".to_string(),
            format!(
                "G1 E{} F{}",
                num(destination.rotation),
                num(self.config.feedrate)
            ),
        ])
    }

    /// Sets the part down at its destination and lifts the nozzle clear.
    fn place_moves(&self, part: PartId) -> Result<Vec<String>, SequencerError> {
        let destination = self.destination(part)?;
        let height = self.part_height(part)?;
        let nozzle = &self.config.nozzle;
        let feed = num(self.config.feedrate);
        let dest_z = destination.z + height - nozzle.z_pressure;

        let mut lines = vec![
            format!("G1 Z{} F{}", num(dest_z + CLEARANCE), feed),
            format!(
                "G1 X{} Y{} F{}",
                num(destination.x - nozzle.x),
                num(destination.y - nozzle.y),
                feed
            ),
            format!("G1 Z{}", num(dest_z)),
        ];
        lines.extend(gcode_macro(&nozzle.release_magnet_gcode));
        lines.push("G4 P500".to_string());
        lines.push(format!("G1 Z{} F{}", num(dest_z + CLEARANCE), feed));
        lines.extend(gcode_macro(&nozzle.lift_nozzle_gcode));
        Ok(lines)
    }
}

/// Everything a host would do while handling one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceTranscript {
    /// Lines written to the printer, in order
    pub lines: Vec<String>,
    pub messages: Vec<HostMessage>,
    pub job_actions: Vec<JobAction>,
}

/// Applies one hook outcome to a simulated host; returns whether the line
/// was suppressed.
fn apply_outcome(
    outcome: HookOutcome,
    queue: &mut VecDeque<String>,
    transcript: &mut SequenceTranscript,
    printer: &mut PrinterState,
) -> bool {
    if let Some(action) = outcome.job_action {
        *printer = match action {
            JobAction::Pause => PrinterState::Paused,
            JobAction::Resume => PrinterState::Printing,
        };
        transcript.job_actions.push(action);
    }
    transcript.messages.extend(outcome.messages);
    queue.extend(outcome.commands);
    outcome.suppress
}

/// Drives a sequencer the way a printer host would.
///
/// `line` goes through the queuing hook; every queued line then goes
/// through the sending hook in order, with the printer acknowledging each
/// one immediately. Pause and resume requests update the simulated printer
/// state.
pub fn simulate<P: PartCatalog>(
    sequencer: &mut PickPlaceSequencer<P>,
    line: &str,
    mut printer: PrinterState,
) -> SequenceTranscript {
    let mut transcript = SequenceTranscript::default();
    let mut queue = VecDeque::new();

    let outcome = sequencer.on_queuing(line, printer);
    if !apply_outcome(outcome, &mut queue, &mut transcript, &mut printer) {
        queue.push_front(line.to_string());
    }

    while let Some(next) = queue.pop_front() {
        let outcome = sequencer.on_sending(&next, printer);
        if !apply_outcome(outcome, &mut queue, &mut transcript, &mut printer) {
            transcript.lines.push(next);
        }
    }
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(4000.0), "4000");
        assert_eq!(num(15.5), "15.5");
        assert_eq!(num(1.23456), "1.235");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(-2.5), "-2.5");
    }

    #[test]
    fn test_settle_block() {
        let block = settle_block();
        assert_eq!(block.len(), 13);
        assert_eq!(&block[..3], ["M400", "G4 P1", "M400"]);
        assert!(block[3..].iter().all(|line| line == "G4 P1"));
    }

    #[test]
    fn test_gcode_macro_skips_blank_lines() {
        assert_eq!(
            gcode_macro("M42 P48 S255\n\n  M42 P49 S0  \n"),
            vec!["M400", "M400", "G4 P500", "M42 P48 S255", "M42 P49 S0", "G4 P500"]
        );
        assert_eq!(gcode_macro("").len(), 4);
    }
}
