//! Tray controller
//!
//! The glue between the printer host and the tray engine: it turns host
//! messages into status lines and engine calls, turns pointer events into
//! selections, and sends the pick-and-place command on double-click.

use crate::engine::TrayEngine;
use crate::surface::Surface;
use magnetpnp_communication::PickPlaceCommand;
use magnetpnp_core::{
    CommandChannel, CommandError, FilePayload, HostMessage, PartId, PrinterState, PLUGIN_NAME,
};

/// Status line shown before any file was loaded
pub const NO_FILE_STATUS: &str = "No file loaded";

pub struct TrayController<S: Surface, C: CommandChannel> {
    engine: TrayEngine<S>,
    channel: C,
    printer_state: PrinterState,
    status: String,
    current_operation: String,
}

impl<S: Surface, C: CommandChannel> TrayController<S, C> {
    pub fn new(engine: TrayEngine<S>, channel: C) -> Self {
        Self {
            engine,
            channel,
            printer_state: PrinterState::default(),
            status: NO_FILE_STATUS.to_string(),
            current_operation: String::new(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn current_operation(&self) -> &str {
        &self.current_operation
    }

    pub fn printer_state(&self) -> PrinterState {
        self.printer_state
    }

    pub fn set_printer_state(&mut self, state: PrinterState) {
        if state != self.printer_state {
            tracing::debug!("Printer state {} -> {}", self.printer_state, state);
            self.printer_state = state;
        }
    }

    pub fn engine(&self) -> &TrayEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TrayEngine<S> {
        &mut self.engine
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_parts(self) -> (TrayEngine<S>, C) {
        (self.engine, self.channel)
    }

    /// Handles a message routed to `plugin`; messages for other plugins
    /// are ignored.
    pub fn handle_plugin_message(&mut self, plugin: &str, message: &HostMessage) {
        if plugin == PLUGIN_NAME {
            self.handle_message(message);
        }
    }

    pub fn handle_message(&mut self, message: &HostMessage) {
        tracing::debug!("Host message: {}", message.description());
        match message {
            HostMessage::File(payload) => self.load_file(payload),
            HostMessage::Operation(payload) => {
                self.current_operation = format!("{} part nr {}", payload.kind, payload.part);
            }
            HostMessage::Error(payload) => {
                let mut status = format!("ERROR: \"{}\"", payload.kind);
                if let Some(part) = payload.part {
                    status.push_str(&format!(" appeared while processing part nr {}", part));
                }
                self.status = status;
            }
            HostMessage::Info(payload) => {
                self.status = format!("INFO: \"{}\"", payload.kind);
            }
        }
    }

    fn load_file(&mut self, payload: &FilePayload) {
        let Some(count) = payload.part_count else {
            self.status = "No nuts part in this file!".to_string();
            return;
        };

        self.status = format!("Loaded file with {} nuts", count);
        self.engine.erase();

        let parts = payload.parts.as_deref().unwrap_or_default();
        for part in parts {
            if let Err(e) = self.engine.add_part(part.clone()) {
                tracing::warn!("Skipping part {} ({}): {}", part.id, part.name, e);
            }
        }
        tracing::info!(
            "Tray loaded with {} of {} parts",
            self.engine.parts().len(),
            parts.len()
        );
    }

    /// Selects the part under a pointer position.
    pub fn click(&mut self, x: f64, y: f64) -> Option<PartId> {
        self.engine.select_part(x.floor(), y.floor())
    }

    /// Selects the part under a pointer position and asks the printer to
    /// pick it.
    ///
    /// The command is sent only when a part was hit and the printer is
    /// operational or ready. Returns the part the command was sent for.
    pub fn double_click(&mut self, x: f64, y: f64) -> Result<Option<PartId>, CommandError> {
        let Some(part) = self.click(x, y) else {
            return Ok(None);
        };

        if !self.printer_state.accepts_pick_commands() {
            tracing::debug!(
                "Not sending pick command for part {}, printer is {}",
                part,
                self.printer_state
            );
            return Ok(None);
        }

        let command = PickPlaceCommand::new(part);
        self.channel.send_custom_command(&command.to_string())?;
        tracing::info!("Sent '{}'", command);
        Ok(Some(part))
    }
}
