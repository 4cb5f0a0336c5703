//! Outbound command channel to the printer host.

use crate::error::CommandError;

/// A sink for custom commands sent to the printer host.
///
/// Sending is fire-and-forget: implementations hand the command over and
/// return without waiting for the printer to acknowledge it.
pub trait CommandChannel {
    /// Send one custom command line.
    fn send_custom_command(&mut self, command: &str) -> Result<(), CommandError>;
}

impl<T: CommandChannel + ?Sized> CommandChannel for Box<T> {
    fn send_custom_command(&mut self, command: &str) -> Result<(), CommandError> {
        (**self).send_custom_command(command)
    }
}

impl<T: CommandChannel + ?Sized> CommandChannel for &mut T {
    fn send_custom_command(&mut self, command: &str) -> Result<(), CommandError> {
        (**self).send_custom_command(command)
    }
}
