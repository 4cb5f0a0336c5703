//! Queued command channel
//!
//! A [`CommandChannel`] that appends commands to a shared queue. Clones
//! share the queue, so the tray view can hold one handle while the host
//! side drains the other.

use magnetpnp_core::{CommandChannel, CommandError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Default)]
struct QueueState {
    commands: VecDeque<String>,
    closed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct QueuedCommandChannel {
    inner: Arc<Mutex<QueueState>>,
}

impl QueuedCommandChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every queued command, oldest first.
    pub fn drain(&self) -> Vec<String> {
        self.inner.lock().commands.drain(..).collect()
    }

    /// Removes the oldest queued command.
    pub fn pop(&self) -> Option<String> {
        self.inner.lock().commands.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().commands.is_empty()
    }

    /// Stops accepting commands. Already queued commands can still be drained.
    pub fn close(&self) {
        self.inner.lock().closed = true;
        tracing::debug!("Command channel closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl CommandChannel for QueuedCommandChannel {
    fn send_custom_command(&mut self, command: &str) -> Result<(), CommandError> {
        let mut state = self.inner.lock();
        if state.closed {
            return Err(CommandError::ChannelClosed);
        }
        state.commands.push_back(command.to_string());
        Ok(())
    }
}
