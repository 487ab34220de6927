//! Command inbox between the bus reader and the control loop.
//!
//! A bounded `embassy-sync` channel guarded by a critical-section raw
//! mutex.  The reader thread pushes decoded commands; the control loop
//! drains them only at tick boundaries, so a command is never observed
//! half-applied.
//!
//! ```text
//! ┌──────────────┐  SimCommand  ┌──────────────┐
//! │ Bus reader   │────────────▶│ Control loop  │
//! │ (thread)     │   inbox      │ (tick)        │
//! └──────────────┘              └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::warn;

use crate::app::commands::SimCommand;
use crate::error::{Error, Result};

/// Channel depth for pending commands.
pub const INBOX_DEPTH: usize = 16;

/// Bounded multi-producer command queue.
pub struct CommandInbox {
    channel: Channel<CriticalSectionRawMutex, SimCommand, INBOX_DEPTH>,
}

impl CommandInbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Queue a command.  When the inbox is full the new command is dropped.
    pub fn push(&self, cmd: SimCommand) -> Result<()> {
        match self.channel.try_send(cmd) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                warn!("Command inbox full, dropping {:?}", dropped);
                Err(Error::InboxFull)
            }
        }
    }

    /// Take the oldest pending command.
    pub fn pop(&self) -> Option<SimCommand> {
        self.channel.try_receive().ok()
    }

    /// Hand every pending command to `handler` in arrival order.
    ///
    /// At most [`INBOX_DEPTH`] commands are taken per call, so a producer
    /// that keeps pushing cannot stall the tick.  Returns how many were
    /// handled.
    pub fn drain(&self, mut handler: impl FnMut(SimCommand)) -> usize {
        let mut handled = 0;
        while handled < INBOX_DEPTH {
            let Some(cmd) = self.pop() else { break };
            handler(cmd);
            handled += 1;
        }
        handled
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl Default for CommandInbox {
    fn default() -> Self {
        Self::new()
    }
}
