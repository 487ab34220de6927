//! Inbound commands to the control service.
//!
//! These are produced by bus adapters (stdio, tests) after decoding a
//! `control` or `set_params` message, queued on the
//! [`CommandInbox`](crate::inbox::CommandInbox) and applied by the
//! [`ControlService`](super::service::ControlService) between ticks.

/// Commands that external adapters can send into the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    /// Freeze the simulation clock.
    Pause,

    /// Resume the simulation clock.
    Play,

    /// Reset the simulation variables at the start of the next tick.
    Restart,

    /// Switch to operator-supplied inputs, overwriting the fields present.
    SetManual(ManualPatch),

    /// Switch back to the fixed AUTO profile.
    SetAuto,
}

/// Partial update of the manual parameters.  `None` leaves the current
/// value in place.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualPatch {
    pub setpoint: Option<f32>,
    pub external_temp: Option<f32>,
    pub external_heat: Option<f32>,
}
