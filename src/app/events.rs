//! Outbound application events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log them, encode them onto
//! the message bus, or record them in a test.

use crate::fsm::{Mode, RunMode};

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Per-tick control snapshot.
    Telemetry(TelemetryData),

    /// Room temperature after this tick's plant step.
    Temperature { minute: u32, celsius: f32 },

    /// Abnormal condition or end-of-cycle notice.
    Alert(Alert),

    /// The clock is not advancing.
    Status(HoldStatus),

    /// The simulation variables were reinitialised.
    Reset,

    /// The operating mode changed.
    ModeChanged { from: Mode, to: Mode },

    /// The service has started (carries the initial mode).
    Started(Mode),
}

/// One tick's control inputs and output.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub minute: u32,
    pub setpoint: f32,
    pub power: f32,
    pub external_temp: f32,
    pub external_heat: f32,
    pub oxygen_open: bool,
    pub run_mode: RunMode,
}

/// Why the clock is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldStatus {
    /// Paused by the operator.
    Paused,
    /// Paused because the cycle ran to completion.
    Completed,
}

/// Alert classification of a tick's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Normal,
    /// Temperature above the high threshold.
    High,
    /// Temperature below the low threshold.
    Low,
    /// Fire suppression in progress (oxygen cut).
    Fire,
    /// Informational, e.g. cycle completed.
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub value: f32,
}
