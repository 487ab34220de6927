//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured simulation events to the
//! `log` facade (stderr via `tracing-subscriber` in the binary).  The bus
//! adapter implements the same trait; the binary fans out to both.

use log::{debug, info, warn};

use crate::app::events::{AlertKind, HoldStatus, SimEvent};
use crate::app::ports::EventSink;
use crate::fsm::RunMode;

/// Adapter that logs every [`SimEvent`].
///
/// Per-minute telemetry goes out at `debug`; everything else at `info` or
/// `warn` so a default filter shows only what an operator cares about.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Telemetry(t) => {
                debug!(
                    "TELEM | t={}min | sp={:.1}\u{00b0}C | P={:.2}% | T_ext={:.1}\u{00b0}C | \
                     Q={:.1} | O2={} | {}",
                    t.minute,
                    t.setpoint,
                    t.power,
                    t.external_temp,
                    t.external_heat,
                    if t.oxygen_open { "OPEN" } else { "CUT" },
                    match t.run_mode {
                        RunMode::Auto => "AUTO",
                        RunMode::Manual => "MANUAL",
                    },
                );
            }
            SimEvent::Temperature { minute, celsius } => {
                debug!("TEMP  | t={}min | T={:.2}\u{00b0}C", minute, celsius);
            }
            SimEvent::Alert(a) => match a.kind {
                AlertKind::Info | AlertKind::Normal => {
                    info!("ALERT | {:?} | {} ({:.1})", a.kind, a.message, a.value);
                }
                AlertKind::High | AlertKind::Low | AlertKind::Fire => {
                    warn!("ALERT | {:?} | {} ({:.1})", a.kind, a.message, a.value);
                }
            },
            SimEvent::Status(status) => {
                debug!(
                    "HOLD  | {}",
                    match status {
                        HoldStatus::Paused => "paused",
                        HoldStatus::Completed => "cycle completed",
                    }
                );
            }
            SimEvent::Reset => {
                info!("RESET | state reinitialised");
            }
            SimEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from, to);
            }
            SimEvent::Started(mode) => {
                info!("START | initial_mode={}", mode);
            }
        }
    }
}
