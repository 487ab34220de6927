//! Safety supervisor.
//!
//! The supervisor runs **every tick after the error terms are known and
//! before the controller** and owns the fire-mode latch in
//! `SimState.fire_mode`.
//!
//! ## Fire lifecycle
//!
//! 1. The room is above the entry temperature *and* heating faster than the
//!    entry rate: the latch is set and the oxygen inlets close.
//! 2. While latched, the control loop bypasses the fuzzy controller and
//!    drives the temperature directly (see [`plant::fire_step`]).
//! 3. The latch is released only once the room falls below the exit
//!    temperature.  The error rate is ignored on the way out, so a single
//!    slow tick inside the band does not drop out of fire mode.
//!
//! After the plant step the supervisor also classifies the resulting
//! temperature into at most one [`AlertKind`].
//!
//! [`plant::fire_step`]: crate::control::plant::fire_step

use crate::app::events::{Alert, AlertKind};
use crate::config::SimConfig;
use crate::fsm::context::SimState;
use log::{error, info};

/// Fire-mode edge reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireTransition {
    Ignited,
    Extinguished,
}

/// Safety supervisor.
#[derive(Debug, Clone)]
pub struct SafetySupervisor {
    fire_entry_temp_c: f32,
    fire_entry_rate: f32,
    fire_exit_temp_c: f32,
    alert_high_c: f32,
    alert_low_c: f32,
}

impl SafetySupervisor {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            fire_entry_temp_c: config.fire_entry_temp_c,
            fire_entry_rate: config.fire_entry_rate,
            fire_exit_temp_c: config.fire_exit_temp_c,
            alert_high_c: config.alert_high_c,
            alert_low_c: config.alert_low_c,
        }
    }

    /// Update the fire latch from the current temperature and error rate.
    pub fn evaluate_fire(&self, state: &mut SimState, error_rate: f32) -> Option<FireTransition> {
        let t = state.temperature;

        if !state.fire_mode && t > self.fire_entry_temp_c && error_rate > self.fire_entry_rate {
            state.fire_mode = true;
            state.oxygen_open = false;
            error!(
                "FIRE DETECTED at minute {}: T={:.2} rate={:.2}, oxygen cut",
                state.minute, t, error_rate
            );
            return Some(FireTransition::Ignited);
        }

        if state.fire_mode && t < self.fire_exit_temp_c {
            state.fire_mode = false;
            state.oxygen_open = true;
            info!("Fire extinguished at minute {}: T={:.2}, oxygen restored", state.minute, t);
            return Some(FireTransition::Extinguished);
        }

        None
    }

    /// Classify a post-step temperature.  Oxygen cut outranks the
    /// temperature thresholds.
    pub fn classify(&self, oxygen_open: bool, temperature: f32) -> AlertKind {
        if !oxygen_open {
            AlertKind::Fire
        } else if temperature > self.alert_high_c {
            AlertKind::High
        } else if temperature < self.alert_low_c {
            AlertKind::Low
        } else {
            AlertKind::Normal
        }
    }

    /// Build the alert for a tick, if any.
    pub fn alert(&self, oxygen_open: bool, temperature: f32) -> Option<Alert> {
        let kind = self.classify(oxygen_open, temperature);
        let message = match kind {
            AlertKind::Normal | AlertKind::Info => return None,
            AlertKind::Fire => String::from("INCÊNDIO: O2 CORTADO"),
            AlertKind::High => format!("ALERTA: T > {}°C", self.alert_high_c),
            AlertKind::Low => format!("ALERTA: T < {}°C", self.alert_low_c),
        };
        Some(Alert {
            kind,
            message,
            value: temperature,
        })
    }
}
