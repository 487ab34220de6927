//! Simulation configuration parameters
//!
//! All tunable parameters for the cooling loop simulation.
//! Values can be overridden from a JSON file through [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // --- Timing ---
    /// Wall-clock delay between ticks (milliseconds). One tick = one simulated minute.
    pub tick_interval_ms: u32,
    /// Status heartbeat interval while paused (milliseconds)
    pub pause_heartbeat_ms: u32,
    /// Settle delay after a reset before ticking resumes (milliseconds)
    pub reset_pause_ms: u32,
    /// Simulated minutes in one cycle before the loop auto-pauses
    pub cycle_minutes: u32,

    // --- Initial state ---
    /// Room temperature at start and after reset (°C)
    pub initial_temperature_c: f32,
    /// CRAC power at start and after reset (%)
    pub initial_power: f32,

    // --- AUTO profile ---
    /// Setpoint used in AUTO mode (°C)
    pub auto_setpoint_c: f32,
    /// External temperature used in AUTO mode (°C)
    pub auto_external_temp_c: f32,
    /// Server heat load used in AUTO mode
    pub auto_external_heat: f32,

    // --- Scripted disturbance (AUTO only) ---
    /// First minute of the fire-ignition window (inclusive)
    pub disturbance_start_minute: u32,
    /// End of the fire-ignition window (exclusive)
    pub disturbance_end_minute: u32,
    /// Temperature injected per tick inside the window (°C)
    pub disturbance_delta_c: f32,

    // --- Fire mode ---
    /// Temperature that, together with a fast rise, declares a fire (°C)
    pub fire_entry_temp_c: f32,
    /// Error rate (°C/tick) that, together with a high temperature, declares a fire
    pub fire_entry_rate: f32,
    /// Temperature below which fire mode is cleared (°C)
    pub fire_exit_temp_c: f32,
    /// Cooling per tick while oxygen is cut (°C)
    pub fire_suppression_rate_c: f32,
    /// Heating per tick while combustion has oxygen (°C)
    pub fire_combustion_rate_c: f32,
    /// Heat load forced while fire mode is active
    pub fire_heat_load: f32,

    // --- Alerts ---
    /// Temperature above which a HIGH alert is raised (°C)
    pub alert_high_c: f32,
    /// Temperature below which a LOW alert is raised (°C)
    pub alert_low_c: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 100,   // 10 simulated minutes per second
            pause_heartbeat_ms: 500, // 2 Hz status while paused
            reset_pause_ms: 500,
            cycle_minutes: 1440, // 24 h

            // Initial state
            initial_temperature_c: 22.0,
            initial_power: 47.5,

            // AUTO profile
            auto_setpoint_c: 22.0,
            auto_external_temp_c: 25.0,
            auto_external_heat: 40.0,

            // Disturbance: fire at 14:00
            disturbance_start_minute: 840,
            disturbance_end_minute: 845,
            disturbance_delta_c: 8.0,

            // Fire mode
            fire_entry_temp_c: 30.0,
            fire_entry_rate: 1.5,
            fire_exit_temp_c: 25.0,
            fire_suppression_rate_c: 0.4,
            fire_combustion_rate_c: 1.0,
            fire_heat_load: 100.0,

            // Alerts
            alert_high_c: 26.0,
            alert_low_c: 18.0,
        }
    }
}

impl SimConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.pause_heartbeat_ms == 0 {
            return Err(ConfigError::ValidationFailed("pause_heartbeat_ms must be > 0"));
        }
        if self.cycle_minutes == 0 {
            return Err(ConfigError::ValidationFailed("cycle_minutes must be > 0"));
        }
        if self.disturbance_start_minute > self.disturbance_end_minute {
            return Err(ConfigError::ValidationFailed(
                "disturbance window must not end before it starts",
            ));
        }
        if !(0.0..=100.0).contains(&self.initial_power) {
            return Err(ConfigError::ValidationFailed("initial_power must be within 0..=100"));
        }
        if self.fire_exit_temp_c >= self.fire_entry_temp_c {
            return Err(ConfigError::ValidationFailed(
                "fire_exit_temp_c must be below fire_entry_temp_c",
            ));
        }
        if self.fire_suppression_rate_c < 0.0 || self.fire_combustion_rate_c < 0.0 {
            return Err(ConfigError::ValidationFailed("fire rates must be non-negative"));
        }
        if self.alert_low_c >= self.alert_high_c {
            return Err(ConfigError::ValidationFailed("alert_low_c must be below alert_high_c"));
        }
        let finite = [
            self.initial_temperature_c,
            self.auto_setpoint_c,
            self.auto_external_temp_c,
            self.auto_external_heat,
            self.disturbance_delta_c,
            self.fire_entry_rate,
            self.fire_heat_load,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::ValidationFailed("values must be finite"));
        }
        Ok(())
    }

    /// Whether `minute` lies inside the scripted disturbance window.
    pub fn in_disturbance_window(&self, minute: u32) -> bool {
        (self.disturbance_start_minute..self.disturbance_end_minute).contains(&minute)
    }

    /// Length of the cycle in hours, reported in the completion alert.
    pub fn cycle_hours(&self) -> f32 {
        self.cycle_minutes as f32 / 60.0
    }
}
