//! Simulation state threaded through every tick.
//!
//! `SimState` is the single struct the control loop reads from and writes
//! to: the room temperature, the controller memory, the mode flags and the
//! operator's manual parameters.  Only the control loop mutates it.

use crate::config::SimConfig;

use super::{ExecutionMode, Mode, RunMode};

// ---------------------------------------------------------------------------
// Environmental inputs
// ---------------------------------------------------------------------------

/// Setpoint and disturbances that feed one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvInputs {
    /// Target room temperature (°C).
    pub setpoint: f32,
    /// Outside air temperature (°C).
    pub external_temp: f32,
    /// Server heat load.
    pub external_heat: f32,
}

/// Operator-supplied inputs used in MANUAL mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualParams {
    pub setpoint: f32,
    pub external_temp: f32,
    pub external_heat: f32,
}

impl Default for ManualParams {
    fn default() -> Self {
        Self {
            setpoint: 22.0,
            external_temp: 25.0,
            external_heat: 40.0,
        }
    }
}

impl ManualParams {
    /// Overwrite only the fields that are present.
    pub fn merge(
        &mut self,
        setpoint: Option<f32>,
        external_temp: Option<f32>,
        external_heat: Option<f32>,
    ) {
        if let Some(v) = setpoint {
            self.setpoint = v;
        }
        if let Some(v) = external_temp {
            self.external_temp = v;
        }
        if let Some(v) = external_heat {
            self.external_heat = v;
        }
    }
}

// ---------------------------------------------------------------------------
// SimState
// ---------------------------------------------------------------------------

/// Mutable simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    // -- Clock --
    /// Simulated minutes elapsed in the current cycle.
    pub minute: u32,

    // -- Plant / controller memory --
    /// Room temperature (°C).
    pub temperature: f32,
    /// Error from the previous tick, used to derive the error rate.
    pub previous_error: f32,
    /// Last commanded CRAC power (%).
    pub power: f32,

    // -- Fire mode --
    /// Oxygen inlets open; closed while a fire is being suppressed.
    pub oxygen_open: bool,
    /// Emergency override active.
    pub fire_mode: bool,

    // -- Modes --
    pub run_mode: RunMode,
    pub execution_mode: ExecutionMode,
    /// Set by RESTART, consumed at the start of the next tick.
    pub reset_requested: bool,

    // -- Operator inputs --
    pub manual: ManualParams,
}

impl SimState {
    /// Fresh state at the configured initial conditions.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            minute: 0,
            temperature: config.initial_temperature_c,
            previous_error: 0.0,
            power: config.initial_power,
            oxygen_open: true,
            fire_mode: false,
            run_mode: RunMode::Auto,
            execution_mode: ExecutionMode::Running,
            reset_requested: false,
            manual: ManualParams::default(),
        }
    }

    /// Restore the simulation variables to their initial values.
    ///
    /// The run mode and the manual parameters are operator settings, not
    /// simulation variables, and survive a reset.
    pub fn reinitialize(&mut self, config: &SimConfig) {
        *self = Self {
            run_mode: self.run_mode,
            manual: self.manual,
            ..Self::new(config)
        };
    }

    pub fn mode(&self) -> Mode {
        Mode {
            run: self.run_mode,
            execution: self.execution_mode,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.execution_mode == ExecutionMode::Paused
    }

    /// The cycle has reached its configured length.
    pub fn cycle_complete(&self, config: &SimConfig) -> bool {
        self.minute >= config.cycle_minutes
    }

    /// Inputs for this tick: the manual parameters in MANUAL mode, the
    /// fixed AUTO profile otherwise.
    pub fn inputs(&self, config: &SimConfig) -> EnvInputs {
        match self.run_mode {
            RunMode::Manual => EnvInputs {
                setpoint: self.manual.setpoint,
                external_temp: self.manual.external_temp,
                external_heat: self.manual.external_heat,
            },
            RunMode::Auto => EnvInputs {
                setpoint: config.auto_setpoint_c,
                external_temp: config.auto_external_temp_c,
                external_heat: config.auto_external_heat,
            },
        }
    }
}
