//! Control service: the hexagonal core.
//!
//! [`ControlService`] owns the simulation state and the safety supervisor
//! and runs one tick of the control sequence per call.  All I/O flows
//! through port traits injected at call sites, so the whole loop is
//! testable with a recording sink.
//!
//! ```text
//!  CommandInbox ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                   │     ControlService       │
//!                   │ Fuzzy · Plant · Safety   │
//!                   └─────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SimConfig;
use crate::control::{fuzzy, plant};
use crate::fsm::context::SimState;
use crate::fsm::{self, Transition};
use crate::inbox::CommandInbox;
use crate::safety::SafetySupervisor;

use super::commands::SimCommand;
use super::events::{Alert, AlertKind, HoldStatus, SimEvent, TelemetryData};
use super::ports::EventSink;

// ───────────────────────────────────────────────────────────────
// Tick results
// ───────────────────────────────────────────────────────────────

/// What one call to [`ControlService::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// The state was reinitialised at the start of this tick.
    pub reset: bool,
    /// The clock did not advance, and why.
    pub held: Option<HoldStatus>,
    /// The simulation step, when the clock advanced.
    pub step: Option<StepRecord>,
}

/// Inputs, intermediates and outputs of one simulated minute.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub minute: u32,
    pub setpoint: f32,
    pub external_temp: f32,
    /// Heat load fed to this step (forced during fire mode).
    pub external_heat: f32,
    /// Room temperature the controller saw, after the scripted disturbance.
    pub measured_temperature: f32,
    /// Room temperature at the end of the step.
    pub temperature: f32,
    pub error: f32,
    pub error_rate: f32,
    pub power: f32,
    /// Inference failed and the previous power was kept.
    pub power_held: bool,
    pub fire_mode: bool,
    pub oxygen_open: bool,
    pub alert: AlertKind,
}

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control service orchestrates all domain logic.
pub struct ControlService {
    config: SimConfig,
    state: SimState,
    safety: SafetySupervisor,
    tick_count: u64,
    held_inferences: u64,
}

impl ControlService {
    /// Construct the service at the configured initial conditions.
    pub fn new(config: SimConfig) -> Self {
        let state = SimState::new(&config);
        Self::with_state(config, state)
    }

    /// Construct the service around an existing state (tests, replays).
    pub fn with_state(config: SimConfig, state: SimState) -> Self {
        let safety = SafetySupervisor::new(&config);
        Self {
            config,
            state,
            safety,
            tick_count: 0,
            held_inferences: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        let mode = self.state.mode();
        sink.emit(&SimEvent::Started(mode));
        info!(
            "ControlService started in {} (cycle {} min, T0={:.1}°C)",
            mode, self.config.cycle_minutes, self.state.temperature
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one tick: apply pending commands, then reset, cycle end,
    /// pause handling, and finally one simulated minute.
    pub fn tick(&mut self, inbox: &CommandInbox, sink: &mut impl EventSink) -> TickReport {
        self.tick_count += 1;

        // 0. Commands are applied only here, between steps.
        inbox.drain(|cmd| self.handle_command(&cmd, sink));

        // 1. Deferred reset.  The tick carries on from minute 0.
        let reset = self.state.reset_requested;
        if reset {
            self.reset(sink);
        }

        // 2. Cycle end.
        if self.state.cycle_complete(&self.config) && !self.state.is_paused() {
            if let Some(t) = fsm::complete_cycle(&mut self.state) {
                emit_transition(sink, t);
            }
            info!("Cycle completed at minute {}", self.state.minute);
            sink.emit(&SimEvent::Alert(Alert {
                kind: AlertKind::Info,
                message: String::from("Ciclo Concluído"),
                value: self.config.cycle_hours(),
            }));
        }

        // 3. Hold.
        if self.state.is_paused() {
            let status = if self.state.cycle_complete(&self.config) {
                HoldStatus::Completed
            } else {
                HoldStatus::Paused
            };
            sink.emit(&SimEvent::Status(status));
            return TickReport {
                reset,
                held: Some(status),
                step: None,
            };
        }

        let step = self.step(sink);
        TickReport {
            reset,
            held: None,
            step: Some(step),
        }
    }

    /// Apply one command immediately.
    pub fn handle_command(&mut self, cmd: &SimCommand, sink: &mut impl EventSink) {
        debug!("Command: {:?}", cmd);
        if let Some(t) = fsm::apply_command(&mut self.state, cmd) {
            emit_transition(sink, t);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Steps in which inference failed and the previous power was kept.
    pub fn held_inferences(&self) -> u64 {
        self.held_inferences
    }

    // ── Internal ──────────────────────────────────────────────

    fn reset(&mut self, sink: &mut impl EventSink) {
        let from = self.state.mode();
        self.state.reinitialize(&self.config);
        info!("Simulation reset");
        sink.emit(&SimEvent::Reset);
        let to = self.state.mode();
        if from != to {
            emit_transition(sink, Transition { from, to });
        }
    }

    /// Steps 4 to 11: one simulated minute.
    fn step(&mut self, sink: &mut impl EventSink) -> StepRecord {
        let minute = self.state.minute;

        // 4. Inputs.
        let inputs = self.state.inputs(&self.config);
        let mut external_heat = inputs.external_heat;

        // 5. Scripted disturbance.
        if self.state.run_mode == fsm::RunMode::Auto
            && self.config.in_disturbance_window(minute)
            && !self.state.fire_mode
        {
            self.state.temperature += self.config.disturbance_delta_c;
            debug!(
                "Disturbance at minute {}: +{:.1}°C -> {:.2}",
                minute, self.config.disturbance_delta_c, self.state.temperature
            );
        }
        let measured_temperature = self.state.temperature;

        // 6. Error terms.
        let error = measured_temperature - inputs.setpoint;
        let error_rate = error - self.state.previous_error;

        // 7. Fire latch.
        self.safety.evaluate_fire(&mut self.state, error_rate);

        // 8. Controller and plant, or the fire override.
        let mut power_held = false;
        let next_temperature = if self.state.fire_mode {
            external_heat = self.config.fire_heat_load;
            self.state.temperature = plant::fire_step(
                self.state.temperature,
                self.state.oxygen_open,
                self.config.fire_suppression_rate_c,
                self.config.fire_combustion_rate_c,
            );
            self.state.temperature
        } else {
            let e = fuzzy::clip_error(error);
            let r = fuzzy::clip_error_rate(error_rate);
            match fuzzy::infer(e, r) {
                Ok(power) => self.state.power = power,
                Err(err) => {
                    power_held = true;
                    self.held_inferences += 1;
                    warn!(
                        "Inference failed at minute {} ({}), holding power at {:.2}%",
                        minute, err, self.state.power
                    );
                }
            }
            plant::next_temperature(
                self.state.temperature,
                self.state.power,
                external_heat,
                inputs.external_temp,
            )
        };

        // 9. Alerts.
        let alert = self.safety.alert(self.state.oxygen_open, next_temperature);
        let alert_kind = alert.as_ref().map_or(AlertKind::Normal, |a| a.kind);
        if let Some(a) = alert {
            sink.emit(&SimEvent::Alert(a));
        }

        // 10. Telemetry.
        sink.emit(&SimEvent::Telemetry(TelemetryData {
            minute,
            setpoint: inputs.setpoint,
            power: self.state.power,
            external_temp: inputs.external_temp,
            external_heat,
            oxygen_open: self.state.oxygen_open,
            run_mode: self.state.run_mode,
        }));
        sink.emit(&SimEvent::Temperature {
            minute,
            celsius: next_temperature,
        });

        // 11. Commit.
        self.state.previous_error = error;
        self.state.temperature = next_temperature;
        self.state.minute += 1;

        StepRecord {
            minute,
            setpoint: inputs.setpoint,
            external_temp: inputs.external_temp,
            external_heat,
            measured_temperature,
            temperature: next_temperature,
            error,
            error_rate,
            power: self.state.power,
            power_held,
            fire_mode: self.state.fire_mode,
            oxygen_open: self.state.oxygen_open,
            alert: alert_kind,
        }
    }
}

fn emit_transition(sink: &mut impl EventSink, t: Transition) {
    sink.emit(&SimEvent::ModeChanged {
        from: t.from,
        to: t.to,
    });
}
