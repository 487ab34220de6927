//! Operating-mode state machine.
//!
//! Two orthogonal axes, driven by operator commands:
//!
//! ```text
//!            PLAY                      SET_MANUAL
//!   ┌────────────────────┐       ┌────────────────────┐
//!   │                    ▼       │                    ▼
//! PAUSED ◀──────────── RUNNING  AUTO ◀────────────── MANUAL
//!          PAUSE / cycle end           SET_AUTO
//! ```
//!
//! RESTART does not move either axis directly; it raises
//! `reset_requested`, which the control loop consumes at the top of the
//! next tick.  Fire mode is layered on top and owned by the
//! [`SafetySupervisor`](crate::safety::SafetySupervisor).

pub mod context;

use core::fmt;

use crate::app::commands::SimCommand;
use context::SimState;
use log::info;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Where the controller's inputs come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Fixed environmental profile plus the scripted disturbance.
    Auto,
    /// Operator-supplied setpoint and disturbances.
    Manual,
}

/// Whether the simulation clock advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    Running,
    Paused,
}

/// Combined mode, used for logging and transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode {
    pub run: RunMode,
    pub execution: ExecutionMode,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let run = match self.run {
            RunMode::Auto => "AUTO",
            RunMode::Manual => "MANUAL",
        };
        let exec = match self.execution {
            ExecutionMode::Running => "RUNNING",
            ExecutionMode::Paused => "PAUSED",
        };
        write!(f, "{run}/{exec}")
    }
}

/// A mode change caused by a command or by the cycle ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
}

// ---------------------------------------------------------------------------
// Command application
// ---------------------------------------------------------------------------

/// Apply one command to the state.  Returns the transition if the mode
/// changed.
///
/// Must only be called between ticks.
pub fn apply_command(state: &mut SimState, cmd: &SimCommand) -> Option<Transition> {
    let from = state.mode();

    match cmd {
        SimCommand::Pause => state.execution_mode = ExecutionMode::Paused,
        SimCommand::Play => state.execution_mode = ExecutionMode::Running,
        SimCommand::Restart => {
            info!("Reset requested");
            state.reset_requested = true;
        }
        SimCommand::SetManual(patch) => {
            state.run_mode = RunMode::Manual;
            state
                .manual
                .merge(patch.setpoint, patch.external_temp, patch.external_heat);
            info!(
                "Manual parameters: setpoint={:.1} t_ext={:.1} q_est={:.1}",
                state.manual.setpoint, state.manual.external_temp, state.manual.external_heat
            );
        }
        SimCommand::SetAuto => state.run_mode = RunMode::Auto,
    }

    transition(from, state.mode())
}

/// Pause the clock because the cycle ran out.
pub fn complete_cycle(state: &mut SimState) -> Option<Transition> {
    let from = state.mode();
    state.execution_mode = ExecutionMode::Paused;
    transition(from, state.mode())
}

fn transition(from: Mode, to: Mode) -> Option<Transition> {
    if from == to {
        return None;
    }
    info!("Mode transition: {} -> {}", from, to);
    Some(Transition { from, to })
}
