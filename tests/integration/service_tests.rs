//! Integration tests for the inbox → ControlService → events pipeline.
//!
//! These drive whole simulated days through the public API and check the
//! scripted fire scenario, cycle completion and the operator commands.

use crate::mock_bus::{RecordingSink, make_service, run_steps};

use dcfuzzy::app::commands::{ManualPatch, SimCommand};
use dcfuzzy::app::events::{AlertKind, HoldStatus, SimEvent};
use dcfuzzy::app::service::ControlService;
use dcfuzzy::config::SimConfig;
use dcfuzzy::fsm::context::SimState;
use dcfuzzy::fsm::{ExecutionMode, RunMode};
use dcfuzzy::inbox::CommandInbox;

// ── Full AUTO day ─────────────────────────────────────────────

#[test]
fn quiet_until_the_disturbance() {
    let (mut svc, inbox, mut sink) = make_service();
    let steps = run_steps(&mut svc, &inbox, &mut sink, 840);

    assert_eq!(steps.len(), 840);
    assert_eq!(steps.last().unwrap().minute, 839);
    for s in &steps {
        assert_eq!(s.alert, AlertKind::Normal, "unexpected alert at minute {}", s.minute);
        assert!(!s.fire_mode);
        assert!((0.0..=100.0).contains(&s.power));
    }
    assert!(sink.alerts().is_empty());
}

#[test]
fn disturbance_triggers_one_fire_episode() {
    let (mut svc, inbox, mut sink) = make_service();
    let steps = run_steps(&mut svc, &inbox, &mut sink, 1440);
    assert_eq!(steps.len(), 1440);

    let fire: Vec<_> = steps.iter().filter(|s| s.fire_mode).collect();
    assert!(!fire.is_empty(), "disturbance must ignite fire mode");

    let first = fire.first().unwrap().minute;
    let last = fire.last().unwrap().minute;
    assert!(first == 840 || first == 841, "fire started at {first}");
    assert_eq!(
        (last - first + 1) as usize,
        fire.len(),
        "fire mode must be one contiguous episode"
    );
    assert!(last < 900, "fire lasted until {last}");

    for s in &fire {
        assert!(!s.oxygen_open);
        assert_eq!(s.alert, AlertKind::Fire);
        assert_eq!(s.external_heat, 100.0);
    }

    // Power is frozen for the whole episode.
    let frozen = steps[first as usize - 1].power;
    let ignition = &steps[first as usize];
    if ignition.minute == 840 {
        assert_eq!(ignition.power, frozen);
    }
    for s in &fire[1..] {
        assert_eq!(s.power, fire[0].power, "power moved at minute {}", s.minute);
    }

    // The room cools by the suppression rate while oxygen is cut.
    for pair in fire.windows(2) {
        let drop = pair[0].temperature - pair[1].temperature;
        assert!((drop - 0.4).abs() < 1e-3, "minute {}: drop {drop}", pair[1].minute);
    }

    // Back to normal operation for the rest of the day.
    for s in steps.iter().filter(|s| s.minute > last) {
        assert!(s.oxygen_open);
        assert_ne!(s.alert, AlertKind::Fire);
    }
    let tail = &steps[1000..];
    assert!(tail.iter().all(|s| s.alert == AlertKind::Normal));
}

#[test]
fn cycle_completion_pauses_with_info_alert() {
    let (mut svc, inbox, mut sink) = make_service();
    run_steps(&mut svc, &inbox, &mut sink, 1440);
    sink.clear();

    let report = svc.tick(&inbox, &mut sink);
    assert_eq!(report.held, Some(HoldStatus::Completed));
    assert!(report.step.is_none());
    assert_eq!(svc.state().minute, 1440);
    assert_eq!(svc.state().execution_mode, ExecutionMode::Paused);
    assert_eq!(sink.alerts(), vec![(AlertKind::Info, 24.0)]);
    assert_eq!(sink.statuses(), vec![HoldStatus::Completed]);

    // Further ticks hold without repeating the completion alert.
    sink.clear();
    for _ in 0..3 {
        assert_eq!(svc.tick(&inbox, &mut sink).held, Some(HoldStatus::Completed));
    }
    assert!(sink.alerts().is_empty());
    assert_eq!(sink.statuses().len(), 3);
}

#[test]
fn play_after_completion_pauses_again() {
    let (mut svc, inbox, mut sink) = make_service();
    run_steps(&mut svc, &inbox, &mut sink, 1441);
    sink.clear();

    inbox.push(SimCommand::Play).unwrap();
    let report = svc.tick(&inbox, &mut sink);
    assert_eq!(report.held, Some(HoldStatus::Completed));
    assert_eq!(svc.state().minute, 1440);
    assert_eq!(sink.alerts(), vec![(AlertKind::Info, 24.0)]);
}

#[test]
fn restart_after_completion_starts_a_new_day() {
    let (mut svc, inbox, mut sink) = make_service();
    run_steps(&mut svc, &inbox, &mut sink, 1440);
    svc.tick(&inbox, &mut sink);
    sink.clear();

    inbox.push(SimCommand::Restart).unwrap();
    let report = svc.tick(&inbox, &mut sink);
    assert!(report.reset);
    assert!(report.held.is_none());
    let step = report.step.unwrap();
    assert_eq!(step.minute, 0);
    assert_eq!(step.measured_temperature, 22.0);
    assert_eq!(svc.state().minute, 1);
    assert_eq!(sink.count_resets(), 1);

    // RESET is announced before the first telemetry of the new day.
    let reset_at = sink.events.iter().position(|e| matches!(e, SimEvent::Reset)).unwrap();
    let telem_at = sink
        .events
        .iter()
        .position(|e| matches!(e, SimEvent::Telemetry(_)))
        .unwrap();
    assert!(reset_at < telem_at);
}

// ── Scripted disturbance ──────────────────────────────────────

fn service_at(minute: u32, run_mode: RunMode) -> ControlService {
    let config = SimConfig::default();
    let mut state = SimState::new(&config);
    state.minute = minute;
    state.run_mode = run_mode;
    ControlService::with_state(config, state)
}

#[test]
fn disturbance_adds_eight_degrees_before_control() {
    let mut svc = service_at(840, RunMode::Auto);
    let step = svc
        .tick(&CommandInbox::new(), &mut RecordingSink::new())
        .step
        .unwrap();
    assert_eq!(step.measured_temperature, 30.0);
    assert_eq!(step.error, 8.0);
    assert_eq!(step.error_rate, 8.0);
    // 30.0 is not strictly above the entry threshold.
    assert!(!step.fire_mode);
    assert!(step.power > 90.0);
}

#[test]
fn disturbance_window_is_half_open() {
    for (minute, expected) in [(839, 22.0), (844, 30.0), (845, 22.0)] {
        let mut svc = service_at(minute, RunMode::Auto);
        let step = svc
            .tick(&CommandInbox::new(), &mut RecordingSink::new())
            .step
            .unwrap();
        assert_eq!(step.measured_temperature, expected, "minute {minute}");
    }
}

#[test]
fn manual_mode_skips_the_disturbance() {
    let mut svc = service_at(842, RunMode::Manual);
    let step = svc
        .tick(&CommandInbox::new(), &mut RecordingSink::new())
        .step
        .unwrap();
    assert_eq!(step.measured_temperature, 22.0);
}

#[test]
fn ignition_forces_the_room() {
    let config = SimConfig::default();
    let mut state = SimState::new(&config);
    state.temperature = 31.0;
    let mut svc = ControlService::with_state(config, state);
    let mut sink = RecordingSink::new();

    let step = svc.tick(&CommandInbox::new(), &mut sink).step.unwrap();
    assert!(step.fire_mode);
    assert!(!step.oxygen_open);
    assert!((step.temperature - 30.6).abs() < 1e-4);
    assert_eq!(step.power, 47.5, "inference is skipped in fire mode");
    assert_eq!(step.external_heat, 100.0);
    assert_eq!(sink.alerts().len(), 1);
    assert_eq!(sink.alerts()[0].0, AlertKind::Fire);
}

// ── Operator commands ─────────────────────────────────────────

#[test]
fn pause_freezes_the_clock_until_play() {
    let (mut svc, inbox, mut sink) = make_service();
    run_steps(&mut svc, &inbox, &mut sink, 10);
    let before = svc.state().clone();

    inbox.push(SimCommand::Pause).unwrap();
    for _ in 0..5 {
        assert_eq!(svc.tick(&inbox, &mut sink).held, Some(HoldStatus::Paused));
    }
    assert_eq!(svc.state().minute, before.minute);
    assert_eq!(svc.state().temperature, before.temperature);

    inbox.push(SimCommand::Play).unwrap();
    let step = svc.tick(&inbox, &mut sink).step.unwrap();
    assert_eq!(step.minute, before.minute);
}

#[test]
fn manual_parameters_drive_the_loop() {
    let (mut svc, inbox, mut sink) = make_service();
    inbox
        .push(SimCommand::SetManual(ManualPatch {
            setpoint: Some(20.0),
            external_temp: Some(30.0),
            external_heat: Some(60.0),
        }))
        .unwrap();

    let steps = run_steps(&mut svc, &inbox, &mut sink, 200);
    let first = &steps[0];
    assert_eq!(first.setpoint, 20.0);
    assert_eq!(first.external_temp, 30.0);
    assert_eq!(first.external_heat, 60.0);
    assert!(first.error > 0.0);

    let telem = sink
        .events
        .iter()
        .find_map(|e| match e {
            SimEvent::Telemetry(t) => Some(t.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(telem.run_mode, RunMode::Manual);

    // Regulates toward the new setpoint.
    let late: f32 = steps[150..].iter().map(|s| s.temperature).sum::<f32>() / 50.0;
    assert!((late - 20.0).abs() < 3.0, "mean late temperature {late}");
}

#[test]
fn auto_restores_the_fixed_profile() {
    let (mut svc, inbox, mut sink) = make_service();
    inbox
        .push(SimCommand::SetManual(ManualPatch {
            setpoint: Some(19.0),
            ..ManualPatch::default()
        }))
        .unwrap();
    run_steps(&mut svc, &inbox, &mut sink, 3);

    inbox.push(SimCommand::SetAuto).unwrap();
    let step = svc.tick(&inbox, &mut sink).step.unwrap();
    assert_eq!(step.setpoint, 22.0);
    assert_eq!(svc.state().manual.setpoint, 19.0);
}

#[test]
fn restart_keeps_operator_settings() {
    let (mut svc, inbox, mut sink) = make_service();
    inbox
        .push(SimCommand::SetManual(ManualPatch {
            external_heat: Some(80.0),
            ..ManualPatch::default()
        }))
        .unwrap();
    run_steps(&mut svc, &inbox, &mut sink, 50);

    inbox.push(SimCommand::Pause).unwrap();
    inbox.push(SimCommand::Restart).unwrap();
    let report = svc.tick(&inbox, &mut sink);
    assert!(report.reset);

    let s = svc.state();
    assert_eq!(s.minute, 1);
    assert_eq!(s.run_mode, RunMode::Manual);
    assert_eq!(s.manual.external_heat, 80.0);
    assert_eq!(s.execution_mode, ExecutionMode::Running);
    assert!(!s.fire_mode);
}

#[test]
fn commands_between_ticks_apply_in_order() {
    let (mut svc, inbox, mut sink) = make_service();
    inbox.push(SimCommand::Pause).unwrap();
    inbox.push(SimCommand::Play).unwrap();
    inbox.push(SimCommand::Pause).unwrap();

    let report = svc.tick(&inbox, &mut sink);
    assert_eq!(report.held, Some(HoldStatus::Paused));
    assert!(inbox.is_empty());
    let modes = sink
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::ModeChanged { .. }))
        .count();
    assert_eq!(modes, 3);
}
