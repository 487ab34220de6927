//! End-to-end bus tests: input lines → inbox → service → published frames.

use crate::mock_bus::RecordingPublisher;

use dcfuzzy::adapters::bus::{BusEventSink, TOPIC_ALERT, TOPIC_CONTROL, TOPIC_TEMP};
use dcfuzzy::adapters::stdio::ingest_line;
use dcfuzzy::app::service::ControlService;
use dcfuzzy::config::SimConfig;
use dcfuzzy::fsm::RunMode;
use dcfuzzy::inbox::CommandInbox;
use serde_json::json;

fn make() -> (ControlService, CommandInbox, BusEventSink<RecordingPublisher>) {
    let mut svc = ControlService::new(SimConfig::default());
    let mut bus = BusEventSink::new(RecordingPublisher::default());
    svc.start(&mut bus);
    (svc, CommandInbox::new(), bus)
}

#[test]
fn each_step_publishes_control_then_temperature() {
    let (mut svc, inbox, mut bus) = make();
    svc.tick(&inbox, &mut bus);

    let frames = &bus.publisher().frames;
    assert_eq!(frames.len(), 2, "start notice has no frame");
    assert_eq!(frames[0].0, TOPIC_CONTROL);
    assert_eq!(frames[1].0, TOPIC_TEMP);

    let ctrl = &frames[0].1;
    assert_eq!(ctrl["tempo"], 0);
    assert_eq!(ctrl["setpoint"], 22.0);
    assert_eq!(ctrl["p_crac"], 50.0);
    assert_eq!(ctrl["t_ext"], 25.0);
    assert_eq!(ctrl["q_est"], 40.0);
    assert_eq!(ctrl["oxigenio"], "ABERTO");
    assert_eq!(ctrl["modo"], "AUTO");

    let temp = &frames[1].1;
    assert_eq!(temp["tempo"], 0);
    assert!((temp["temperatura"].as_f64().unwrap() - 21.8).abs() < 1e-4);
}

#[test]
fn pause_line_publishes_hold_status() {
    let (mut svc, inbox, mut bus) = make();
    ingest_line(r#"{"cmd":"PAUSE"}"#, &inbox).unwrap();
    svc.tick(&inbox, &mut bus);

    assert_eq!(
        bus.publisher().on_topic(TOPIC_CONTROL),
        vec![&json!({"modo": "PAUSADO"})]
    );
    assert!(bus.publisher().on_topic(TOPIC_TEMP).is_empty());
}

#[test]
fn restart_line_publishes_reset_notice() {
    let (mut svc, inbox, mut bus) = make();
    svc.tick(&inbox, &mut bus);
    ingest_line(r#"datacenter/fuzzy/set_params {"cmd":"RESTART"}"#, &inbox).unwrap();
    svc.tick(&inbox, &mut bus);

    let ctrl = bus.publisher().on_topic(TOPIC_CONTROL);
    assert_eq!(ctrl.len(), 3);
    assert_eq!(ctrl[1], &json!({"status": "RESET", "tempo": 0}));
    assert_eq!(ctrl[2]["tempo"], 0);
}

#[test]
fn manual_line_with_string_numbers() {
    let (mut svc, inbox, mut bus) = make();
    ingest_line(
        r#"{"mode":"MANUAL","setpoint":"21","t_ext":28,"q_est":"55.5"}"#,
        &inbox,
    )
    .unwrap();
    svc.tick(&inbox, &mut bus);

    assert_eq!(svc.state().run_mode, RunMode::Manual);
    let ctrl = bus.publisher().on_topic(TOPIC_CONTROL);
    assert_eq!(ctrl[0]["modo"], "MANUAL");
    assert_eq!(ctrl[0]["setpoint"], 21.0);
    assert_eq!(ctrl[0]["t_ext"], 28.0);
    assert_eq!(ctrl[0]["q_est"], 55.5);
}

#[test]
fn malformed_lines_leave_state_untouched() {
    let (mut svc, inbox, mut bus) = make();
    for line in [
        "{not json",
        r#"{"cmd":"EXPLODE"}"#,
        r#"{"mode":"MANUAL","setpoint":"hot"}"#,
        r#"datacenter/fuzzy/control {"cmd":"PAUSE"}"#,
    ] {
        assert!(ingest_line(line, &inbox).is_err(), "{line}");
    }
    assert!(inbox.is_empty());

    let before = svc.state().clone();
    svc.tick(&inbox, &mut bus);
    assert_eq!(svc.state().run_mode, before.run_mode);
    assert_eq!(svc.state().minute, before.minute + 1);
}

#[test]
fn fire_publishes_fogo_alerts() {
    let config = SimConfig::default();
    let mut state = dcfuzzy::fsm::context::SimState::new(&config);
    state.temperature = 32.0;
    let mut svc = ControlService::with_state(config, state);
    let mut bus = BusEventSink::new(RecordingPublisher::default());
    svc.tick(&CommandInbox::new(), &mut bus);

    let alerts = bus.publisher().on_topic(TOPIC_ALERT);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["tipo"], "FOGO");
    assert_eq!(alerts[0]["msg"], "INCÊNDIO: O2 CORTADO");
    assert!((alerts[0]["valor"].as_f64().unwrap() - 31.6).abs() < 1e-4);

    let ctrl = bus.publisher().on_topic(TOPIC_CONTROL);
    assert_eq!(ctrl[0]["oxigenio"], "FECHADO");
    assert_eq!(ctrl[0]["q_est"], 100.0);
}
