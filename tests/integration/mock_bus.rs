//! Recording adapters for integration tests.
//!
//! Capture every event and every published frame so tests can assert on
//! the full history without a broker.

use dcfuzzy::app::events::{AlertKind, HoldStatus, SimEvent};
use dcfuzzy::app::ports::{EventSink, Publisher};
use dcfuzzy::app::service::{ControlService, StepRecord, TickReport};
use dcfuzzy::config::SimConfig;
use dcfuzzy::inbox::CommandInbox;

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<SimEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn alerts(&self) -> Vec<(AlertKind, f32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Alert(a) => Some((a.kind, a.value)),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<HoldStatus> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Status(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn count_resets(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, SimEvent::Reset)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &SimEvent) {
        self.events.push(event.clone());
    }
}

// ── RecordingPublisher ────────────────────────────────────────

#[derive(Default)]
pub struct RecordingPublisher {
    pub frames: Vec<(String, serde_json::Value)>,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn on_topic(&self, topic: &str) -> Vec<&serde_json::Value> {
        self.frames
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, v)| v)
            .collect()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, topic: &str, payload: &str) {
        let value = serde_json::from_str(payload).expect("frames are valid JSON");
        self.frames.push((topic.to_owned(), value));
    }
}

// ── Helpers ───────────────────────────────────────────────────

#[allow(dead_code)]
pub fn make_service() -> (ControlService, CommandInbox, RecordingSink) {
    let mut svc = ControlService::new(SimConfig::default());
    let mut sink = RecordingSink::new();
    svc.start(&mut sink);
    (svc, CommandInbox::new(), sink)
}

/// Tick until `n` steps have run or the clock stops.
#[allow(dead_code)]
pub fn run_steps(
    svc: &mut ControlService,
    inbox: &CommandInbox,
    sink: &mut impl EventSink,
    n: usize,
) -> Vec<StepRecord> {
    let mut steps = Vec::with_capacity(n);
    while steps.len() < n {
        let TickReport { step, .. } = svc.tick(inbox, sink);
        match step {
            Some(s) => steps.push(s),
            None => break,
        }
    }
    steps
}
