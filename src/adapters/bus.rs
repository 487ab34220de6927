//! Message-bus adapter.
//!
//! Encodes [`SimEvent`]s into the JSON frames the dashboard subscribes to,
//! and decodes inbound `set_params` payloads into [`SimCommand`]s.  The
//! transport itself sits behind [`Publisher`].
//!
//! | Topic                         | Direction | Payload                               |
//! |-------------------------------|-----------|---------------------------------------|
//! | `datacenter/fuzzy/control`    | out       | telemetry, hold status, reset notice  |
//! | `datacenter/fuzzy/temp`       | out       | `{tempo, temperatura}`                |
//! | `datacenter/fuzzy/alert`      | out       | `{tipo, msg, valor}`                  |
//! | `datacenter/fuzzy/set_params` | in        | `{cmd}` or `{mode, setpoint?, ...}`   |

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::app::commands::{ManualPatch, SimCommand};
use crate::app::events::{AlertKind, HoldStatus, SimEvent};
use crate::app::ports::{EventSink, Publisher};
use crate::error::CommandError;
use crate::fsm::RunMode;

pub const TOPIC_CONTROL: &str = "datacenter/fuzzy/control";
pub const TOPIC_TEMP: &str = "datacenter/fuzzy/temp";
pub const TOPIC_ALERT: &str = "datacenter/fuzzy/alert";
pub const TOPIC_SET_PARAMS: &str = "datacenter/fuzzy/set_params";

// ───────────────────────────────────────────────────────────────
// Outbound frames
// ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ControlFrame {
    tempo: u32,
    setpoint: f32,
    p_crac: f32,
    t_ext: f32,
    q_est: f32,
    oxigenio: &'static str,
    modo: &'static str,
}

#[derive(Serialize)]
struct HoldFrame {
    modo: &'static str,
}

#[derive(Serialize)]
struct ResetFrame {
    status: &'static str,
    tempo: u32,
}

#[derive(Serialize)]
struct TempFrame {
    tempo: u32,
    temperatura: f32,
}

#[derive(Serialize)]
struct AlertFrame<'a> {
    tipo: &'static str,
    msg: &'a str,
    valor: f32,
}

/// Round to `decimals` places for display on the bus.
fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10_f32.powi(decimals);
    (value * scale).round() / scale
}

// ───────────────────────────────────────────────────────────────
// BusEventSink
// ───────────────────────────────────────────────────────────────

/// [`EventSink`] that publishes events as bus frames.
///
/// Mode changes and the start notice have no frame and are skipped; the
/// log sink covers them.
pub struct BusEventSink<P: Publisher> {
    publisher: P,
}

impl<P: Publisher> BusEventSink<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_inner(self) -> P {
        self.publisher
    }

    fn send<T: Serialize>(&mut self, topic: &str, frame: &T) {
        match serde_json::to_string(frame) {
            Ok(payload) => self.publisher.publish(topic, &payload),
            Err(e) => warn!("Failed to encode frame for {}: {}", topic, e),
        }
    }
}

impl<P: Publisher> EventSink for BusEventSink<P> {
    fn emit(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Telemetry(t) => {
                let frame = ControlFrame {
                    tempo: t.minute,
                    setpoint: t.setpoint,
                    p_crac: round_to(t.power, 2),
                    t_ext: round_to(t.external_temp, 2),
                    q_est: round_to(t.external_heat, 2),
                    oxigenio: if t.oxygen_open { "ABERTO" } else { "FECHADO" },
                    modo: match t.run_mode {
                        RunMode::Manual => "MANUAL",
                        RunMode::Auto => "AUTO",
                    },
                };
                self.send(TOPIC_CONTROL, &frame);
            }
            SimEvent::Temperature { minute, celsius } => {
                let frame = TempFrame {
                    tempo: *minute,
                    temperatura: round_to(*celsius, 2),
                };
                self.send(TOPIC_TEMP, &frame);
            }
            SimEvent::Alert(a) => {
                let tipo = match a.kind {
                    AlertKind::Fire => "FOGO",
                    AlertKind::High => "ALTA",
                    AlertKind::Low => "BAIXA",
                    AlertKind::Info => "INFO",
                    AlertKind::Normal => return,
                };
                let frame = AlertFrame {
                    tipo,
                    msg: &a.message,
                    valor: round_to(a.value, 1),
                };
                self.send(TOPIC_ALERT, &frame);
            }
            SimEvent::Status(status) => {
                let modo = match status {
                    HoldStatus::Paused => "PAUSADO",
                    HoldStatus::Completed => "CONCLUIDO",
                };
                self.send(TOPIC_CONTROL, &HoldFrame { modo });
            }
            SimEvent::Reset => {
                let frame = ResetFrame {
                    status: "RESET",
                    tempo: 0,
                };
                self.send(TOPIC_CONTROL, &frame);
            }
            SimEvent::ModeChanged { .. } | SimEvent::Started(_) => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound commands
// ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ParamsFrame {
    #[serde(default)]
    cmd: Option<serde_json::Value>,
    #[serde(default)]
    mode: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient_f32")]
    setpoint: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    t_ext: Option<f32>,
    #[serde(default, deserialize_with = "lenient_f32")]
    q_est: Option<f32>,
}

/// Dashboards send numbers either as JSON numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f32),
    Text(String),
}

fn lenient_f32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f32>, D::Error> {
    let value = match Option::<NumberOrText>::deserialize(d)? {
        None => return Ok(None),
        Some(NumberOrText::Number(v)) => v,
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f32>()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {s:?}")))?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom("number must be finite"));
    }
    Ok(Some(value))
}

/// Decode one inbound message.
///
/// `cmd` is checked before `mode`; a payload carrying an unknown `cmd` and
/// a known `mode` is a mode change.
pub fn decode_command(topic: &str, payload: &[u8]) -> Result<SimCommand, CommandError> {
    if topic != TOPIC_SET_PARAMS {
        return Err(CommandError::UnknownTopic(topic.to_owned()));
    }
    let frame: ParamsFrame =
        serde_json::from_slice(payload).map_err(|e| CommandError::Malformed(e.to_string()))?;

    match frame.cmd.as_ref().and_then(serde_json::Value::as_str) {
        Some("PAUSE") => return Ok(SimCommand::Pause),
        Some("PLAY") => return Ok(SimCommand::Play),
        Some("RESTART") => return Ok(SimCommand::Restart),
        _ => {}
    }

    match frame.mode.as_ref().and_then(serde_json::Value::as_str) {
        Some("MANUAL") => Ok(SimCommand::SetManual(ManualPatch {
            setpoint: frame.setpoint,
            external_temp: frame.t_ext,
            external_heat: frame.q_est,
        })),
        Some("AUTO") => Ok(SimCommand::SetAuto),
        _ => Err(CommandError::Unrecognized),
    }
}
