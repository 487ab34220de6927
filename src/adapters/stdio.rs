//! Line-oriented stdio bus.
//!
//! Stands in for a broker connection: every published frame is one stdout
//! line `<topic> <json>`, and every stdin line is either `<topic> <json>`
//! or a bare JSON object addressed to `set_params`.  Inbound lines are
//! decoded on a reader thread and queued on the [`CommandInbox`].

use std::io::{BufRead, Write};
use std::thread::JoinHandle;

use log::{info, warn};

use crate::adapters::bus::{TOPIC_SET_PARAMS, decode_command};
use crate::app::ports::Publisher;
use crate::error::Result;
use crate::inbox::CommandInbox;

// ───────────────────────────────────────────────────────────────
// Outbound
// ───────────────────────────────────────────────────────────────

/// [`Publisher`] writing one line per frame.
pub struct StdoutPublisher<W: Write> {
    out: W,
}

impl<W: Write> StdoutPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Publisher for StdoutPublisher<W> {
    fn publish(&mut self, topic: &str, payload: &str) {
        let res = writeln!(self.out, "{topic} {payload}").and_then(|()| self.out.flush());
        if let Err(e) = res {
            warn!("stdout publish to {} failed: {}", topic, e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound
// ───────────────────────────────────────────────────────────────

/// Split an input line into topic and payload.  Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('{') {
        return Some((TOPIC_SET_PARAMS, line));
    }
    match line.split_once(char::is_whitespace) {
        Some((topic, payload)) => Some((topic, payload.trim_start())),
        None => Some((line, "")),
    }
}

/// Decode one input line and queue the command.
pub fn ingest_line(line: &str, inbox: &CommandInbox) -> Result<()> {
    let Some((topic, payload)) = parse_line(line) else {
        return Ok(());
    };
    let cmd = decode_command(topic, payload.as_bytes())?;
    inbox.push(cmd)
}

/// Read stdin until EOF on a dedicated thread.
pub fn spawn_stdin_reader(inbox: &'static CommandInbox) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("bus-reader".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if let Err(e) = ingest_line(&line, inbox) {
                            warn!("Discarding input: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("stdin read failed: {}", e);
                        break;
                    }
                }
            }
            info!("stdin closed, no further commands");
        })
}
