//! dcfuzzy: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  StdoutPublisher   LogEventSink   JsonFileConfig   stdin reader│
//! │  (BusEventSink)    (EventSink)    (ConfigPort)     (inbox)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlService (pure logic)                 │    │
//! │  │  Fuzzy · Plant · Safety · Mode FSM                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use dcfuzzy::adapters::bus::BusEventSink;
use dcfuzzy::adapters::config_file::JsonFileConfig;
use dcfuzzy::adapters::log_sink::LogEventSink;
use dcfuzzy::adapters::stdio::{StdoutPublisher, spawn_stdin_reader};
use dcfuzzy::app::ports::{ConfigError, ConfigPort};
use dcfuzzy::app::service::ControlService;
use dcfuzzy::config::SimConfig;
use dcfuzzy::inbox::CommandInbox;

// ── Command line ──────────────────────────────────────────────

/// Fuzzy CRAC control-loop simulator.
///
/// Frames are written to stdout as `<topic> <json>` lines; commands are
/// read from stdin as `<topic> <json>` or bare `set_params` JSON.
#[derive(Parser, Debug)]
#[command(name = "dcfuzzy", version, about)]
struct Args {
    /// JSON config file; missing fields take their defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the wall-clock interval between simulated minutes
    #[arg(long, value_name = "N")]
    tick_ms: Option<u32>,

    /// Stop after N ticks instead of running until killed
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Write the effective config to PATH and exit
    #[arg(long, value_name = "PATH")]
    dump_config: Option<PathBuf>,
}

/// Commands from the stdin reader thread to the control loop.
static INBOX: CommandInbox = CommandInbox::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    // `log` records are bridged into tracing by the subscriber's
    // tracing-log integration.  stdout is reserved for bus frames.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("dcfuzzy v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = load_config(args.config.as_deref());
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
    }
    config.validate().context("invalid configuration")?;

    if let Some(path) = args.dump_config {
        JsonFileConfig::new(&path)
            .save(&config)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Config written to {}", path.display());
        return Ok(());
    }

    // ── 3. Bus ────────────────────────────────────────────────
    let _reader = spawn_stdin_reader(&INBOX).context("spawning stdin reader")?;
    let bus = BusEventSink::new(StdoutPublisher::new(std::io::stdout()));
    let mut sink = (LogEventSink::new(), bus);

    // ── 4. Control loop ───────────────────────────────────────
    let tick = Duration::from_millis(u64::from(config.tick_interval_ms));
    let heartbeat = Duration::from_millis(u64::from(config.pause_heartbeat_ms));
    let reset_pause = Duration::from_millis(u64::from(config.reset_pause_ms));

    let mut service = ControlService::new(config);
    service.start(&mut sink);

    loop {
        if args.ticks.is_some_and(|n| service.tick_count() >= n) {
            break;
        }
        let report = service.tick(&INBOX, &mut sink);
        let delay = if report.reset {
            reset_pause
        } else if report.held.is_some() {
            heartbeat
        } else {
            tick
        };
        thread::sleep(delay);
    }

    let state = service.state();
    info!(
        "Stopped after {} ticks at minute {} (T={:.2}°C, P={:.2}%)",
        service.tick_count(),
        state.minute,
        state.temperature,
        state.power
    );
    if service.held_inferences() > 0 {
        warn!("Inference held power on {} steps", service.held_inferences());
    }
    Ok(())
}

/// Load config from `path`, falling back to defaults on any failure.
fn load_config(path: Option<&Path>) -> SimConfig {
    let Some(path) = path else {
        return SimConfig::default();
    };
    match JsonFileConfig::new(path).load() {
        Ok(cfg) => cfg,
        Err(ConfigError::NotFound) => {
            info!("{} not found, using defaults", path.display());
            SimConfig::default()
        }
        Err(e) => {
            warn!("Config load failed ({}), running with defaults", e);
            SimConfig::default()
        }
    }
}
