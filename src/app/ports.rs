//! Port traits: the hexagonal boundary between the control core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (event sinks, bus publishers, config storage) implement
//! these traits.  The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the domain core never touches stdio or
//! files directly.

use crate::config::SimConfig;

use super::events::SimEvent;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / bus)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`SimEvent`]s through this port.  Adapters
/// decide where they go (log lines, bus messages, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &SimEvent);
}

/// Fan one event stream out to two sinks.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &SimEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: &SimEvent) {
        (**self).emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Publisher port (driven adapter: domain → message bus)
// ───────────────────────────────────────────────────────────────

/// Raw topic/payload transport.  Delivery failures are the adapter's
/// concern and never reach the control loop.
pub trait Publisher {
    fn publish(&mut self, topic: &str, payload: &str);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists simulation configuration.
///
/// Implementations MUST validate before persisting: an invalid range is
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration.  A missing store is [`ConfigError::NotFound`];
    /// the caller decides whether to fall back to defaults.
    fn load(&self) -> Result<SimConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SimConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage.
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
