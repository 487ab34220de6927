//! Unified error types for the control loop simulator.
//!
//! A single `Error` enum that every subsystem converts into, so adapters at
//! the edge of the loop can handle failures uniformly.  None of these are
//! fatal to the control loop: the service either holds its last output or
//! the adapter logs and discards the offending input.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The fuzzy engine could not produce a crisp output.
    Inference(InferenceError),
    /// An inbound command payload was rejected.
    Command(CommandError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The command inbox is full; the command was dropped.
    InboxFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inference(e) => write!(f, "inference: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::InboxFull => write!(f, "command inbox full"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Inference errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceError {
    /// No rule fired, so the aggregated output region has zero area.
    /// Only reachable with non-finite inputs given full set coverage.
    NoRuleFired,
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleFired => write!(f, "no rule fired"),
        }
    }
}

impl std::error::Error for InferenceError {}

impl From<InferenceError> for Error {
    fn from(e: InferenceError) -> Self {
        Self::Inference(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Message arrived on a topic the simulator does not subscribe to.
    UnknownTopic(String),
    /// Payload is not valid JSON or a field has the wrong type.
    Malformed(String),
    /// Payload parsed but carries neither a known `cmd` nor a known `mode`.
    Unrecognized,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTopic(t) => write!(f, "unknown topic '{t}'"),
            Self::Malformed(msg) => write!(f, "malformed payload: {msg}"),
            Self::Unrecognized => write!(f, "unrecognized command"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
