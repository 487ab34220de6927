//! Datacenter cooling control-loop simulator.
//!
//! A Mamdani fuzzy controller drives a simulated CRAC unit against a
//! first-order room model, with a fire-mode override, operator commands
//! and JSON telemetry.  The binary wires these modules to stdio; the
//! library exposes them for integration testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod inbox;
pub mod safety;
