//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the data-center simulation: command
//! handling, the per-tick control sequence and the events it produces.
//! All interaction with the outside world happens through **port traits**
//! defined in [`ports`], keeping this layer testable without a bus.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
