//! Pure control-path functions: the fuzzy controller and the room model.
//!
//! Both are stateless and called synchronously from the control loop, so
//! neither needs any locking.

pub mod fuzzy;
pub mod plant;
