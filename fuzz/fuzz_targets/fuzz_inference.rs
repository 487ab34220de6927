//! Fuzz target: `fuzzy::infer`
//!
//! Feeds arbitrary `(error, error_rate)` bit patterns, NaN and infinities
//! included, and checks:
//! - No panics
//! - Finite inputs always produce a power within `[0, 100]`
//! - `NoRuleFired` only for non-finite inputs
//!
//! cargo fuzz run fuzz_inference

#![no_main]

use dcfuzzy::control::fuzzy::infer;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let (e_bytes, rest) = data.split_at(4);
    let error = f32::from_le_bytes([e_bytes[0], e_bytes[1], e_bytes[2], e_bytes[3]]);
    let rate = f32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);

    match infer(error, rate) {
        Ok(p) => assert!((0.0..=100.0).contains(&p), "power {p} for ({error}, {rate})"),
        Err(_) => assert!(
            error.is_nan() || rate.is_nan(),
            "no rule fired for ({error}, {rate})"
        ),
    }
});
