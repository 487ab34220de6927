//! Fuzz target: `decode_command` and `ingest_line`
//!
//! Drives arbitrary bytes through the inbound `set_params` path and asserts
//! that it never panics, that a decoded manual patch only carries finite
//! numbers, and that a rejected line never reaches the inbox.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use dcfuzzy::adapters::bus::{TOPIC_SET_PARAMS, decode_command};
use dcfuzzy::adapters::stdio::ingest_line;
use dcfuzzy::app::commands::SimCommand;
use dcfuzzy::inbox::CommandInbox;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(SimCommand::SetManual(patch)) = decode_command(TOPIC_SET_PARAMS, data) {
        for v in [patch.setpoint, patch.external_temp, patch.external_heat]
            .into_iter()
            .flatten()
        {
            assert!(v.is_finite(), "non-finite manual parameter {v}");
        }
    }

    if let Ok(line) = std::str::from_utf8(data) {
        let inbox = CommandInbox::new();
        let accepted = ingest_line(line, &inbox).is_ok();
        if !accepted {
            assert!(inbox.is_empty(), "rejected line reached the inbox");
        }
    }
});
