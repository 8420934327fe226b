//! Fuzz target for sanitizer config parsing and validation.
//!
//! Arbitrary config files must be rejected with an error, never a panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lm_sanitize::{SanitizationConfig, SanitizingService};

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<SanitizationConfig>(data) {
        let _ = SanitizingService::new(config);
    }
});
