//! Fuzz target for free-text sanitization.
//!
//! Arbitrary text must never panic, and sanitizing the output again must
//! change nothing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lm_sanitize::{SanitizingService, Value};
use std::sync::OnceLock;

fn service() -> &'static SanitizingService {
    static SERVICE: OnceLock<SanitizingService> = OnceLock::new();
    SERVICE.get_or_init(|| SanitizingService::with_defaults().expect("default config is valid"))
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let once = service().sanitize(&Value::from(text), None);
    let twice = service().sanitize_json(&once, None);
    assert_eq!(once, twice, "sanitizing is not idempotent");
});
