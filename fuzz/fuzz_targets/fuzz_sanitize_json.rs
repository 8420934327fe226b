//! Fuzz target for JSON document sanitization.
//!
//! Any document that parses must sanitize without panicking, however deep.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lm_sanitize::{SanitizationConfig, SanitizingService};
use std::sync::OnceLock;

fn service() -> &'static SanitizingService {
    static SERVICE: OnceLock<SanitizingService> = OnceLock::new();
    SERVICE.get_or_init(|| {
        SanitizingService::new(SanitizationConfig::default().with_max_depth(4))
            .expect("config is valid")
    })
}

fuzz_target!(|data: &[u8]| {
    if let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = service().sanitize_json(&document, None);
    }
});
