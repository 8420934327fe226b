//! Sensitive-data sanitization for structured log context.
//!
//! This crate inspects arbitrary values on their way to a log line (strings,
//! keyed and positional containers, object-like records) and replaces
//! sensitive fragments with a mask token before anything is written.
//!
//! # Key Features
//!
//! - **Key-name heuristics**: values stored under sensitive keys are masked
//!   whole. Keys match through normalized, fuzzy, and vowel-stripped variants,
//!   so `API_KEY`, `api-key` and `apikey` are treated alike.
//! - **Value patterns**: national IDs, card numbers and emails are masked in
//!   place, leaving the surrounding text readable.
//! - **Credential phrases**: free text such as `password is now: hunter2`
//!   has its value masked even without any structure.
//! - **Bounded traversal**: a depth limit and identity-based cycle detection
//!   guarantee termination on nested or self-referencing input.
//! - **Total**: once built, sanitizing never fails. Invalid configuration is
//!   rejected at construction.
//!
//! # Example
//!
//! ```
//! use lm_sanitize::{SanitizationConfig, SanitizingService, Value};
//! use serde_json::json;
//!
//! let service = SanitizingService::new(SanitizationConfig::default()).unwrap();
//!
//! let masked = service.sanitize_json(&json!({"password": "secret123"}), None);
//! assert_eq!(masked, json!({"password": "[MASKED]"}));
//!
//! let text = service.sanitize(&Value::from("User CPF: 123.456.789-09"), None);
//! assert_eq!(text, json!("User CPF: [MASKED]"));
//! ```

pub mod array;
pub mod circular;
pub mod config;
pub mod error;
pub mod keys;
pub mod mask_token;
pub mod normalize;
pub mod object;
pub mod pattern_sanitizer;
pub mod patterns;
pub mod phrase;
pub mod service;
pub mod string_sanitizer;
mod traversal;
pub mod value;

pub use array::ArraySanitizer;
pub use circular::{CircularReferenceDetector, CIRCULAR_MARKER_KEY};
pub use config::{
    SanitizationConfig, CONFIG_SCHEMA_VERSION, DEFAULT_MASK_TOKEN, DEFAULT_MAX_DEPTH,
    MAX_DEPTH_LIMIT,
};
pub use error::{Result, SanitizeError};
pub use keys::{SensitiveKeyDetector, DEFAULT_SENSITIVE_KEYS};
pub use mask_token::{MaskToken, MaskTokenValidator};
pub use normalize::UnicodeNormalizer;
pub use object::ObjectSanitizer;
pub use pattern_sanitizer::SensitivePatternSanitizer;
pub use patterns::{SensitivePatternDetector, DEFAULT_SENSITIVE_PATTERNS};
pub use phrase::{CredentialPhraseSanitizer, DEFAULT_SEPARATORS};
pub use service::SanitizingService;
pub use string_sanitizer::StringSanitizer;
pub use traversal::{
    halt_marker, HALT_MARKER_KEY, HALT_REASON_MAX_DEPTH, PRIVATE_FIELDS_SUFFIX, TYPE_TAG_KEY,
};
pub use value::{ArrayRef, Container, Field, NodeId, Object, ObjectRef, Value, Visibility};
