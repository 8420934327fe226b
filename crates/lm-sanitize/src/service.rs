//! The sanitizer entry point.

use crate::array::ArraySanitizer;
use crate::config::{SanitizationConfig, MAX_DEPTH_LIMIT};
use crate::keys::SensitiveKeyDetector;
use crate::mask_token::{MaskToken, MaskTokenValidator};
use crate::object::ObjectSanitizer;
use crate::pattern_sanitizer::SensitivePatternSanitizer;
use crate::patterns::SensitivePatternDetector;
use crate::phrase::CredentialPhraseSanitizer;
use crate::string_sanitizer::StringSanitizer;
use crate::traversal::{scalar_json, Rules};
use crate::value::Value;
use crate::{Result, SanitizeError};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// Masks sensitive data in arbitrary values.
///
/// Built once from a [`SanitizationConfig`] and immutable afterwards. Every
/// call owns its own traversal state, so one service can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct SanitizingService {
    config: SanitizationConfig,
    token_validator: MaskTokenValidator,
    default_token: MaskToken,
    patterns: SensitivePatternDetector,
    rules: Arc<Rules>,
    arrays: ArraySanitizer,
    objects: ObjectSanitizer,
}

impl SanitizingService {
    /// Build every component from `config`.
    ///
    /// Fails on the first invalid setting; no partially built service is
    /// ever returned.
    pub fn new(config: SanitizationConfig) -> Result<Self> {
        if config.max_depth == 0 || config.max_depth > MAX_DEPTH_LIMIT {
            return Err(SanitizeError::InvalidDepthConfig {
                value: config.max_depth,
                reason: format!("must be between 1 and {MAX_DEPTH_LIMIT}"),
            });
        }

        let token_validator = MaskTokenValidator::new(
            config.mask_token_max_length,
            &config.mask_token_forbidden_pattern,
        )?;
        let default_token = token_validator.validate(&config.default_mask_token)?;

        let keys = SensitiveKeyDetector::new(&config.sensitive_keys)?;
        let patterns = SensitivePatternDetector::new(&config.sensitive_patterns)?;
        let phrases = CredentialPhraseSanitizer::new(&keys, &config.separators)?;
        let strings = StringSanitizer::new(phrases, SensitivePatternSanitizer::new(&patterns)?);

        if !survives_phrase_pass(&strings, &default_token) {
            return Err(SanitizeError::InvalidMaskTokenConfig {
                reason: format!("mask token {default_token} reads as a credential phrase"),
            });
        }
        if patterns.matches_str(default_token.as_str()) {
            warn!(
                token = %default_token,
                "default mask token matches a sensitive pattern; output will not be stable under re-sanitization"
            );
        }

        debug!(
            keys = keys.len(),
            patterns = patterns.patterns().len(),
            separators = config.separators.len(),
            max_depth = config.max_depth,
            "sanitizer ready"
        );

        let rules = Arc::new(Rules {
            keys,
            strings,
            max_depth: config.max_depth,
        });

        Ok(Self {
            arrays: ArraySanitizer::new(Arc::clone(&rules)),
            objects: ObjectSanitizer::new(Arc::clone(&rules)),
            rules,
            patterns,
            default_token,
            token_validator,
            config,
        })
    }

    /// Service built from the default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(SanitizationConfig::default())
    }

    /// Return a sanitized copy of `value`.
    ///
    /// `token` overrides the configured mask token for this call. A token
    /// that fails validation is replaced by the default one; this never
    /// fails.
    pub fn sanitize(&self, value: &Value, token: Option<&str>) -> JsonValue {
        let token = self.resolve_token(token);
        match value {
            Value::String(s) => {
                JsonValue::String(self.rules.strings.sanitize(s, token.as_str()).into_owned())
            }
            Value::Array(array) => self.arrays.sanitize(array, &token),
            Value::Object(object) => self.objects.sanitize(object, &token),
            scalar => scalar_json(scalar),
        }
    }

    /// Sanitize a JSON document.
    pub fn sanitize_json(&self, value: &JsonValue, token: Option<&str>) -> JsonValue {
        self.sanitize(&Value::from(value.clone()), token)
    }

    /// Whether a single value matches a sensitive pattern.
    ///
    /// Structures are not inspected; this is an audit check, not a masking step.
    pub fn is_sensitive(&self, value: &Value) -> bool {
        self.patterns.matches(value)
    }

    fn resolve_token(&self, token: Option<&str>) -> Cow<'_, MaskToken> {
        let Some(raw) = token else {
            return Cow::Borrowed(&self.default_token);
        };
        match self.token_validator.validate(raw) {
            Ok(token) if survives_phrase_pass(&self.rules.strings, &token) => Cow::Owned(token),
            Ok(token) => {
                warn!(token = %token, "mask token reads as a credential phrase, using the default");
                Cow::Borrowed(&self.default_token)
            }
            Err(e) => {
                warn!(error = %e, "mask token rejected, using the default");
                Cow::Borrowed(&self.default_token)
            }
        }
    }

    pub fn config(&self) -> &SanitizationConfig {
        &self.config
    }

    pub fn default_mask_token(&self) -> &MaskToken {
        &self.default_token
    }

    pub fn token_validator(&self) -> &MaskTokenValidator {
        &self.token_validator
    }

    pub fn key_detector(&self) -> &SensitiveKeyDetector {
        &self.rules.keys
    }

    pub fn pattern_detector(&self) -> &SensitivePatternDetector {
        &self.patterns
    }

    pub fn string_sanitizer(&self) -> &StringSanitizer {
        &self.rules.strings
    }

    pub fn array_sanitizer(&self) -> &ArraySanitizer {
        &self.arrays
    }

    pub fn object_sanitizer(&self) -> &ObjectSanitizer {
        &self.objects
    }
}

/// A token the phrase matcher would rewrite (`[SECRET:X]`) keeps changing on
/// every pass.
fn survives_phrase_pass(strings: &StringSanitizer, token: &MaskToken) -> bool {
    let token = token.as_str();
    strings.phrase_sanitizer().sanitize(token, token) == token
}
