//! Sanitizer configuration.
//!
//! Holds the caller-supplied lists and limits that the engine is built from.
//! Built-in defaults (keys, patterns, separators) are always merged in by the
//! individual components; the lists here only carry the custom additions.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version for the config file.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Default replacement token.
pub const DEFAULT_MASK_TOKEN: &str = "[MASKED]";

/// Default traversal depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Hard upper bound accepted for `max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Default maximum mask token length, in characters.
pub const DEFAULT_MASK_TOKEN_MAX_LENGTH: usize = 32;

/// Default content a mask token may not carry: control characters and
/// anything resembling encoded or executable payloads.
pub const DEFAULT_MASK_TOKEN_FORBIDDEN_PATTERN: &str =
    r"(?i)\p{Cc}|base64|script|\beval\b|\bexec\b|[<>]";

/// Sanitization configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Custom sensitive key names, merged with the built-in set.
    #[serde(default)]
    pub sensitive_keys: Vec<String>,

    /// Custom value patterns (Rust regex syntax), merged with the built-in set.
    #[serde(default)]
    pub sensitive_patterns: Vec<String>,

    /// Custom credential-phrase separators, merged with the built-in set.
    #[serde(default)]
    pub separators: Vec<String>,

    /// Deepest container nesting level that is still traversed.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Token used when a call does not supply one.
    #[serde(default = "default_mask_token")]
    pub default_mask_token: String,

    /// Maximum mask token length (characters, after trimming).
    #[serde(default = "default_mask_token_max_length")]
    pub mask_token_max_length: usize,

    /// Content a mask token must not contain.
    #[serde(default = "default_forbidden_pattern")]
    pub mask_token_forbidden_pattern: String,
}

fn default_schema_version() -> String {
    CONFIG_SCHEMA_VERSION.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_mask_token() -> String {
    DEFAULT_MASK_TOKEN.to_string()
}

fn default_mask_token_max_length() -> usize {
    DEFAULT_MASK_TOKEN_MAX_LENGTH
}

fn default_forbidden_pattern() -> String {
    DEFAULT_MASK_TOKEN_FORBIDDEN_PATTERN.to_string()
}

impl SanitizationConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SanitizationConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build every component once and discard the result.
    ///
    /// Fails with the same error `SanitizingService::new` would.
    pub fn validate(&self) -> crate::Result<()> {
        crate::SanitizingService::new(self.clone()).map(|_| ())
    }

    pub fn with_sensitive_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sensitive_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitive_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_default_mask_token(mut self, token: impl Into<String>) -> Self {
        self.default_mask_token = token.into();
        self
    }

    pub fn with_mask_token_max_length(mut self, max_length: usize) -> Self {
        self.mask_token_max_length = max_length;
        self
    }

    pub fn with_mask_token_forbidden_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.mask_token_forbidden_pattern = pattern.into();
        self
    }
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            sensitive_keys: Vec::new(),
            sensitive_patterns: Vec::new(),
            separators: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            default_mask_token: DEFAULT_MASK_TOKEN.to_string(),
            mask_token_max_length: DEFAULT_MASK_TOKEN_MAX_LENGTH,
            mask_token_forbidden_pattern: DEFAULT_MASK_TOKEN_FORBIDDEN_PATTERN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SanitizationConfig::default();
        assert_eq!(config.schema_version, CONFIG_SCHEMA_VERSION);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.default_mask_token, "[MASKED]");
        assert!(config.sensitive_keys.is_empty());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SanitizationConfig =
            serde_json::from_str(r#"{"sensitive_keys": ["session_id"]}"#).unwrap();
        assert_eq!(config.sensitive_keys, vec!["session_id".to_string()]);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(
            config.mask_token_forbidden_pattern,
            DEFAULT_MASK_TOKEN_FORBIDDEN_PATTERN
        );
    }

    #[test]
    fn test_builder_setters() {
        let config = SanitizationConfig::new()
            .with_sensitive_keys(["session_id"])
            .with_sensitive_patterns([r"\bID-\d+\b"])
            .with_separators(["~>"])
            .with_max_depth(4)
            .with_default_mask_token("redacted");

        assert_eq!(config.sensitive_keys, vec!["session_id"]);
        assert_eq!(config.sensitive_patterns, vec![r"\bID-\d+\b"]);
        assert_eq!(config.separators, vec!["~>"]);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.default_mask_token, "redacted");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sanitizer.json");

        let config = SanitizationConfig::new().with_sensitive_keys(["pin_code"]);
        config.save(&path).unwrap();

        let loaded = SanitizationConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SanitizationConfig::load("/nonexistent/sanitizer.json").unwrap_err();
        assert!(matches!(err, crate::SanitizeError::Io(_)));
    }
}
