//! Error types for the sanitization engine.
//!
//! Every error here is a configuration error raised while the engine is being
//! assembled. Sanitizing a value never fails.

use thiserror::Error;

/// Result type for sanitizer construction.
pub type Result<T> = std::result::Result<T, SanitizeError>;

/// Errors that can occur while building or loading the sanitizer.
#[derive(Error, Debug)]
pub enum SanitizeError {
    /// The mask token (or the rules used to validate it) is unusable.
    #[error("invalid mask token config: {reason}")]
    InvalidMaskTokenConfig { reason: String },

    /// A custom sensitive key is empty or contains control characters.
    #[error("invalid sensitive key config at index {index}: {reason}")]
    InvalidSensitiveKeyConfig { index: usize, reason: String },

    /// A sensitive pattern failed to compile.
    #[error("invalid pattern config `{pattern}`: {reason}")]
    InvalidPatternConfig { pattern: String, reason: String },

    /// A custom credential-phrase separator is empty or contains whitespace.
    #[error("invalid separator config `{separator}`: {reason}")]
    InvalidSeparatorConfig { separator: String, reason: String },

    /// The traversal depth limit is outside the supported range.
    #[error("invalid max depth {value}: {reason}")]
    InvalidDepthConfig { value: usize, reason: String },

    /// I/O error while reading or writing a config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for the expected schema.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SanitizeError {
    /// Stable error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            SanitizeError::InvalidMaskTokenConfig { .. } => 40,
            SanitizeError::InvalidSensitiveKeyConfig { .. } => 41,
            SanitizeError::InvalidPatternConfig { .. } => 42,
            SanitizeError::InvalidSeparatorConfig { .. } => 43,
            SanitizeError::InvalidDepthConfig { .. } => 44,
            SanitizeError::Io(_) => 50,
            SanitizeError::Json(_) => 51,
        }
    }

    /// Short machine-readable name of the config list at fault.
    pub fn kind(&self) -> &'static str {
        match self {
            SanitizeError::InvalidMaskTokenConfig { .. } => "mask_token",
            SanitizeError::InvalidSensitiveKeyConfig { .. } => "sensitive_keys",
            SanitizeError::InvalidPatternConfig { .. } => "sensitive_patterns",
            SanitizeError::InvalidSeparatorConfig { .. } => "separators",
            SanitizeError::InvalidDepthConfig { .. } => "max_depth",
            SanitizeError::Io(_) => "io",
            SanitizeError::Json(_) => "json",
        }
    }
}
