//! Mask token validation and normalization.

use crate::normalize::UnicodeNormalizer;
use crate::{Result, SanitizeError};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// Bracket pairs stripped from a raw token before it is re-wrapped.
const BRACKET_PAIRS: &[(char, char)] = &[('[', ']'), ('(', ')'), ('{', '}'), ('<', '>')];

/// A validated replacement token, always of the form `[UPPERCASE]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaskToken(String);

impl MaskToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MaskToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for MaskToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Validates raw tokens against a length bound and a forbidden-content pattern.
#[derive(Debug, Clone)]
pub struct MaskTokenValidator {
    max_length: usize,
    forbidden: Regex,
}

impl MaskTokenValidator {
    /// Create a validator. Fails if `forbidden_pattern` does not compile.
    pub fn new(max_length: usize, forbidden_pattern: &str) -> Result<Self> {
        let forbidden =
            Regex::new(forbidden_pattern).map_err(|e| SanitizeError::InvalidMaskTokenConfig {
                reason: format!("forbidden-content pattern does not compile: {e}"),
            })?;
        Ok(Self {
            max_length,
            forbidden,
        })
    }

    /// Validate `raw` and normalize it to `[UPPERCASE]` form.
    ///
    /// Rules, in order:
    /// 1. Trim surrounding whitespace; must not be empty.
    /// 2. Must not exceed the maximum length.
    /// 3. Strip one layer of surrounding brackets; the inner text must not be
    ///    empty.
    /// 4. Uppercase and canonicalize (NFKC) the inner text, which must then
    ///    be a single word free of forbidden content. A token with spaces
    ///    would be split by the free-text matchers on a later pass.
    pub fn validate(&self, raw: &str) -> Result<MaskToken> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SanitizeError::InvalidMaskTokenConfig {
                reason: "mask token is empty".to_string(),
            });
        }

        let length = trimmed.chars().count();
        if length > self.max_length {
            return Err(SanitizeError::InvalidMaskTokenConfig {
                reason: format!(
                    "mask token is {} characters, maximum is {}",
                    length, self.max_length
                ),
            });
        }

        let inner = unwrap_brackets(trimmed).trim();
        if inner.is_empty() {
            return Err(SanitizeError::InvalidMaskTokenConfig {
                reason: "mask token is empty inside its brackets".to_string(),
            });
        }
        let upper = inner.to_uppercase();
        let canonical = UnicodeNormalizer::normalize(&upper);
        if canonical.chars().any(char::is_whitespace) {
            return Err(SanitizeError::InvalidMaskTokenConfig {
                reason: "mask token contains whitespace".to_string(),
            });
        }
        if self.forbidden.is_match(inner) || self.forbidden.is_match(&canonical) {
            return Err(SanitizeError::InvalidMaskTokenConfig {
                reason: "mask token contains forbidden content".to_string(),
            });
        }

        Ok(MaskToken(format!("[{canonical}]")))
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

fn unwrap_brackets(token: &str) -> &str {
    for &(open, close) in BRACKET_PAIRS {
        if let Some(inner) = token
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner;
        }
    }
    token
}
