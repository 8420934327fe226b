//! Substring masking with the configured value patterns.

use crate::normalize::UnicodeNormalizer;
use crate::patterns::SensitivePatternDetector;
use crate::{Result, SanitizeError};
use regex::{NoExpand, Regex};
use std::borrow::Cow;

/// Masks every substring matching any active pattern.
///
/// All patterns are compiled into a single alternation once, at construction.
#[derive(Debug, Clone)]
pub struct SensitivePatternSanitizer {
    combined: Option<Regex>,
}

impl SensitivePatternSanitizer {
    pub fn new(detector: &SensitivePatternDetector) -> Result<Self> {
        let patterns = detector.patterns();
        if patterns.is_empty() {
            return Ok(Self { combined: None });
        }

        let alternation = patterns
            .iter()
            .map(|p| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|");
        let combined = Regex::new(&alternation).map_err(|e| SanitizeError::InvalidPatternConfig {
            pattern: "<combined alternation>".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            combined: Some(combined),
        })
    }

    /// Replace every match in the canonicalized form of `value` with `token`.
    ///
    /// Text with no match is returned exactly as given, without
    /// canonicalization.
    pub fn sanitize<'a>(&self, value: &'a str, token: &str) -> Cow<'a, str> {
        let Some(combined) = &self.combined else {
            return Cow::Borrowed(value);
        };

        let normalized = UnicodeNormalizer::normalize(value);
        if !combined.is_match(&normalized) {
            return Cow::Borrowed(value);
        }
        Cow::Owned(
            combined
                .replace_all(&normalized, NoExpand(token))
                .into_owned(),
        )
    }
}
