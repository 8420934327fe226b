//! Sensitive value detection by regular expression.

use crate::value::Value;
use crate::{Result, SanitizeError};
use regex::Regex;

/// Built-in value signatures.
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &[
    // Brazilian CPF (123.456.789-09)
    r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b",
    // Brazilian CNPJ (12.345.678/0001-95)
    r"\b\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}\b",
    // US SSN (123-45-6789)
    r"\b\d{3}-\d{2}-\d{4}\b",
    // 16-digit card numbers, optionally grouped by space or dash
    r"\b\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{4}\b",
    // 15-digit AmEx
    r"\b3[47]\d{2}[ -]?\d{6}[ -]?\d{5}\b",
    // Email addresses
    r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
];

/// Decides whether a string value matches a configured signature.
#[derive(Debug, Clone)]
pub struct SensitivePatternDetector {
    patterns: Vec<String>,
    compiled: Vec<Regex>,
}

impl SensitivePatternDetector {
    /// Build a detector from the defaults followed by `custom_patterns`.
    ///
    /// Every pattern must compile; the first one that does not fails
    /// construction.
    pub fn new<S: AsRef<str>>(custom_patterns: &[S]) -> Result<Self> {
        let patterns: Vec<String> = DEFAULT_SENSITIVE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(custom_patterns.iter().map(|p| p.as_ref().to_string()))
            .collect();

        let compiled = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| SanitizeError::InvalidPatternConfig {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns, compiled })
    }

    /// Detector with only the built-in patterns.
    pub fn with_defaults() -> Result<Self> {
        Self::new::<&str>(&[])
    }

    /// Whether `value` is a string matching any pattern. Non-strings never match.
    pub fn matches(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => self.matches_str(s),
            _ => false,
        }
    }

    /// Whether `value` matches any pattern, checked in configured order.
    pub fn matches_str(&self, value: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(value))
    }

    /// Active patterns in configured order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
