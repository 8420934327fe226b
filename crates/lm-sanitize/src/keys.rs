//! Sensitive field-name detection.
//!
//! Each configured key is expanded into normalized variants once, at
//! construction. A candidate key is sensitive when any of its own variants is in
//! that set, which tolerates `API_KEY` / `api-key` / `apikey` style drift
//! without configuring every spelling.

use crate::normalize::UnicodeNormalizer;
use crate::{Result, SanitizeError};
use std::collections::{BTreeSet, HashSet};

/// Built-in sensitive key names (English and Portuguese).
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &[
    // Credentials
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "access_token",
    "refresh_token",
    "auth_token",
    "api_key",
    "api_secret",
    "client_secret",
    "private_key",
    "authorization",
    "bearer",
    "credentials",
    // Payment / identity
    "credit_card",
    "card_number",
    "cvv",
    "cvc",
    "ssn",
    "social_security_number",
    // Portuguese
    "senha",
    "segredo",
    "chave_api",
    "chave_privada",
    "token_acesso",
    "credenciais",
    "cartao_credito",
    "cartão_de_crédito",
    "numero_cartao",
    "cpf",
    "cnpj",
];

/// Separators ignored by the fuzzy variant.
const FUZZY_SEPARATORS: &[char] = &['_', '-', '@'];

/// Vowel-stripped variants shorter than this are not indexed; two-letter
/// consonant skeletons collide with too many ordinary words.
const MIN_CONSONANT_VARIANT_LEN: usize = 3;

/// Decides whether a field name is sensitive.
#[derive(Debug, Clone)]
pub struct SensitiveKeyDetector {
    prepared: HashSet<String>,
}

impl SensitiveKeyDetector {
    /// Build a detector from the defaults plus `custom_keys`.
    ///
    /// Fails if any custom key is empty, whitespace-only, or contains
    /// control characters.
    pub fn new<S: AsRef<str>>(custom_keys: &[S]) -> Result<Self> {
        for (index, key) in custom_keys.iter().enumerate() {
            validate_key(index, key.as_ref())?;
        }

        let prepared = DEFAULT_SENSITIVE_KEYS
            .iter()
            .copied()
            .chain(custom_keys.iter().map(|key| key.as_ref()))
            .flat_map(key_variants)
            .collect();

        Ok(Self { prepared })
    }

    /// Detector with only the built-in keys.
    pub fn with_defaults() -> Self {
        let prepared = DEFAULT_SENSITIVE_KEYS
            .iter()
            .copied()
            .flat_map(key_variants)
            .collect();
        Self { prepared }
    }

    /// Whether `key` names a sensitive field.
    pub fn is_sensitive_key(&self, key: &str) -> bool {
        key_variants(key)
            .iter()
            .any(|variant| self.prepared.contains(variant))
    }

    /// All prepared variants, sorted (for auditing).
    pub fn prepared_keys(&self) -> Vec<String> {
        self.prepared
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.prepared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepared.is_empty()
    }
}

impl Default for SensitiveKeyDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn validate_key(index: usize, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(SanitizeError::InvalidSensitiveKeyConfig {
            index,
            reason: "key is empty or whitespace-only".to_string(),
        });
    }
    if key.chars().any(char::is_control) {
        return Err(SanitizeError::InvalidSensitiveKeyConfig {
            index,
            reason: "key contains control characters".to_string(),
        });
    }
    if UnicodeNormalizer::normalize(key).chars().all(is_key_separator) {
        return Err(SanitizeError::InvalidSensitiveKeyConfig {
            index,
            reason: "key consists only of separators".to_string(),
        });
    }
    Ok(())
}

/// The normalized forms of `key`: lowercase, canonical, fuzzy, and
/// vowel-stripped. Empty forms are dropped.
pub(crate) fn key_variants(key: &str) -> Vec<String> {
    let key = key.trim();
    let lower = key.to_lowercase();
    let canonical = UnicodeNormalizer::normalize(key).to_lowercase();
    let fuzzy: String = lower
        .chars()
        .filter(|c| !FUZZY_SEPARATORS.contains(c))
        .collect();
    let consonants: String = lower.chars().filter(|c| !is_vowel(*c)).collect();

    let mut variants = Vec::with_capacity(4);
    for variant in [lower, canonical, fuzzy] {
        if !variant.is_empty() && !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    if consonants.chars().count() >= MIN_CONSONANT_VARIANT_LEN && !variants.contains(&consonants)
    {
        variants.push(consonants);
    }
    variants
}

/// Characters that may separate the words of a key (`api_key`, `api-key`,
/// `user@token`, `api key`).
pub(crate) fn is_key_separator(c: char) -> bool {
    FUZZY_SEPARATORS.contains(&c) || c.is_whitespace()
}

fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e'
            | 'i'
            | 'o'
            | 'u'
            | 'á'
            | 'à'
            | 'â'
            | 'ã'
            | 'ä'
            | 'é'
            | 'è'
            | 'ê'
            | 'ë'
            | 'í'
            | 'ì'
            | 'î'
            | 'ï'
            | 'ó'
            | 'ò'
            | 'ô'
            | 'õ'
            | 'ö'
            | 'ú'
            | 'ù'
            | 'û'
            | 'ü'
    )
}
