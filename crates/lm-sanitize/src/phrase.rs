//! Credential phrases embedded in free text.
//!
//! Catches `password is now: hunter2` style text where a sensitive key, a
//! separator, and a value appear together without any structure. Only the
//! value is replaced; the key, separator, and spacing stay as written.

use crate::keys::{is_key_separator, SensitiveKeyDetector};
use crate::normalize::UnicodeNormalizer;
use crate::{Result, SanitizeError};
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Built-in separators: punctuation plus English and Portuguese copulas.
pub const DEFAULT_SEPARATORS: &[&str] = &[
    ":", "=", "-", "->", "=>", "|", "/", ";", ",", // symbols
    "is", "was", "are", "were", // English
    "é", "era", "foi", "são", // Portuguese
];

/// Words tolerated between a key and its separator.
const MAX_INTERVENING_WORDS: usize = 3;

/// Keys with fewer word characters than this are left out of free-text
/// matching.
const MIN_PHRASE_KEY_LEN: usize = 3;

/// Trailing characters kept outside the masked value.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\'', ')'];

const WORD: &str = r"[\p{L}\p{N}_]+";

/// Masks the value portion of `key separator value` phrases.
#[derive(Debug, Clone)]
pub struct CredentialPhraseSanitizer {
    forward: Regex,
    backward: Regex,
    separators: Vec<String>,
}

impl CredentialPhraseSanitizer {
    /// Build from the key detector's prepared keys and the default plus
    /// custom separators.
    ///
    /// Fails if a custom separator is empty or contains whitespace.
    pub fn new<S: AsRef<str>>(
        key_detector: &SensitiveKeyDetector,
        custom_separators: &[S],
    ) -> Result<Self> {
        for separator in custom_separators {
            validate_separator(separator.as_ref())?;
        }

        let mut separators: Vec<String> = Vec::new();
        for separator in DEFAULT_SEPARATORS
            .iter()
            .copied()
            .chain(custom_separators.iter().map(|s| s.as_ref()))
        {
            if !separators.iter().any(|s| s == separator) {
                separators.push(separator.to_string());
            }
        }

        let keys = key_alternation(&key_detector.prepared_keys());
        let separator = separator_pattern(&separators);
        let words = MAX_INTERVENING_WORDS;

        let forward = format!(
            r"(?i)(?P<head>{keys}(?:\s+{WORD}){{0,{words}}}{separator})(?P<value>\S+)"
        );
        let backward = format!(
            r"(?i)(?P<value>\S+)(?P<tail>{separator}(?:{WORD}\s+){{0,{words}}}{keys})"
        );

        Ok(Self {
            forward: compile(&forward)?,
            backward: compile(&backward)?,
            separators,
        })
    }

    /// Mask credential values in the canonicalized form of `value`.
    ///
    /// The forward form (`key … separator value`) wins: the backward form
    /// (`value separator … key`) is only tried when no forward phrase exists.
    /// Text with no phrase is returned exactly as given.
    pub fn sanitize<'a>(&self, value: &'a str, token: &str) -> Cow<'a, str> {
        let normalized = UnicodeNormalizer::normalize(value);

        if self.forward.is_match(&normalized) {
            let masked = self.forward.replace_all(&normalized, |caps: &Captures<'_>| {
                let (_, trailing) = split_trailing(&caps["value"]);
                format!("{}{}{}", &caps["head"], token, trailing)
            });
            return Cow::Owned(masked.into_owned());
        }

        if self.backward.is_match(&normalized) {
            let masked = self.backward.replace_all(&normalized, |caps: &Captures<'_>| {
                let (_, trailing) = split_trailing(&caps["value"]);
                format!("{}{}{}", token, trailing, &caps["tail"])
            });
            return Cow::Owned(masked.into_owned());
        }

        Cow::Borrowed(value)
    }

    /// Active separators (defaults first, then custom).
    pub fn separators(&self) -> &[String] {
        &self.separators
    }
}

fn validate_separator(separator: &str) -> Result<()> {
    if separator.is_empty() {
        return Err(SanitizeError::InvalidSeparatorConfig {
            separator: separator.to_string(),
            reason: "separator is empty".to_string(),
        });
    }
    if separator.chars().any(char::is_whitespace) {
        return Err(SanitizeError::InvalidSeparatorConfig {
            separator: separator.to_string(),
            reason: "separator contains whitespace".to_string(),
        });
    }
    Ok(())
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| SanitizeError::InvalidPatternConfig {
        pattern: "<credential phrase>".to_string(),
        reason: e.to_string(),
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Longest keys first so that `access_token` wins over `token`.
/// Key separators (`_`, `-`, `@`, space) are interchangeable or absent, so
/// only the remaining characters count towards the minimum length; a key
/// made of separators alone could match the empty string.
fn key_alternation(keys: &[String]) -> String {
    let mut keys: Vec<&String> = keys
        .iter()
        .filter(|k| k.chars().filter(|c| !is_key_separator(*c)).count() >= MIN_PHRASE_KEY_LEN)
        .collect();
    keys.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

    let alternatives: Vec<String> = keys
        .iter()
        .map(|key| {
            let mut pattern = String::new();
            if key.starts_with(is_word_char) {
                pattern.push_str(r"\b");
            }
            for c in key.chars() {
                if is_key_separator(c) {
                    pattern.push_str(r"[_\-@ ]?");
                } else {
                    pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
                }
            }
            if key.ends_with(is_word_char) {
                pattern.push_str(r"\b");
            }
            pattern
        })
        .collect();

    format!("(?:{})", alternatives.join("|"))
}

/// Symbols may hug their neighbours; word separators need whitespace on
/// both sides.
fn separator_pattern(separators: &[String]) -> String {
    let (mut words, mut symbols): (Vec<&String>, Vec<&String>) = separators
        .iter()
        .partition(|s| s.chars().all(is_word_char));
    words.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    symbols.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let join = |list: &[&String]| {
        list.iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|")
    };

    let mut branches = Vec::new();
    if !symbols.is_empty() {
        branches.push(format!(r"\s*(?:{})\s*", join(&symbols)));
    }
    if !words.is_empty() {
        branches.push(format!(r"\s+(?:{})\s+", join(&words)));
    }
    format!("(?:{})", branches.join("|"))
}

/// Split trailing sentence punctuation off a captured value, unless that
/// would leave nothing to mask.
fn split_trailing(value: &str) -> (&str, &str) {
    let core = value.trim_end_matches(TRAILING_PUNCTUATION);
    if core.is_empty() {
        (value, "")
    } else {
        value.split_at(core.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "[MASKED]";

    fn sanitizer() -> CredentialPhraseSanitizer {
        CredentialPhraseSanitizer::new::<&str>(&SensitiveKeyDetector::with_defaults(), &[])
            .unwrap()
    }

    #[test]
    fn test_forward_simple() {
        assert_eq!(sanitizer().sanitize("password: hunter2", TOKEN), "password: [MASKED]");
        assert_eq!(sanitizer().sanitize("token=abc123", TOKEN), "token=[MASKED]");
    }

    #[test]
    fn test_forward_with_intervening_words() {
        assert_eq!(
            sanitizer().sanitize("the old secret was: hunter2", TOKEN),
            "the old secret was: [MASKED]"
        );
        assert_eq!(
            sanitizer().sanitize("password is now: hunter2", TOKEN),
            "password is now: [MASKED]"
        );
    }

    #[test]
    fn test_forward_copula_separator() {
        assert_eq!(
            sanitizer().sanitize("my password is hunter2 and more", TOKEN),
            "my password is [MASKED] and more"
        );
        assert_eq!(sanitizer().sanitize("a senha é 12345", TOKEN), "a senha é [MASKED]");
    }

    #[test]
    fn test_too_many_intervening_words() {
        let input = "password one two three four: hunter2";
        assert_eq!(sanitizer().sanitize(input, TOKEN), input);
    }

    #[test]
    fn test_backward_fallback() {
        assert_eq!(
            sanitizer().sanitize("hunter2 was the password", TOKEN),
            "[MASKED] was the password"
        );
    }

    #[test]
    fn test_forward_takes_precedence_over_backward() {
        // Both forms are present; only the forward value is masked.
        let result = sanitizer().sanitize("abc is the token and password: hunter2", TOKEN);
        assert_eq!(result, "abc is the token and password: [MASKED]");
    }

    #[test]
    fn test_trailing_punctuation_preserved() {
        assert_eq!(
            sanitizer().sanitize("Your password: hunter2.", TOKEN),
            "Your password: [MASKED]."
        );
        assert_eq!(
            sanitizer().sanitize("(api key = xyz)", TOKEN),
            "(api key = [MASKED])"
        );
    }

    #[test]
    fn test_key_spelling_drift() {
        assert_eq!(sanitizer().sanitize("API-KEY: xyz", TOKEN), "API-KEY: [MASKED]");
        assert_eq!(sanitizer().sanitize("Access_Token => xyz", TOKEN), "Access_Token => [MASKED]");
    }

    #[test]
    fn test_key_inside_larger_word_is_ignored() {
        let input = "passwordless: enabled";
        assert_eq!(sanitizer().sanitize(input, TOKEN), input);
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let result = sanitizer().sanitize("user logged in successfully", TOKEN);
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_idempotent() {
        let s = sanitizer();
        for input in [
            "password: hunter2",
            "hunter2 was the password",
            "Your password: hunter2.",
            "password: ...",
        ] {
            let once = s.sanitize(input, TOKEN).into_owned();
            let twice = s.sanitize(&once, TOKEN).into_owned();
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_full_width_separator_is_canonicalized() {
        assert_eq!(
            sanitizer().sanitize("password\u{FF1A} hunter2", TOKEN),
            "password: [MASKED]"
        );
    }

    #[test]
    fn test_custom_separator() {
        let s = CredentialPhraseSanitizer::new(&SensitiveKeyDetector::with_defaults(), &["~>"])
            .unwrap();
        assert_eq!(s.sanitize("token ~> abc", TOKEN), "token ~> [MASKED]");
        assert_eq!(s.separators().last().map(String::as_str), Some("~>"));
    }

    #[test]
    fn test_invalid_separators() {
        let keys = SensitiveKeyDetector::with_defaults();
        assert!(matches!(
            CredentialPhraseSanitizer::new(&keys, &[""]),
            Err(SanitizeError::InvalidSeparatorConfig { .. })
        ));
        assert!(matches!(
            CredentialPhraseSanitizer::new(&keys, &["a b"]),
            Err(SanitizeError::InvalidSeparatorConfig { .. })
        ));
        assert!(matches!(
            CredentialPhraseSanitizer::new(&keys, &["\t"]),
            Err(SanitizeError::InvalidSeparatorConfig { .. })
        ));
    }

    #[test]
    fn test_separator_only_keys_never_match_empty() {
        let alternation = key_alternation(&[
            "___".to_string(),
            "-@-".to_string(),
            "a_b".to_string(),
            "pwd".to_string(),
        ]);
        let keys = Regex::new(&alternation).unwrap();
        assert!(!keys.is_match(""));
        assert!(!keys.is_match("meeting at time: noon, room = 4"));
        assert!(keys.is_match("pwd"));
    }

    #[test]
    fn test_split_trailing() {
        assert_eq!(split_trailing("abc."), ("abc", "."));
        assert_eq!(split_trailing("abc"), ("abc", ""));
        assert_eq!(split_trailing("..."), ("...", ""));
        assert_eq!(split_trailing("[MASKED]"), ("[MASKED]", ""));
    }
}
