//! Free-text sanitization: credential phrases, then value patterns.

use crate::pattern_sanitizer::SensitivePatternSanitizer;
use crate::phrase::CredentialPhraseSanitizer;
use std::borrow::Cow;

/// Masks sensitive fragments of a single string.
#[derive(Debug, Clone)]
pub struct StringSanitizer {
    phrases: CredentialPhraseSanitizer,
    patterns: SensitivePatternSanitizer,
}

impl StringSanitizer {
    pub fn new(phrases: CredentialPhraseSanitizer, patterns: SensitivePatternSanitizer) -> Self {
        Self { phrases, patterns }
    }

    pub fn phrase_sanitizer(&self) -> &CredentialPhraseSanitizer {
        &self.phrases
    }

    /// Phrase masking runs first so the phrase matcher sees raw values
    /// rather than tokens left by pattern masking.
    pub fn sanitize<'a>(&self, value: &'a str, token: &str) -> Cow<'a, str> {
        match self.phrases.sanitize(value, token) {
            Cow::Borrowed(unchanged) => self.patterns.sanitize(unchanged, token),
            Cow::Owned(phrased) => {
                Cow::Owned(self.patterns.sanitize(&phrased, token).into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SensitiveKeyDetector;
    use crate::patterns::SensitivePatternDetector;

    fn sanitizer() -> StringSanitizer {
        let keys = SensitiveKeyDetector::with_defaults();
        let patterns = SensitivePatternDetector::with_defaults().unwrap();
        StringSanitizer::new(
            CredentialPhraseSanitizer::new::<&str>(&keys, &[]).unwrap(),
            SensitivePatternSanitizer::new(&patterns).unwrap(),
        )
    }

    #[test]
    fn test_phrase_and_pattern_in_one_string() {
        let result = sanitizer().sanitize(
            "password: hunter2 sent to alice@example.com",
            "[MASKED]",
        );
        assert_eq!(result, "password: [MASKED] sent to [MASKED]");
    }

    #[test]
    fn test_pattern_only() {
        assert_eq!(
            sanitizer().sanitize("User CPF: 123.456.789-09", "[MASKED]"),
            "User CPF: [MASKED]"
        );
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        let input = "  job finished in 42ms  ";
        let result = sanitizer().sanitize(input, "[MASKED]");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }
}
