//! Unicode canonicalization for stable comparisons.
//!
//! Text is brought to NFKC so that compatibility variants (full-width digits,
//! ligatures, superscripts) compare and match like their plain forms.

use std::borrow::Cow;
use unicode_normalization::{is_nfkc_quick, IsNormalized, UnicodeNormalization};

/// Converts text to NFKC.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeNormalizer;

impl UnicodeNormalizer {
    /// Normalize `input`, borrowing it when it is already in canonical form.
    pub fn normalize(input: &str) -> Cow<'_, str> {
        match is_nfkc_quick(input.chars()) {
            IsNormalized::Yes => Cow::Borrowed(input),
            IsNormalized::No | IsNormalized::Maybe => {
                let normalized: String = input.nfkc().collect();
                if normalized == input {
                    Cow::Borrowed(input)
                } else {
                    Cow::Owned(normalized)
                }
            }
        }
    }
}
