//! Container traversal.

use crate::mask_token::MaskToken;
use crate::traversal::{Rules, Walk};
use crate::value::{ArrayRef, Container};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// Sanitizes positional and keyed containers.
///
/// Keyed entries under a sensitive key are masked whole; every other entry
/// is sanitized according to its shape. Nested objects are handed to the
/// object walker and back, under one shared traversal state.
#[derive(Debug, Clone)]
pub struct ArraySanitizer {
    rules: Arc<Rules>,
}

impl ArraySanitizer {
    pub(crate) fn new(rules: Arc<Rules>) -> Self {
        Self { rules }
    }

    /// Sanitize `array` as a top-level value, with fresh traversal state.
    pub fn sanitize(&self, array: &ArrayRef, token: &MaskToken) -> JsonValue {
        Walk::new(&self.rules, token.as_str()).array(array)
    }
}

impl Walk<'_> {
    pub(crate) fn array(&mut self, array: &ArrayRef) -> JsonValue {
        if let Some(marker) = self.enter(array.id()) {
            return marker;
        }

        let result = match array.try_borrow() {
            Some(container) => match &*container {
                Container::List(items) => {
                    JsonValue::Array(items.iter().map(|item| self.value(item)).collect())
                }
                Container::Map(entries) => {
                    let mut record = Map::with_capacity(entries.len());
                    for (key, value) in entries {
                        let sanitized = self.keyed(key, value);
                        record.insert(key.clone(), sanitized);
                    }
                    JsonValue::Object(record)
                }
            },
            // Mutably borrowed elsewhere: contents unknown, mask it all.
            None => self.masked(),
        };

        self.leave();
        result
    }
}
