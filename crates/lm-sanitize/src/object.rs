//! Object-like record traversal.

use crate::mask_token::MaskToken;
use crate::traversal::{Rules, Walk, PRIVATE_FIELDS_SUFFIX, TYPE_TAG_KEY};
use crate::value::ObjectRef;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use tracing::trace;

/// Sanitizes objects into records tagged with their type name.
///
/// Only public fields are visited. An object with no public fields becomes
/// a record carrying just its tag, suffixed with `" (private fields)"`.
#[derive(Debug, Clone)]
pub struct ObjectSanitizer {
    rules: Arc<Rules>,
}

impl ObjectSanitizer {
    pub(crate) fn new(rules: Arc<Rules>) -> Self {
        Self { rules }
    }

    /// Sanitize `object` as a top-level value, with fresh traversal state.
    pub fn sanitize(&self, object: &ObjectRef, token: &MaskToken) -> JsonValue {
        Walk::new(&self.rules, token.as_str()).object(object)
    }
}

impl Walk<'_> {
    pub(crate) fn object(&mut self, object: &ObjectRef) -> JsonValue {
        if let Some(marker) = self.enter(object.id()) {
            return marker;
        }

        let result = match object.try_borrow() {
            Some(object) => {
                let mut record = Map::new();
                let mut fields = object.public_fields().peekable();
                if fields.peek().is_none() {
                    record.insert(
                        TYPE_TAG_KEY.to_string(),
                        JsonValue::String(format!("{}{}", object.type_name, PRIVATE_FIELDS_SUFFIX)),
                    );
                } else {
                    record.insert(
                        TYPE_TAG_KEY.to_string(),
                        JsonValue::String(object.type_name.clone()),
                    );
                    for field in fields {
                        if field.name == TYPE_TAG_KEY {
                            trace!(type_name = %object.type_name, "field shadowing type tag skipped");
                            continue;
                        }
                        let sanitized = self.keyed(&field.name, &field.value);
                        record.insert(field.name.clone(), sanitized);
                    }
                }
                JsonValue::Object(record)
            }
            None => self.masked(),
        };

        self.leave();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SanitizationConfig;
    use crate::service::SanitizingService;
    use crate::value::ArrayRef;
    use serde_json::json;

    fn service() -> SanitizingService {
        SanitizingService::new(SanitizationConfig::default()).unwrap()
    }

    fn sanitize(object: &ObjectRef) -> JsonValue {
        let service = service();
        service
            .object_sanitizer()
            .sanitize(object, service.default_mask_token())
    }

    #[test]
    fn test_public_fields_in_order() {
        let user = ObjectRef::new("User");
        user.set_field("name", "alice");
        user.set_field("senha", "segredo123");
        user.set_field("age", 30);
        user.set_private_field("hash", "abc");

        let result = sanitize(&user);
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["__type", "name", "senha", "age"]);
        assert_eq!(
            result,
            json!({"__type": "User", "name": "alice", "senha": "[MASKED]", "age": 30})
        );
    }

    #[test]
    fn test_private_only_object() {
        let vault = ObjectRef::new("Vault");
        vault.set_private_field("secret", "x");
        assert_eq!(sanitize(&vault), json!({"__type": "Vault (private fields)"}));

        let empty = ObjectRef::new("Empty");
        assert_eq!(sanitize(&empty), json!({"__type": "Empty (private fields)"}));
    }

    #[test]
    fn test_object_holding_container() {
        let tags = ArrayRef::list();
        tags.push("a@example.com");
        let event = ObjectRef::new("Event");
        event.set_field("tags", tags);

        assert_eq!(
            sanitize(&event),
            json!({"__type": "Event", "tags": ["[MASKED]"]})
        );
    }

    #[test]
    fn test_self_reference() {
        let node = ObjectRef::new("Node");
        node.set_field("label", "root");
        node.set_field("next", node.clone());

        assert_eq!(
            sanitize(&node),
            json!({
                "__type": "Node",
                "label": "root",
                "next": {"circular_reference_detected": true}
            })
        );
    }

    #[test]
    fn test_field_named_like_tag_does_not_override_it() {
        let odd = ObjectRef::new("Odd");
        odd.set_field("__type", "spoofed");
        odd.set_field("ok", true);
        assert_eq!(sanitize(&odd), json!({"__type": "Odd", "ok": true}));
    }

    #[test]
    fn test_mutably_borrowed_object_is_masked() {
        let obj = ObjectRef::new("Busy");
        obj.set_field("k", "v");
        let _guard = obj.borrow_mut_for_test();
        assert_eq!(sanitize(&obj), json!("[MASKED]"));
    }
}
