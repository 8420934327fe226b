//! Per-call traversal state and leaf handling shared by the container and
//! object walkers.

use crate::circular::CircularReferenceDetector;
use crate::keys::SensitiveKeyDetector;
use crate::string_sanitizer::StringSanitizer;
use crate::value::{NodeId, Value};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, trace};

/// Key of the record substituted where traversal stopped at the depth limit.
pub const HALT_MARKER_KEY: &str = "sanitization_halted";

/// Reason carried by the halt marker.
pub const HALT_REASON_MAX_DEPTH: &str = "max_depth_reached";

/// Key tagging an object record with its type name.
pub const TYPE_TAG_KEY: &str = "__type";

/// Suffix appended to the type tag of an object with no public fields.
pub const PRIVATE_FIELDS_SUFFIX: &str = " (private fields)";

/// The halt marker record.
pub fn halt_marker() -> JsonValue {
    json!({ HALT_MARKER_KEY: HALT_REASON_MAX_DEPTH })
}

/// Immutable rules consulted at every traversal step.
#[derive(Debug)]
pub(crate) struct Rules {
    pub(crate) keys: SensitiveKeyDetector,
    pub(crate) strings: StringSanitizer,
    pub(crate) max_depth: usize,
}

/// Mutable state owned by exactly one top-level call.
#[derive(Debug, Default)]
pub(crate) struct TraversalState {
    pub(crate) depth: usize,
    pub(crate) circular: CircularReferenceDetector,
}

/// One top-level traversal: the shared rules, the token, and fresh state.
pub(crate) struct Walk<'a> {
    pub(crate) rules: &'a Rules,
    pub(crate) token: &'a str,
    pub(crate) state: TraversalState,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(rules: &'a Rules, token: &'a str) -> Self {
        let mut state = TraversalState::default();
        state.circular.reset();
        Self {
            rules,
            token,
            state,
        }
    }

    /// Sanitize any value, dispatching on its shape.
    pub(crate) fn value(&mut self, value: &Value) -> JsonValue {
        match value {
            Value::String(s) => JsonValue::String(self.string(s)),
            Value::Array(array) => self.array(array),
            Value::Object(object) => self.object(object),
            scalar => scalar_json(scalar),
        }
    }

    /// Sanitize the value stored under `key`. A sensitive key masks the
    /// whole value, whatever its shape.
    pub(crate) fn keyed(&mut self, key: &str, value: &Value) -> JsonValue {
        if self.rules.keys.is_sensitive_key(key) {
            return self.masked();
        }
        self.value(value)
    }

    pub(crate) fn string(&self, value: &str) -> String {
        self.rules.strings.sanitize(value, self.token).into_owned()
    }

    pub(crate) fn masked(&self) -> JsonValue {
        JsonValue::String(self.token.to_string())
    }

    /// Gate entry into a container or object.
    ///
    /// Returns the marker to substitute when the node was already entered in
    /// this traversal or lies past the depth limit. Otherwise records the
    /// node and descends one level; pair with [`Walk::leave`].
    pub(crate) fn enter(&mut self, node: NodeId) -> Option<JsonValue> {
        if self.state.circular.is_circular(node) {
            trace!(depth = self.state.depth, "circular reference replaced with marker");
            return Some(CircularReferenceDetector::marker());
        }
        if self.state.depth > self.rules.max_depth {
            debug!(
                depth = self.state.depth,
                max_depth = self.rules.max_depth,
                "traversal halted at max depth"
            );
            return Some(halt_marker());
        }
        self.state.circular.mark_seen(node);
        self.state.depth += 1;
        None
    }

    pub(crate) fn leave(&mut self) {
        self.state.depth = self.state.depth.saturating_sub(1);
    }
}

/// Render a non-string, non-container value unchanged.
pub(crate) fn scalar_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::UInt(u) => JsonValue::from(*u),
        Value::Float(f) => float_json(*f),
        Value::String(s) => JsonValue::String(s.clone()),
        // Containers never reach here through `Walk::value`.
        Value::Array(_) | Value::Object(_) => JsonValue::Null,
    }
}

fn float_json(value: f64) -> JsonValue {
    match serde_json::Number::from_f64(value) {
        Some(number) => JsonValue::Number(number),
        None if value.is_nan() => JsonValue::String("NaN".to_string()),
        None if value > 0.0 => JsonValue::String("inf".to_string()),
        None => JsonValue::String("-inf".to_string()),
    }
}
