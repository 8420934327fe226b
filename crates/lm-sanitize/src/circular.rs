//! Cycle detection for one traversal.
//!
//! Nodes are tracked by allocation identity, never by content: two distinct
//! containers holding equal data are not a cycle.

use crate::value::NodeId;
use serde_json::{json, Value as JsonValue};
use std::collections::HashSet;

/// Key of the sentinel record substituted for a repeated node.
pub const CIRCULAR_MARKER_KEY: &str = "circular_reference_detected";

/// Tracks which containers and objects one traversal has already entered.
#[derive(Debug, Default)]
pub struct CircularReferenceDetector {
    seen: HashSet<NodeId>,
}

impl CircularReferenceDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every tracked node. Called once per top-level traversal.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Whether `node` was already entered in this traversal.
    pub fn is_circular(&self, node: NodeId) -> bool {
        self.seen.contains(&node)
    }

    pub fn mark_seen(&mut self, node: NodeId) {
        self.seen.insert(node);
    }

    /// Sentinel substituted where a cycle was cut.
    pub fn marker() -> JsonValue {
        json!({ CIRCULAR_MARKER_KEY: true })
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
