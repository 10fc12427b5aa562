//! Core types - Actions, DOM events, keys, state.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use serde_json::Value;

// =============================================================================
// Keys and State
// =============================================================================

/// Key distinguishing siblings created from the same constructor.
pub type Key = String;

/// Bound for component state.
///
/// State is cloned into lifecycle events and compared by
/// `should_component_update` implementations.
pub trait State: Clone + PartialEq + fmt::Debug + 'static {}

impl<T: Clone + PartialEq + fmt::Debug + 'static> State for T {}

// =============================================================================
// Action
// =============================================================================

/// A value describing user or system intent.
///
/// Produced by `actions` functions (and, transitively, by descendants) and
/// consumed by reducers. Serializes as `{"type": ..., "payload": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Action without payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    /// Action carrying a JSON payload.
    pub fn with_payload(kind: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// Check the action type.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

// =============================================================================
// DOM Event
// =============================================================================

/// Event delivered by a host DOM element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    /// Event name (e.g., "click", "input")
    pub event_type: String,
    /// Id of the element the event fired on, if it has one
    pub target: Option<String>,
    /// Event specific data (input value, coordinates, ...)
    #[serde(default)]
    pub detail: Value,
}

impl DomEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target: None,
            detail: Value::Null,
        }
    }

    pub fn with_detail(event_type: impl Into<String>, detail: impl Into<Value>) -> Self {
        Self {
            event_type: event_type.into(),
            target: None,
            detail: detail.into(),
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}
