//! Props - key, JSON values and children of an element.

use serde_json::Map;

use crate::types::{Key, Value};

use super::Element;

/// Properties passed to an element.
///
/// `key` is kept apart from the values: it identifies the element among
/// siblings and is never visible to the component as a value.
#[derive(Clone, Debug, Default)]
pub struct Props {
    key: Option<Key>,
    values: Map<String, Value>,
    children: Vec<Element>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Props from a JSON object. Other values give empty props.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(values) => Self::from(values),
            _ => Self::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn set_children(&mut self, children: Vec<Element>) {
        self.children = children;
    }

    /// Fill in values missing from these props.
    pub fn merge_defaults(&mut self, defaults: &Props) {
        for (name, value) in &defaults.values {
            if !self.values.contains_key(name) {
                self.values.insert(name.clone(), value.clone());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.values.is_empty() && self.children.is_empty()
    }
}

impl From<Map<String, Value>> for Props {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            key: None,
            values,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders_and_accessors() {
        let props = Props::new()
            .with_key("row-1")
            .set("label", "Buy milk")
            .set("done", false)
            .set("priority", 2)
            .child("text");

        assert_eq!(props.key(), Some("row-1"));
        assert_eq!(props.get_str("label"), Some("Buy milk"));
        assert_eq!(props.get_bool("done"), Some(false));
        assert_eq!(props.get_i64("priority"), Some(2));
        assert_eq!(props.children().len(), 1);
        assert!(props.get("missing").is_none());
    }

    #[test]
    fn test_merge_defaults_keeps_given_values() {
        let mut props = Props::from_json(json!({"filter": "done"}));
        let defaults = Props::from_json(json!({"filter": "all", "limit": 10}));

        props.merge_defaults(&defaults);

        assert_eq!(props.get_str("filter"), Some("done"));
        assert_eq!(props.get_i64("limit"), Some(10));
    }

    #[test]
    fn test_from_json_ignores_non_objects() {
        assert!(Props::from_json(json!([1, 2])).is_empty());
        assert!(!Props::from_json(json!({"a": 1})).is_empty());
    }
}
