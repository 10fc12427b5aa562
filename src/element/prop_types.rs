//! Prop type declarations.
//!
//! Checked when a component instance is created or receives new props.
//! Mismatches are reported through `tracing` and never abort a render.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::types::Value;

use super::Props;

/// Expected JSON shape of a prop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropType {
    Any,
    String,
    Number,
    Bool,
    Array,
    Object,
}

impl PropType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            PropType::Any => true,
            PropType::String => value.is_string(),
            PropType::Number => value.is_number(),
            PropType::Bool => value.is_boolean(),
            PropType::Array => value.is_array(),
            PropType::Object => value.is_object(),
        }
    }

    fn of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropType::Any => "any",
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Bool => "bool",
            PropType::Array => "array",
            PropType::Object => "object",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PropRule {
    kind: PropType,
    required: bool,
}

/// A failed prop check.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PropViolation {
    #[error("required prop '{name}' was not specified")]
    Missing { name: String },

    #[error("prop '{name}' of type '{found}' supplied, expected '{expected}'")]
    WrongType {
        name: String,
        expected: PropType,
        found: &'static str,
    },
}

/// Declared props of a component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropTypes {
    rules: BTreeMap<String, PropRule>,
}

impl PropTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional(mut self, name: impl Into<String>, kind: PropType) -> Self {
        self.rules.insert(name.into(), PropRule { kind, required: false });
        self
    }

    pub fn required(mut self, name: impl Into<String>, kind: PropType) -> Self {
        self.rules.insert(name.into(), PropRule { kind, required: true });
        self
    }

    /// All violations of `props`, in prop name order.
    ///
    /// A `null` value counts as not specified.
    pub fn violations(&self, props: &Props) -> Vec<PropViolation> {
        self.rules
            .iter()
            .filter_map(|(name, rule)| match props.get(name) {
                None | Some(Value::Null) if rule.required => Some(PropViolation::Missing {
                    name: name.clone(),
                }),
                None | Some(Value::Null) => None,
                Some(value) if !rule.kind.matches(value) => Some(PropViolation::WrongType {
                    name: name.clone(),
                    expected: rule.kind,
                    found: PropType::of(value),
                }),
                Some(_) => None,
            })
            .collect()
    }

    /// Log every violation as a warning. Returns true when `props` pass.
    pub fn check(&self, component: &str, props: &Props) -> bool {
        let violations = self.violations(props);
        for violation in &violations {
            tracing::warn!(component, %violation, "failed prop type");
        }
        violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn todo_types() -> PropTypes {
        PropTypes::new()
            .required("text", PropType::String)
            .optional("completed", PropType::Bool)
    }

    #[test]
    fn test_valid_props_pass() {
        let props = Props::from_json(json!({"text": "Buy milk", "completed": true}));
        assert!(todo_types().violations(&props).is_empty());
        assert!(todo_types().check("TodoItem", &props));
    }

    #[test]
    fn test_reports_missing_and_wrong_type() {
        let props = Props::from_json(json!({"completed": "yes"}));
        let violations = todo_types().violations(&props);

        assert_eq!(
            violations,
            vec![
                PropViolation::WrongType {
                    name: "completed".into(),
                    expected: PropType::Bool,
                    found: "string",
                },
                PropViolation::Missing { name: "text".into() },
            ]
        );
        assert_eq!(
            violations[1].to_string(),
            "required prop 'text' was not specified"
        );
        assert!(!todo_types().check("TodoItem", &props));
    }

    #[test]
    fn test_null_optional_is_ignored() {
        let props = Props::from_json(json!({"text": "x", "completed": null}));
        assert!(todo_types().violations(&props).is_empty());
    }
}
