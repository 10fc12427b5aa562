//! Saved children and key validation.

use std::collections::HashMap;

use crate::config::config;
use crate::error::{RecycleError, Result};
use crate::types::Key;

use super::{ComponentNode, ConstructorId};

/// Per-node cache `constructor → key → child node`.
#[derive(Debug, Default)]
pub struct SavedChildren {
    by_constructor: HashMap<ConstructorId, HashMap<Option<Key>, ComponentNode>>,
}

impl SavedChildren {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previously registered child for `(constructor, key)`.
    pub fn get(&self, constructor: ConstructorId, key: Option<&str>) -> Option<ComponentNode> {
        self.by_constructor
            .get(&constructor)?
            .get(&key.map(str::to_string))
            .cloned()
    }

    /// Register a child under its constructor and key.
    ///
    /// Fails if the pair is already taken.
    pub fn register(&mut self, child: &ComponentNode) -> Result<()> {
        let keys = self.by_constructor.entry(child.constructor_id()).or_default();
        let key = child.key().map(str::to_string);

        if keys.contains_key(&key) {
            return Err(RecycleError::DuplicateKey {
                name: child.name(),
                key,
            });
        }

        keys.insert(key, child.clone());
        Ok(())
    }

    /// Forget `child`. Returns false if it was not registered.
    pub fn remove(&mut self, child: &ComponentNode) -> bool {
        let Some(keys) = self.by_constructor.get_mut(&child.constructor_id()) else {
            return false;
        };
        let key = child.key().map(str::to_string);
        let removed = match keys.get(&key) {
            Some(saved) if saved.ptr_eq(child) => keys.remove(&key).is_some(),
            _ => false,
        };
        if keys.is_empty() {
            self.by_constructor.remove(&child.constructor_id());
        }
        removed
    }

    /// Number of registered children.
    pub fn len(&self) -> usize {
        self.by_constructor.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.by_constructor.clear();
    }
}

/// Reject a saved child met again during its parent's first render pass.
///
/// On the first pass every (constructor, key) pair must be new, so meeting
/// a saved one means two siblings share it. Each child is reported once.
pub fn validate_child(child: &ComponentNode, parent_times_rendered: usize) -> Result<()> {
    if !config().validate_keys || child.error_state() || parent_times_rendered != 1 {
        return Ok(());
    }

    child.set_error_state(true);
    match child.key() {
        None => Err(RecycleError::MissingKey { name: child.name() }),
        Some(key) => Err(RecycleError::KeyCollision {
            name: child.name(),
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{component, ComponentDescriptor};
    use crate::config::{reset_config, set_config, RecycleConfig};
    use crate::element::Element;

    fn row() -> ComponentDescriptor<()> {
        ComponentDescriptor::new(|_, _, _| Ok(Element::text("row"))).display_name("Row")
    }

    fn cell() -> ComponentDescriptor<()> {
        ComponentDescriptor::new(|_, _, _| Ok(Element::text("cell")))
    }

    #[test]
    fn test_register_and_get() {
        let mut saved = SavedChildren::new();
        let a = ComponentNode::new(&component(row), Some("a".into()), None);
        let plain = ComponentNode::new(&component(row), None, None);
        let other = ComponentNode::new(&component(cell), Some("a".into()), None);

        saved.register(&a).unwrap();
        saved.register(&plain).unwrap();
        saved.register(&other).unwrap();

        assert_eq!(saved.len(), 3);
        assert!(saved.get(component(row).id(), Some("a")).unwrap().ptr_eq(&a));
        assert!(saved.get(component(row).id(), None).unwrap().ptr_eq(&plain));
        assert!(saved.get(component(cell).id(), Some("a")).unwrap().ptr_eq(&other));
        assert!(saved.get(component(cell).id(), None).is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut saved = SavedChildren::new();
        saved
            .register(&ComponentNode::new(&component(row), Some("a".into()), None))
            .unwrap();

        let err = saved
            .register(&ComponentNode::new(&component(row), Some("a".into()), None))
            .unwrap_err();
        assert_eq!(
            err,
            RecycleError::DuplicateKey {
                name: "Row".into(),
                key: Some("a".into())
            }
        );
    }

    #[test]
    fn test_remove_only_matching_node() {
        let mut saved = SavedChildren::new();
        let a = ComponentNode::new(&component(row), Some("a".into()), None);
        let impostor = ComponentNode::new(&component(row), Some("a".into()), None);
        saved.register(&a).unwrap();

        assert!(!saved.remove(&impostor));
        assert!(saved.remove(&a));
        assert!(saved.is_empty());
    }

    #[test]
    fn test_validate_reports_once_on_first_pass() {
        reset_config();
        let keyed = ComponentNode::new(&component(row), Some("x".into()), None);
        let unkeyed = ComponentNode::new(&component(row), None, None);

        assert_eq!(
            validate_child(&keyed, 1),
            Err(RecycleError::KeyCollision {
                name: "Row".into(),
                key: "x".into()
            })
        );
        assert_eq!(validate_child(&keyed, 1), Ok(()));
        assert_eq!(
            validate_child(&unkeyed, 1),
            Err(RecycleError::MissingKey { name: "Row".into() })
        );
    }

    #[test]
    fn test_validate_ignores_later_passes_and_disabled_config() {
        reset_config();
        let node = ComponentNode::new(&component(row), None, None);
        assert_eq!(validate_child(&node, 2), Ok(()));
        assert!(!node.error_state());

        set_config(RecycleConfig {
            validate_keys: false,
            ..RecycleConfig::default()
        });
        assert_eq!(validate_child(&node, 1), Ok(()));
        reset_config();
    }
}
