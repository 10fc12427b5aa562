//! Error types.
//!
//! Both configuration and usage errors represent structural misuse of the
//! composition API. They abort the render pass that detected them.

use thiserror::Error;

use crate::types::Key;

/// Errors raised by the composition layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecycleError {
    /// A (constructor, key) pair was registered twice under one parent.
    #[error(
        "Could not register recycle component '{name}'. Key '{}' is already in use.",
        display_key(.key)
    )]
    DuplicateKey { name: String, key: Option<Key> },

    /// The same constructor was used twice in one render pass without a key.
    #[error("Recycle component '{name}' called multiple times without the key property")]
    MissingKey { name: String },

    /// The same constructor was used twice in one render pass with one key.
    #[error("Recycle component '{name}' called multiple times with the same key property '{key}'")]
    KeyCollision { name: String, key: Key },

    /// The element factory outlived the node it was bound to.
    #[error("element factory used after its component was dropped")]
    Detached,

    /// A node was referenced before its component class was synthesized.
    #[error("recycle component '{name}' has no component class")]
    NotRendered { name: String },
}

impl RecycleError {
    /// True for the two key validation errors.
    pub fn is_key_error(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::KeyCollision { .. })
    }
}

fn display_key(key: &Option<Key>) -> &str {
    key.as_deref().unwrap_or("undefined")
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_component_and_key() {
        let missing = RecycleError::MissingKey { name: "TodoItem".into() };
        assert_eq!(
            missing.to_string(),
            "Recycle component 'TodoItem' called multiple times without the key property"
        );

        let collision = RecycleError::KeyCollision {
            name: "TodoItem".into(),
            key: "a".into(),
        };
        assert!(collision.to_string().ends_with("same key property 'a'"));
        assert!(collision.is_key_error());

        let duplicate = RecycleError::DuplicateKey { name: "Row".into(), key: None };
        assert_eq!(
            duplicate.to_string(),
            "Could not register recycle component 'Row'. Key 'undefined' is already in use."
        );
        assert!(!duplicate.is_key_error());
    }
}
