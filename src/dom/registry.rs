//! DOM Observable Registry.
//!
//! Every `(selector, event)` pair gets a subject of streams. Subscribers
//! receive `subject.switch_latest().share()`, a stable handle that follows
//! whichever live DOM stream was pushed last. [`DomRegistry::rebind`] pushes
//! a fresh stream for every pair after each render commit.

use std::collections::HashMap;

use crate::stream::{Stream, Subject};
use crate::types::DomEvent;

use super::DomNode;

/// Per-component map of selector → event → switchable stream.
#[derive(Debug, Default)]
pub struct DomRegistry {
    selectors: HashMap<String, HashMap<String, Subject<Stream<DomEvent>>>>,
}

impl DomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream of `event` on elements matching `selector`.
    ///
    /// Registers the pair on first use. Repeated calls share the same
    /// underlying subject.
    pub fn observable(&mut self, selector: &str, event: &str) -> Stream<DomEvent> {
        self.selectors
            .entry(selector.to_string())
            .or_default()
            .entry(event.to_string())
            .or_default()
            .stream()
            .switch_latest()
            .share()
    }

    /// Snapshot of all registered pairs.
    ///
    /// Rebinding goes through a snapshot so listeners can be attached
    /// without holding a borrow on the registry.
    pub fn bindings(&self) -> Vec<(String, String, Subject<Stream<DomEvent>>)> {
        self.selectors
            .iter()
            .flat_map(|(selector, events)| {
                events
                    .iter()
                    .map(move |(event, subject)| (selector.clone(), event.clone(), subject.clone()))
            })
            .collect()
    }

    /// Point every registered pair at the matching elements of `root`.
    pub fn rebind(&self, root: &dyn DomNode) {
        rebind_all(self.bindings(), root);
    }

    pub fn contains(&self, selector: &str, event: &str) -> bool {
        self.selectors
            .get(selector)
            .is_some_and(|events| events.contains_key(event))
    }

    /// Number of registered `(selector, event)` pairs.
    pub fn len(&self) -> usize {
        self.selectors.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach every live DOM stream and forget all pairs.
    pub fn clear(&mut self) -> Vec<Subject<Stream<DomEvent>>> {
        self.selectors
            .drain()
            .flat_map(|(_, events)| events.into_values())
            .collect()
    }
}

/// Push the live DOM stream for each binding.
pub(crate) fn rebind_all(
    bindings: Vec<(String, String, Subject<Stream<DomEvent>>)>,
    root: &dyn DomNode,
) {
    for (selector, event, subject) in bindings {
        let elements = root.query_selector_all(&selector);
        tracing::trace!(%selector, %event, matched = elements.len(), "rebinding dom observable");
        subject.next(Stream::from_event(elements, &event));
    }
}
