//! DOM Module - Host DOM boundary and the DOM observable registry.
//!
//! The host rendering library owns the real element tree. This crate only
//! needs two capabilities from it:
//!
//! - [`DomNode`] - the rendered subtree of a component, queryable by selector
//! - [`DomElement`] - an element that accepts event listeners
//!
//! [`DomRegistry`] maps `(selector, event)` pairs to switchable streams that
//! are rebound against the latest subtree after every commit.

mod registry;

use std::rc::Rc;

use crate::stream::{Stream, Subscription};
use crate::types::DomEvent;

pub use registry::DomRegistry;
pub(crate) use registry::rebind_all;

/// Identifier returned by [`DomElement::add_event_listener`].
pub type ListenerId = usize;

/// Callback attached to a DOM element.
pub type EventListener = Rc<dyn Fn(&DomEvent)>;

/// Rendered subtree of a component.
pub trait DomNode {
    /// All descendants matching `selector` (the node itself excluded).
    fn query_selector_all(&self, selector: &str) -> Vec<Rc<dyn DomElement>>;
}

/// An element that can deliver events.
pub trait DomElement {
    fn add_event_listener(&self, event: &str, listener: EventListener) -> ListenerId;
    fn remove_event_listener(&self, event: &str, id: ListenerId);
}

impl Stream<DomEvent> {
    /// Stream of `event` fired on any of `elements`.
    ///
    /// Listeners are attached on subscribe and removed on unsubscribe.
    pub fn from_event(elements: Vec<Rc<dyn DomElement>>, event: &str) -> Self {
        let elements = Rc::new(elements);
        let event = event.to_string();
        Stream::new(move |observer| {
            let attached: Vec<(Rc<dyn DomElement>, ListenerId)> = elements
                .iter()
                .map(|element| {
                    let observer = observer.clone();
                    let listener: EventListener = Rc::new(move |e: &DomEvent| observer(e));
                    let id = element.add_event_listener(&event, listener);
                    (element.clone(), id)
                })
                .collect();

            let event = event.clone();
            Subscription::new(move || {
                for (element, id) in attached {
                    element.remove_event_listener(&event, id);
                }
            })
        })
    }
}
