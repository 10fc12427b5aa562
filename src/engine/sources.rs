//! Sources - what `actions` and `reducers` functions receive.
//!
//! ```ignore
//! ComponentDescriptor::new(view)
//!     .actions(|sources, _props| {
//!         sources.dom(".add").events("click").map(|_| Action::new("add"))
//!     })
//!     .reducers(|sources, _props| {
//!         sources.actions().of_kind("add").reduce_with(add_reducer())
//!     })
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dom::DomRegistry;
use crate::stream::{Stream, Subject};
use crate::types::{Action, DomEvent, State};

use super::{ActionBus, LifecycleBus, LifecycleEvent};

/// Inputs of a component's dataflow.
pub struct Sources<S> {
    dom: Rc<RefCell<DomRegistry>>,
    lifecycle: Stream<LifecycleEvent<S>>,
    children_actions: Stream<Action>,
    actions: Subject<Action>,
}

impl<S: 'static> Sources<S> {
    /// Select rendered elements of this component.
    pub fn dom(&self, selector: &str) -> DomSource {
        DomSource {
            registry: self.dom.clone(),
            selector: selector.to_string(),
        }
    }

    /// Lifecycle events of this component.
    pub fn component_lifecycle(&self) -> Stream<LifecycleEvent<S>> {
        self.lifecycle.clone()
    }

    /// Merged actions of the current children.
    ///
    /// Follows the child set: when a child mounts or is disposed the merge
    /// is rebuilt and this stream switches to it.
    pub fn children_actions(&self) -> Stream<Action> {
        self.children_actions.clone()
    }

    /// Actions emitted by this component's own `actions` function.
    pub fn actions(&self) -> Stream<Action> {
        self.actions.stream()
    }

    pub(crate) fn action_sink(&self) -> &Subject<Action> {
        &self.actions
    }
}

impl<S> Clone for Sources<S> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            lifecycle: self.lifecycle.clone(),
            children_actions: self.children_actions.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<S> fmt::Debug for Sources<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sources")
            .field("dom", &self.dom.borrow().len())
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}

/// Elements matching one selector.
#[derive(Clone, Debug)]
pub struct DomSource {
    registry: Rc<RefCell<DomRegistry>>,
    selector: String,
}

impl DomSource {
    /// Stream of `event` on the matching elements.
    ///
    /// Stays valid across renders: it follows the elements matched after
    /// each commit.
    pub fn events(&self, event: &str) -> Stream<DomEvent> {
        self.registry.borrow_mut().observable(&self.selector, event)
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// Build the sources of one component.
pub fn generate_sources<S: State>(
    dom: Rc<RefCell<DomRegistry>>,
    child_actions: &ActionBus,
    lifecycle: &LifecycleBus<S>,
) -> Sources<S> {
    Sources {
        dom,
        lifecycle: lifecycle.stream(),
        children_actions: child_actions.switched(),
        actions: Subject::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryElement;

    #[test]
    fn test_dom_source_registers_pair() {
        let registry = Rc::new(RefCell::new(DomRegistry::new()));
        let sources: Sources<i32> =
            generate_sources(registry.clone(), &ActionBus::new(), &LifecycleBus::new());

        let source = sources.dom("#save");
        assert_eq!(source.selector(), "#save");
        let _clicks = source.events("click");
        assert!(registry.borrow().contains("#save", "click"));
    }

    #[test]
    fn test_dom_events_follow_rebind() {
        let registry = Rc::new(RefCell::new(DomRegistry::new()));
        let sources: Sources<i32> =
            generate_sources(registry.clone(), &ActionBus::new(), &LifecycleBus::new());

        let count = Rc::new(RefCell::new(0));
        let count_clone = count.clone();
        let _sub = sources
            .dom("#save")
            .events("click")
            .subscribe(move |_| *count_clone.borrow_mut() += 1);

        let root = Rc::new(MemoryElement::new("form"));
        root.append(MemoryElement::new("button").with_id("save"));
        registry.borrow().rebind(&*root);

        root.dispatch_to("#save", &DomEvent::new("click"));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_children_actions_follow_bus() {
        let bus = ActionBus::new();
        let sources: Sources<i32> = generate_sources(
            Rc::new(RefCell::new(DomRegistry::new())),
            &bus,
            &LifecycleBus::new(),
        );

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = sources
            .children_actions()
            .subscribe(move |a: &Action| seen_clone.borrow_mut().push(a.kind.clone()));

        let child: Subject<Action> = Subject::new();
        bus.publish(child.stream());
        child.next(Action::new("toggle"));

        assert_eq!(*seen.borrow(), vec!["toggle"]);
    }

    #[test]
    fn test_own_actions_come_from_sink() {
        let sources: Sources<i32> = generate_sources(
            Rc::new(RefCell::new(DomRegistry::new())),
            &ActionBus::new(),
            &LifecycleBus::new(),
        );

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = sources
            .actions()
            .subscribe(move |a: &Action| seen_clone.borrow_mut().push(a.kind.clone()));

        sources.action_sink().next(Action::new("submit"));
        assert_eq!(*seen.borrow(), vec!["submit"]);
    }
}
