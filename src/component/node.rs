//! Component Node - one addressable unit of the component tree.
//!
//! A node is identified by the constructor that produced it and its key.
//! It owns its children and the per-node registries; the parent link is
//! weak.
//!
//! ```text
//! ComponentNode
//! ├── class            (synthesized from the descriptor, given to the host)
//! ├── child_actions    (ActionBus: merge of the children's action streams)
//! ├── dom              (DomRegistry: selector × event → switchable stream)
//! ├── actions          (own action stream, once mounted)
//! ├── children         (owned, in creation order)
//! └── saved_children   (constructor → key → child)
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{derived, signal, Derived, Signal};

use crate::dom::{DomNode, DomRegistry};
use crate::element::{ElementFactory, RenderAdapter};
use crate::engine::{ActionBus, LifecycleBus};
use crate::error::{RecycleError, Result};
use crate::host::{ComponentClass, DynHostClass};
use crate::stream::{Stream, Subscription, SubscriptionSet};
use crate::types::{Action, Key, State};

use super::class::RecycleClass;
use super::{ComponentDescriptor, Constructor, ConstructorId, SavedChildren};

/// Shared handle to a component node.
#[derive(Clone)]
pub struct ComponentNode {
    inner: Rc<NodeInner>,
}

/// Non-owning handle, used by everything a node hands out.
#[derive(Clone)]
pub(crate) struct WeakNode(Weak<NodeInner>);

impl WeakNode {
    pub(crate) fn upgrade(&self) -> Option<ComponentNode> {
        self.0.upgrade().map(|inner| ComponentNode { inner })
    }
}

/// Identifies one instance of a node's class between mount and unmount.
pub(crate) type InstanceId = usize;

struct NodeInner {
    constructor: Constructor,
    key: Option<Key>,
    parent: Weak<NodeInner>,
    name: RefCell<String>,
    class: RefCell<Option<Rc<dyn ComponentClass>>>,
    /// `Signal<S>` holding the latest state
    state: RefCell<Option<Rc<dyn Any>>>,
    child_actions: ActionBus,
    dom: Rc<RefCell<DomRegistry>>,
    actions: RefCell<Option<Stream<Action>>>,
    children: RefCell<Vec<ComponentNode>>,
    saved_children: RefCell<SavedChildren>,
    adapters: RefCell<Vec<Rc<RenderAdapter>>>,
    /// Subscriptions owned by each mounted instance of the class
    subscriptions: RefCell<HashMap<InstanceId, SubscriptionSet>>,
    live_instances: Cell<usize>,
    next_instance: Cell<InstanceId>,
    times_rendered: Cell<usize>,
    error_state: Cell<bool>,
    disposed: Cell<bool>,
}

impl ComponentNode {
    /// Create a node, attach it to `parent` and run its constructor.
    ///
    /// The node joins the parent's child list here. Registering it in the
    /// parent's saved children is up to the caller.
    pub fn new(constructor: &Constructor, key: Option<Key>, parent: Option<&ComponentNode>) -> Self {
        let node = ComponentNode {
            inner: Rc::new(NodeInner {
                constructor: constructor.clone(),
                key,
                parent: parent.map(|p| Rc::downgrade(&p.inner)).unwrap_or_default(),
                name: RefCell::new(constructor.name().to_string()),
                class: RefCell::new(None),
                state: RefCell::new(None),
                child_actions: ActionBus::new(),
                dom: Rc::new(RefCell::new(DomRegistry::new())),
                actions: RefCell::new(None),
                children: RefCell::new(Vec::new()),
                saved_children: RefCell::new(SavedChildren::new()),
                adapters: RefCell::new(Vec::new()),
                subscriptions: RefCell::new(HashMap::new()),
                live_instances: Cell::new(0),
                next_instance: Cell::new(0),
                times_rendered: Cell::new(0),
                error_state: Cell::new(false),
                disposed: Cell::new(false),
            }),
        };

        if let Some(parent) = parent {
            parent.inner.children.borrow_mut().push(node.clone());
        }

        constructor.build(&node);
        tracing::debug!(
            component = %node.name(),
            key = ?node.key(),
            parent = ?parent.map(ComponentNode::name),
            "created component node"
        );
        node
    }

    /// Node without a parent.
    pub fn root(constructor: &Constructor) -> Self {
        Self::new(constructor, None, None)
    }

    /// Synthesize this node's component class from `descriptor`.
    pub fn render<S: State>(&self, descriptor: ComponentDescriptor<S>) {
        let name = descriptor
            .display_name
            .clone()
            .unwrap_or_else(|| self.inner.constructor.name().to_string());
        let latest: Signal<S> = signal(descriptor.initial_state.clone());

        let class = RecycleClass::new(
            name.clone(),
            descriptor,
            self.downgrade(),
            LifecycleBus::new(),
            latest.clone(),
        );

        *self.inner.name.borrow_mut() = name;
        *self.inner.state.borrow_mut() = Some(Rc::new(latest));
        *self.inner.class.borrow_mut() = Some(Rc::new(class));
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Display name of the synthesized class.
    pub fn name(&self) -> String {
        self.inner.name.borrow().clone()
    }

    pub fn key(&self) -> Option<&str> {
        self.inner.key.as_deref()
    }

    pub fn constructor(&self) -> &Constructor {
        &self.inner.constructor
    }

    pub fn constructor_id(&self) -> ConstructorId {
        self.inner.constructor.id()
    }

    pub fn parent(&self) -> Option<ComponentNode> {
        self.inner.parent.upgrade().map(|inner| ComponentNode { inner })
    }

    /// Direct children, in creation order.
    pub fn children(&self) -> Vec<ComponentNode> {
        self.inner.children.borrow().clone()
    }

    /// The class handed to the host.
    pub fn class(&self) -> Result<Rc<dyn ComponentClass>> {
        self.inner
            .class
            .borrow()
            .clone()
            .ok_or_else(|| RecycleError::NotRendered { name: self.name() })
    }

    /// Own action stream. `None` until mounted, or without `actions`.
    pub fn actions(&self) -> Option<Stream<Action>> {
        self.inner.actions.borrow().clone()
    }

    /// Latest state, if this node's state type is `S`.
    pub fn state<S: State>(&self) -> Option<S> {
        self.state_signal::<S>().map(|latest| latest.get())
    }

    /// The signal holding the latest state.
    pub fn state_signal<S: State>(&self) -> Option<Signal<S>> {
        let state = self.inner.state.borrow();
        state.as_ref()?.downcast_ref::<Signal<S>>().cloned()
    }

    /// Value computed from the latest state, recomputed after it changes.
    ///
    /// ```ignore
    /// let total = node.derive_state(|todos: &Todos| todos.items.len()).unwrap();
    /// assert_eq!(total.get(), 3);
    /// ```
    pub fn derive_state<S, T, F>(&self, f: F) -> Option<Derived<T>>
    where
        S: State,
        T: Clone + PartialEq + 'static,
        F: Fn(&S) -> T + 'static,
    {
        let latest = self.state_signal::<S>()?;
        Some(derived(move || f(&latest.get())))
    }

    pub fn times_rendered(&self) -> usize {
        self.inner.times_rendered.get()
    }

    pub fn error_state(&self) -> bool {
        self.inner.error_state.get()
    }

    pub fn set_error_state(&self, error_state: bool) {
        self.inner.error_state.set(error_state);
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn child_actions(&self) -> &ActionBus {
        &self.inner.child_actions
    }

    pub fn dom_registry(&self) -> Rc<RefCell<DomRegistry>> {
        self.inner.dom.clone()
    }

    /// Saved child for `(constructor, key)`.
    pub fn saved_child(&self, constructor: ConstructorId, key: Option<&str>) -> Option<ComponentNode> {
        self.inner.saved_children.borrow().get(constructor, key)
    }

    pub fn saved_children_len(&self) -> usize {
        self.inner.saved_children.borrow().len()
    }

    /// Factory for this node's `view`.
    pub fn element_factory(&self) -> ElementFactory {
        ElementFactory::new(self.downgrade())
    }

    /// Same node.
    pub fn ptr_eq(&self, other: &ComponentNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Internal mutation
    // =========================================================================

    pub(crate) fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.inner))
    }

    pub(crate) fn register_child(&self, child: &ComponentNode) -> Result<()> {
        self.inner.saved_children.borrow_mut().register(child)?;
        tracing::debug!(
            parent = %self.name(),
            child = %child.name(),
            key = ?child.key(),
            "registered child component"
        );
        Ok(())
    }

    pub(crate) fn set_actions(&self, actions: Stream<Action>) {
        *self.inner.actions.borrow_mut() = Some(actions);
    }

    /// Keep a subscription until `instance` unmounts.
    pub(crate) fn track(&self, instance: InstanceId, subscription: Subscription) {
        if self.is_disposed() {
            subscription.unsubscribe();
            return;
        }
        self.inner
            .subscriptions
            .borrow_mut()
            .entry(instance)
            .or_default()
            .add(subscription);
    }

    /// Number of instances of this node's class currently alive.
    ///
    /// A keyed child that moves in the host tree is briefly held by two
    /// instances: the new one is created before the old one unmounts.
    pub fn live_instances(&self) -> usize {
        self.inner.live_instances.get()
    }

    pub(crate) fn attach_instance(&self) -> InstanceId {
        let id = self.inner.next_instance.get();
        self.inner.next_instance.set(id + 1);
        self.inner.live_instances.set(self.inner.live_instances.get() + 1);
        id
    }

    /// Release what `instance` subscribed. Disposes the node once no
    /// instance is left.
    pub(crate) fn detach_instance(&self, instance: InstanceId) {
        let owned = self.inner.subscriptions.borrow_mut().remove(&instance);
        if let Some(mut owned) = owned {
            for subscription in owned.take_all() {
                subscription.unsubscribe();
            }
        }

        let live = self.inner.live_instances.get().saturating_sub(1);
        self.inner.live_instances.set(live);
        tracing::trace!(component = %self.name(), instance, live, "instance unmounted");
        if live == 0 {
            self.dispose();
        }
    }

    /// Count a render pass. Returns the new count.
    pub(crate) fn begin_render(&self) -> usize {
        let count = self.inner.times_rendered.get() + 1;
        self.inner.times_rendered.set(count);
        count
    }

    /// Point every DOM registration at the elements of `root`.
    pub(crate) fn rebind_dom(&self, root: &dyn DomNode) {
        // Snapshot first: rebinding subscribes listeners that may re-enter
        let bindings = self.inner.dom.borrow().bindings();
        crate::dom::rebind_all(bindings, root);
    }

    /// One adapter per distinct host class value, created on first use.
    pub(crate) fn adapter_for(&self, class: Rc<dyn DynHostClass>) -> Rc<RenderAdapter> {
        let mut adapters = self.inner.adapters.borrow_mut();
        if let Some(adapter) = adapters.iter().find(|a| a.class().eq_class(&*class)) {
            return adapter.clone();
        }
        let adapter = Rc::new(RenderAdapter::new(class, self.element_factory()));
        adapters.push(adapter.clone());
        adapter
    }

    // =========================================================================
    // Child actions
    // =========================================================================

    /// Recompute the merged action stream of the children.
    ///
    /// The parent recomputes first, all the way to the root. Children
    /// without an action stream are skipped. Nothing is published when
    /// there are no children.
    pub fn update_child_actions(&self) {
        if let Some(parent) = self.parent() {
            parent.update_child_actions();
        }

        let children = self.children();
        if children.is_empty() {
            return;
        }

        let streams: Vec<Stream<Action>> = children.iter().filter_map(ComponentNode::actions).collect();
        tracing::trace!(
            component = %self.name(),
            children = children.len(),
            streams = streams.len(),
            "publishing children actions"
        );
        self.inner.child_actions.publish(Stream::merge(streams));
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Release everything this node holds and detach it from its parent.
    ///
    /// Unsubscribes the action and state pipelines, stops DOM listeners,
    /// disposes the children and removes the node from the parent's
    /// registries. Calling it again does nothing.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        tracing::debug!(component = %self.name(), key = ?self.key(), "disposing component node");

        self.release();

        if let Some(parent) = self.parent() {
            parent.detach_child(self);
        }
    }

    fn release(&self) {
        let owned = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        for (_, mut set) in owned {
            for subscription in set.take_all() {
                subscription.unsubscribe();
            }
        }

        // Switch every DOM stream to nothing so stale listeners come off
        let subjects = self.inner.dom.borrow_mut().clear();
        for subject in subjects {
            subject.next(Stream::empty());
        }

        self.inner.actions.borrow_mut().take();
        self.inner.adapters.borrow_mut().clear();

        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        self.inner.saved_children.borrow_mut().clear();
        for child in children {
            if !child.inner.disposed.replace(true) {
                child.release();
            }
        }
    }

    fn detach_child(&self, child: &ComponentNode) {
        self.inner.children.borrow_mut().retain(|c| !c.ptr_eq(child));
        self.inner.saved_children.borrow_mut().remove(child);

        if self.is_disposed() {
            return;
        }
        if self.inner.children.borrow().is_empty() {
            self.inner.child_actions.publish(Stream::empty());
        } else {
            self.update_child_actions();
        }
    }
}

impl fmt::Debug for ComponentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentNode")
            .field("name", &self.name())
            .field("key", &self.key())
            .field("children", &self.inner.children.borrow().len())
            .field("times_rendered", &self.times_rendered())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::component;
    use crate::element::Element;
    use crate::stream::Subject;

    fn leaf() -> ComponentDescriptor<()> {
        ComponentDescriptor::new(|_, _, _| Ok(Element::text("leaf")))
    }

    fn branch() -> ComponentDescriptor<u32> {
        ComponentDescriptor::with_state(7, |_, _, _| Ok(Element::text("branch"))).display_name("Branch")
    }

    fn child_of(parent: &ComponentNode, key: &str) -> ComponentNode {
        let child = ComponentNode::new(&component(leaf), Some(key.into()), Some(parent));
        parent.register_child(&child).unwrap();
        child
    }

    /// Count streams published on a bus.
    fn publications(bus: &ActionBus) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let sub = bus.streams().subscribe(move |_| count_clone.set(count_clone.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_new_node_joins_parent() {
        let root = ComponentNode::root(&component(branch));
        let child = child_of(&root, "a");

        assert_eq!(root.name(), "Branch");
        assert_eq!(child.name(), "leaf");
        assert!(child.parent().unwrap().ptr_eq(&root));
        assert_eq!(root.children().len(), 1);
        assert!(root.saved_child(component(leaf).id(), Some("a")).is_some());
        assert!(root.class().is_ok());
    }

    #[test]
    fn test_state_is_typed() {
        let root = ComponentNode::root(&component(branch));
        assert_eq!(root.state::<u32>(), Some(7));
        assert_eq!(root.state::<String>(), None);
    }

    #[test]
    fn test_derived_state_follows_signal() {
        let root = ComponentNode::root(&component(branch));
        let doubled = root.derive_state(|s: &u32| s * 2).unwrap();
        assert_eq!(doubled.get(), 14);

        root.state_signal::<u32>().unwrap().set(10);
        assert_eq!(doubled.get(), 20);
        assert!(root.derive_state(|s: &String| s.len()).is_none());
    }

    #[test]
    fn test_update_child_actions_reaches_grandparent() {
        let grandparent = ComponentNode::root(&component(branch));
        let parent = child_of(&grandparent, "p");
        let child = child_of(&parent, "c");

        let (grandparent_count, _g) = publications(grandparent.child_actions());
        let (parent_count, _p) = publications(parent.child_actions());
        let (child_count, _c) = publications(child.child_actions());

        child.update_child_actions();

        assert_eq!(grandparent_count.get(), 1);
        assert_eq!(parent_count.get(), 1);
        // No children, nothing published
        assert_eq!(child_count.get(), 0);
    }

    #[test]
    fn test_children_actions_merge_skips_unmounted() {
        let parent = ComponentNode::root(&component(branch));
        let mounted = child_of(&parent, "x");
        let _unmounted = child_of(&parent, "y");

        let own: Subject<Action> = Subject::new();
        mounted.set_actions(own.stream());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = parent
            .child_actions()
            .switched()
            .subscribe(move |a: &Action| seen_clone.borrow_mut().push(a.kind.clone()));

        parent.update_child_actions();
        own.next(Action::new("toggle"));

        assert_eq!(*seen.borrow(), vec!["toggle"]);
    }

    #[test]
    fn test_dispose_detaches_and_is_idempotent() {
        let parent = ComponentNode::root(&component(branch));
        let child = child_of(&parent, "a");
        let grandchild = child_of(&child, "g");
        let sibling = child_of(&parent, "b");

        let released = Rc::new(Cell::new(0));
        let released_clone = released.clone();
        child.track(0, Subscription::new(move || released_clone.set(released_clone.get() + 1)));

        let (count, _sub) = publications(parent.child_actions());

        child.dispose();
        child.dispose();

        assert_eq!(released.get(), 1);
        assert!(child.is_disposed());
        assert!(grandchild.is_disposed());
        assert!(!sibling.is_disposed());
        assert_eq!(parent.children().len(), 1);
        assert!(parent.saved_child(component(leaf).id(), Some("a")).is_none());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_track_after_dispose_releases_immediately() {
        let node = ComponentNode::root(&component(leaf));
        node.dispose();

        let released = Rc::new(Cell::new(false));
        let released_clone = released.clone();
        node.track(0, Subscription::new(move || released_clone.set(true)));
        assert!(released.get());
    }

    #[test]
    fn test_node_outlives_replaced_instance() {
        let parent = ComponentNode::root(&component(branch));
        let child = child_of(&parent, "moved");

        let old = child.attach_instance();
        let new = child.attach_instance();
        assert_ne!(old, new);

        let old_released = Rc::new(Cell::new(false));
        let new_released = Rc::new(Cell::new(false));
        let old_clone = old_released.clone();
        let new_clone = new_released.clone();
        child.track(old, Subscription::new(move || old_clone.set(true)));
        child.track(new, Subscription::new(move || new_clone.set(true)));

        child.detach_instance(old);
        assert!(old_released.get());
        assert!(!new_released.get());
        assert!(!child.is_disposed());
        assert_eq!(child.live_instances(), 1);
        assert_eq!(parent.children().len(), 1);

        child.detach_instance(new);
        assert!(new_released.get());
        assert!(child.is_disposed());
        assert!(parent.children().is_empty());
    }
}
