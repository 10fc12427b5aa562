//! In-memory host driving the component lifecycle.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::component::{ComponentNode, Constructor};
use crate::element::{same_class, Element, Props};
use crate::error::Result;
use crate::host::{ComponentClass, ComponentInstance, Updater};
use crate::types::{DomEvent, Key};

use super::MemoryElement;

/// Render passes allowed per flush before giving up on a state loop.
const MAX_PASSES: usize = 32;

/// Mounts an element tree into a [`MemoryElement`] container.
///
/// Every pass re-renders from the root. Composite instances are kept
/// across passes when the sibling at the same place has the same class
/// and key; everything else is rebuilt. A composite that declines to
/// update still has its own subtree walked, so a descendant that asked
/// for an update re-renders with the props it last received. Hooks run
/// in host order:
/// `component_did_mount` / `component_did_update` children first, after
/// the whole tree is attached to the container.
pub struct Harness {
    root_element: Element,
    root_node: Option<ComponentNode>,
    container: Rc<MemoryElement>,
    tree: Option<Mounted>,
    dirty: Rc<Cell<bool>>,
    passes: usize,
}

impl Harness {
    /// Mount a root component without props.
    pub fn mount(constructor: &Constructor) -> Result<Self> {
        Self::mount_with_props(constructor, Props::new())
    }

    pub fn mount_with_props(constructor: &Constructor, props: Props) -> Result<Self> {
        let node = ComponentNode::root(constructor);
        let element = Element::component(node.class()?, props);
        Self::start(element, Some(node))
    }

    /// Mount an arbitrary element tree.
    pub fn render(element: Element) -> Result<Self> {
        Self::start(element, None)
    }

    fn start(root_element: Element, root_node: Option<ComponentNode>) -> Result<Self> {
        let mut harness = Self {
            root_element,
            root_node,
            container: Rc::new(MemoryElement::new("body")),
            tree: None,
            dirty: Rc::new(Cell::new(true)),
            passes: 0,
        };
        harness.flush()?;
        Ok(harness)
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Render until no instance asks for an update. Returns the passes run.
    pub fn flush(&mut self) -> Result<usize> {
        let mut passes = 0;
        while self.dirty.replace(false) {
            if passes == MAX_PASSES {
                tracing::warn!(passes, "render loop did not settle");
                break;
            }
            self.render_pass()?;
            passes += 1;
        }
        Ok(passes)
    }

    /// Fire `event` on every element matching `selector`, then flush.
    ///
    /// Returns the number of listeners that ran.
    pub fn dispatch(&mut self, selector: &str, event: DomEvent) -> Result<usize> {
        let delivered = self.container.dispatch_to(selector, &event);
        self.flush()?;
        Ok(delivered)
    }

    /// Re-render the root with new props.
    pub fn set_props(&mut self, props: Props) -> Result<usize> {
        self.root_element = match &self.root_element {
            Element::Component { class, .. } => Element::component(class.clone(), props),
            Element::Host { tag, .. } => Element::host(tag.clone(), props),
            Element::Text(text) => Element::Text(text.clone()),
        };
        self.dirty.set(true);
        self.flush()
    }

    /// Unmount everything and empty the container.
    pub fn unmount(&mut self) {
        if let Some(tree) = self.tree.take() {
            unmount(tree);
        }
        self.container.replace_children(Vec::new());
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Node of the root component, when mounted from a constructor.
    pub fn root(&self) -> Option<&ComponentNode> {
        self.root_node.as_ref()
    }

    pub fn container(&self) -> &Rc<MemoryElement> {
        &self.container
    }

    /// Markup of the mounted tree.
    pub fn html(&self) -> String {
        self.container
            .children()
            .iter()
            .map(|child| child.html())
            .collect()
    }

    pub fn text(&self) -> String {
        self.container.text_content()
    }

    pub fn find(&self, selector: &str) -> Vec<Rc<MemoryElement>> {
        self.container.select(selector)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Render passes run since mounting.
    pub fn passes(&self) -> usize {
        self.passes
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    fn render_pass(&mut self) -> Result<()> {
        let previous = self.tree.take();
        let mut removed = Vec::new();
        let mut tree = self.reconcile(previous, &self.root_element, &mut removed)?;

        for stale in removed {
            unmount(stale);
        }
        self.container.replace_children(vec![tree.dom_root()]);
        commit(&mut tree);

        self.tree = Some(tree);
        self.passes += 1;
        tracing::trace!(pass = self.passes, "render pass committed");
        Ok(())
    }

    /// Marks both the instance and the harness dirty.
    fn updater(&self, own: &Rc<Cell<bool>>) -> Updater {
        let dirty = self.dirty.clone();
        let own = own.clone();
        Rc::new(move || {
            own.set(true);
            dirty.set(true);
        })
    }

    fn reconcile(
        &self,
        previous: Option<Mounted>,
        element: &Element,
        removed: &mut Vec<Mounted>,
    ) -> Result<Mounted> {
        match element {
            Element::Text(text) => {
                removed.extend(previous);
                Ok(Mounted::Text(Rc::new(MemoryElement::text(text.as_str()))))
            }
            Element::Host { tag, props } => {
                let previous_children = match previous {
                    Some(Mounted::Host {
                        tag: previous_tag,
                        children,
                        ..
                    }) if previous_tag == *tag => children,
                    other => {
                        removed.extend(other);
                        Vec::new()
                    }
                };

                let dom = Rc::new(MemoryElement::from_props(tag, props));
                let children = self.reconcile_children(previous_children, props.children(), removed)?;
                for child in &children {
                    dom.append(child.dom_root());
                }
                Ok(Mounted::Host {
                    tag: tag.clone(),
                    element: dom,
                    children,
                })
            }
            Element::Component { class, props } => match previous {
                Some(Mounted::Composite(composite))
                    if same_class(&composite.class, class) && composite.key.as_deref() == props.key() =>
                {
                    self.update_composite(*composite, props, removed)
                }
                other => {
                    removed.extend(other);
                    self.mount_composite(class, props, removed)
                }
            },
        }
    }

    /// Composites match by class and key anywhere among the previous
    /// siblings, everything else by position.
    fn reconcile_children(
        &self,
        previous: Vec<Mounted>,
        elements: &[Element],
        removed: &mut Vec<Mounted>,
    ) -> Result<Vec<Mounted>> {
        let mut previous: Vec<Option<Mounted>> = previous.into_iter().map(Some).collect();
        let mut children = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            let slot = match element {
                Element::Component { class, props } => previous.iter().position(|candidate| {
                    matches!(candidate, Some(Mounted::Composite(c))
                        if same_class(&c.class, class) && c.key.as_deref() == props.key())
                }),
                _ => match previous.get(index) {
                    Some(Some(Mounted::Composite(_))) | None => None,
                    Some(_) => Some(index),
                },
            };
            let matched = slot.and_then(|slot| previous[slot].take());
            children.push(self.reconcile(matched, element, removed)?);
        }

        removed.extend(previous.into_iter().flatten());
        Ok(children)
    }

    fn mount_composite(
        &self,
        class: &Rc<dyn ComponentClass>,
        props: &Props,
        removed: &mut Vec<Mounted>,
    ) -> Result<Mounted> {
        let dirty = Rc::new(Cell::new(false));
        let mut instance = class.instantiate(props, self.updater(&dirty))?;
        let output = instance.render()?;
        let rendered = self.reconcile(None, &output, removed)?;

        Ok(Mounted::Composite(Box::new(Composite {
            class: class.clone(),
            key: props.key().map(str::to_string),
            props: props.clone(),
            dirty,
            instance,
            rendered,
            status: Status::Fresh,
        })))
    }

    fn update_composite(
        &self,
        composite: Composite,
        props: &Props,
        removed: &mut Vec<Mounted>,
    ) -> Result<Mounted> {
        let Composite {
            class,
            key,
            dirty,
            mut instance,
            rendered,
            ..
        } = composite;

        dirty.set(false);
        let (rendered, status) = if instance.should_component_update(props) {
            let output = instance.render()?;
            (self.reconcile(Some(rendered), &output, removed)?, Status::Updated)
        } else {
            (self.refresh(rendered, removed)?, Status::Committed)
        };

        Ok(Mounted::Composite(Box::new(Composite {
            class,
            key,
            props: props.clone(),
            dirty,
            instance,
            rendered,
            status,
        })))
    }

    /// Walk a subtree whose owner skipped rendering and update the
    /// composites in it that asked for it.
    fn refresh(&self, mounted: Mounted, removed: &mut Vec<Mounted>) -> Result<Mounted> {
        match mounted {
            Mounted::Text(_) => Ok(mounted),
            Mounted::Host {
                tag,
                element,
                children,
            } => {
                let children = children
                    .into_iter()
                    .map(|child| self.refresh(child, removed))
                    .collect::<Result<Vec<_>>>()?;
                element.replace_children(children.iter().map(Mounted::dom_root).collect());
                Ok(Mounted::Host {
                    tag,
                    element,
                    children,
                })
            }
            Mounted::Composite(composite) if composite.dirty.get() => {
                let props = composite.props.clone();
                self.update_composite(*composite, &props, removed)
            }
            Mounted::Composite(composite) => {
                let Composite {
                    class,
                    key,
                    props,
                    dirty,
                    instance,
                    rendered,
                    status,
                } = *composite;
                let rendered = self.refresh(rendered, removed)?;
                Ok(Mounted::Composite(Box::new(Composite {
                    class,
                    key,
                    props,
                    dirty,
                    instance,
                    rendered,
                    status,
                })))
            }
        }
    }
}

impl fmt::Debug for Harness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("root", &self.root_node)
            .field("passes", &self.passes)
            .field("html", &self.html())
            .finish()
    }
}

// =============================================================================
// Mounted tree
// =============================================================================

enum Mounted {
    Text(Rc<MemoryElement>),
    Host {
        tag: String,
        element: Rc<MemoryElement>,
        children: Vec<Mounted>,
    },
    Composite(Box<Composite>),
}

struct Composite {
    class: Rc<dyn ComponentClass>,
    key: Option<Key>,
    /// Props of the last update
    props: Props,
    /// Set by this instance's updater until it updates again
    dirty: Rc<Cell<bool>>,
    instance: Box<dyn ComponentInstance>,
    rendered: Mounted,
    status: Status,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Status {
    Fresh,
    Updated,
    Committed,
}

impl Mounted {
    fn dom_root(&self) -> Rc<MemoryElement> {
        match self {
            Mounted::Text(element) | Mounted::Host { element, .. } => element.clone(),
            Mounted::Composite(composite) => composite.rendered.dom_root(),
        }
    }
}

/// Run pending mount and update hooks, children first.
fn commit(mounted: &mut Mounted) {
    match mounted {
        Mounted::Text(_) => {}
        Mounted::Host { children, .. } => {
            for child in children {
                commit(child);
            }
        }
        Mounted::Composite(composite) => {
            commit(&mut composite.rendered);
            let dom = composite.rendered.dom_root();
            match composite.status {
                Status::Fresh => composite.instance.component_did_mount(&*dom),
                Status::Updated => composite.instance.component_did_update(&*dom),
                Status::Committed => {}
            }
            composite.status = Status::Committed;
        }
    }
}

/// Run unmount hooks, parents first.
fn unmount(mounted: Mounted) {
    match mounted {
        Mounted::Text(_) => {}
        Mounted::Host { children, .. } => children.into_iter().for_each(unmount),
        Mounted::Composite(composite) => {
            let Composite {
                mut instance,
                rendered,
                ..
            } = *composite;
            instance.component_will_unmount();
            unmount(rendered);
        }
    }
}
