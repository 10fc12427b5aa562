//! Render adapter for host library classes.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::host::{ComponentClass, ComponentInstance, DynHostClass, Updater};

use super::{Element, ElementFactory, Props};

/// A [`HostClass`](crate::host::HostClass) bound to the element factory of
/// one component node.
///
/// The node caches one adapter per distinct class value so the host sees a
/// stable component class across renders.
pub struct RenderAdapter {
    class: Rc<dyn DynHostClass>,
    factory: ElementFactory,
}

impl RenderAdapter {
    pub fn new(class: Rc<dyn DynHostClass>, factory: ElementFactory) -> Self {
        Self { class, factory }
    }

    pub fn class(&self) -> &Rc<dyn DynHostClass> {
        &self.class
    }
}

impl ComponentClass for RenderAdapter {
    fn display_name(&self) -> &str {
        self.class.display_name()
    }

    fn default_props(&self) -> Option<&Props> {
        self.class.default_props()
    }

    fn instantiate(&self, props: &Props, _updater: Updater) -> Result<Box<dyn ComponentInstance>> {
        Ok(Box::new(AdapterInstance {
            class: self.class.clone(),
            factory: self.factory.clone(),
            props: props.clone(),
        }))
    }
}

impl fmt::Debug for RenderAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderAdapter")
            .field("class", &self.class.display_name())
            .finish()
    }
}

struct AdapterInstance {
    class: Rc<dyn DynHostClass>,
    factory: ElementFactory,
    props: Props,
}

impl ComponentInstance for AdapterInstance {
    fn render(&mut self) -> Result<Element> {
        self.class.render(&self.props, &self.factory)
    }

    fn should_component_update(&mut self, next_props: &Props) -> bool {
        self.props = next_props.clone();
        true
    }
}
