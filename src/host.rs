//! Host boundary - what the rendering library must provide.
//!
//! The host owns instantiation, reconciliation and the real element tree.
//! It talks to this crate through two traits:
//!
//! - [`ComponentClass`] - something the host can instantiate from an
//!   [`Element::Component`](crate::element::Element::Component)
//! - [`ComponentInstance`] - a live instance receiving lifecycle calls
//!
//! Hooks are called in host order: a parent renders before its children,
//! children mount (and update) before their parent.

use std::any::Any;
use std::rc::Rc;

use crate::dom::DomNode;
use crate::element::{Element, ElementFactory, PropTypes, Props};
use crate::error::Result;

/// Ask the host to schedule a re-render of an instance.
pub type Updater = Rc<dyn Fn()>;

/// A component type the host can instantiate.
pub trait ComponentClass {
    fn display_name(&self) -> &str;

    /// Props merged into every element created for this class.
    fn default_props(&self) -> Option<&Props> {
        None
    }

    fn prop_types(&self) -> Option<&PropTypes> {
        None
    }

    /// Create an instance for a newly mounted element.
    fn instantiate(&self, props: &Props, updater: Updater) -> Result<Box<dyn ComponentInstance>>;
}

/// A mounted component.
pub trait ComponentInstance {
    /// Produce the element tree for the committed props and state.
    fn render(&mut self) -> Result<Element>;

    /// Called before every re-render with the incoming props.
    ///
    /// The instance commits `next_props` and any pending state before
    /// returning, whatever it decides.
    fn should_component_update(&mut self, next_props: &Props) -> bool;

    /// First commit. `dom` is the rendered subtree of this instance.
    fn component_did_mount(&mut self, _dom: &dyn DomNode) {}

    /// Every later commit that re-rendered this instance.
    fn component_did_update(&mut self, _dom: &dyn DomNode) {}

    fn component_will_unmount(&mut self) {}
}

/// A host library component whose `render` wants the element factory.
///
/// Used through [`ElementType::class`](crate::element::ElementType::class),
/// which also wants `PartialEq` to tell class values apart. The class is
/// never modified: each component node wraps it in an adapter
/// that supplies its own factory.
pub trait HostClass {
    fn display_name(&self) -> &str;

    fn default_props(&self) -> Option<&Props> {
        None
    }

    fn render(&self, props: &Props, factory: &ElementFactory) -> Result<Element>;
}

/// A [`HostClass`] comparable with classes of any other type.
///
/// Implemented for every `HostClass + PartialEq`. Two values of the same
/// type with different fields are different classes.
pub trait DynHostClass: HostClass {
    fn as_any(&self) -> &dyn Any;

    fn eq_class(&self, other: &dyn DynHostClass) -> bool;
}

impl<C: HostClass + PartialEq + 'static> DynHostClass for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_class(&self, other: &dyn DynHostClass) -> bool {
        other.as_any().downcast_ref::<C>().is_some_and(|other| other == self)
    }
}
