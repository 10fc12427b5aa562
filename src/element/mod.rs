//! Element Module - Element descriptions and the element factory.
//!
//! A `view` never builds child components directly. It asks the
//! [`ElementFactory`] for elements, and the factory decides per
//! [`ElementType`]:
//!
//! - `Host(tag)` - a plain host element, passed through
//! - `Class(..)` - a host library class, wrapped in a [`RenderAdapter`]
//! - `Component(constructor)` - a child component node, reused by
//!   (constructor, key) or created on first use
//!
//! # Example
//!
//! ```ignore
//! fn view(state: &Todos, _props: &Props, h: &ElementFactory) -> Result<Element> {
//!     let items = state
//!         .items
//!         .iter()
//!         .map(|item| h.create(component(todo_item), Props::new().with_key(&item.id), vec![]))
//!         .collect::<Result<Vec<_>>>()?;
//!     h.create("ul", Props::new(), items)
//! }
//! ```

mod adapter;
mod factory;
mod prop_types;
mod props;

use std::fmt;
use std::rc::Rc;

use crate::component::Constructor;
use crate::host::{ComponentClass, DynHostClass, HostClass};

pub use adapter::RenderAdapter;
pub use factory::ElementFactory;
pub use prop_types::{PropType, PropTypes, PropViolation};
pub use props::Props;

// =============================================================================
// Element
// =============================================================================

/// A description of what to render, handed to the host.
#[derive(Clone)]
pub enum Element {
    /// A host element such as `div`.
    Host { tag: String, props: Props },
    /// An instance of a component class.
    Component {
        class: Rc<dyn ComponentClass>,
        props: Props,
    },
    Text(String),
}

impl Element {
    pub fn host(tag: impl Into<String>, props: Props) -> Self {
        Element::Host {
            tag: tag.into(),
            props,
        }
    }

    /// Component element. The class's default props fill missing values.
    pub fn component(class: Rc<dyn ComponentClass>, mut props: Props) -> Self {
        if let Some(defaults) = class.default_props() {
            props.merge_defaults(defaults);
        }
        Element::Component { class, props }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(text.into())
    }

    pub fn props(&self) -> Option<&Props> {
        match self {
            Element::Host { props, .. } | Element::Component { props, .. } => Some(props),
            Element::Text(_) => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.props().and_then(Props::key)
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Element::Host { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn class(&self) -> Option<&Rc<dyn ComponentClass>> {
        match self {
            Element::Component { class, .. } => Some(class),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Element] {
        self.props().map(Props::children).unwrap_or(&[])
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Host { tag, props } => f
                .debug_struct("Host")
                .field("tag", tag)
                .field("props", props)
                .finish(),
            Element::Component { class, props } => f
                .debug_struct("Component")
                .field("class", &class.display_name())
                .field("props", props)
                .finish(),
            Element::Text(text) => f.debug_tuple("Text").field(text).finish(),
        }
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::text(text)
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Text(text)
    }
}

/// Compare component classes by allocation.
pub(crate) fn same_class(a: &Rc<dyn ComponentClass>, b: &Rc<dyn ComponentClass>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

// =============================================================================
// Element Type
// =============================================================================

/// First argument of [`ElementFactory::create`].
#[derive(Clone)]
pub enum ElementType {
    Host(String),
    /// A host library class, identified by its value.
    Class(Rc<dyn DynHostClass>),
    Component(Constructor),
}

impl ElementType {
    pub fn host(tag: impl Into<String>) -> Self {
        ElementType::Host(tag.into())
    }

    pub fn class<C: HostClass + PartialEq + 'static>(class: C) -> Self {
        ElementType::Class(Rc::new(class))
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Host(tag) => f.debug_tuple("Host").field(tag).finish(),
            ElementType::Class(class) => f.debug_tuple("Class").field(&class.display_name()).finish(),
            ElementType::Component(constructor) => {
                f.debug_tuple("Component").field(constructor).finish()
            }
        }
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Host(tag.to_string())
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        ElementType::Host(tag)
    }
}

impl From<Constructor> for ElementType {
    fn from(constructor: Constructor) -> Self {
        ElementType::Component(constructor)
    }
}

impl From<&Constructor> for ElementType {
    fn from(constructor: &Constructor) -> Self {
        ElementType::Component(constructor.clone())
    }
}
