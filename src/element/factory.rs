//! Element factory - the interceptor `view` functions create elements with.

use std::fmt;

use crate::component::{validate_child, ComponentNode, Constructor, WeakNode};
use crate::error::{RecycleError, Result};

use super::{Element, ElementType, Props};

/// Creates elements on behalf of one component node.
///
/// Component children are looked up in the node's saved children by
/// (constructor, key) and created on first use, so a `view` can name its
/// children on every render without instantiating them again.
#[derive(Clone)]
pub struct ElementFactory {
    node: WeakNode,
}

impl ElementFactory {
    pub(crate) fn new(node: WeakNode) -> Self {
        Self { node }
    }

    /// Create an element.
    ///
    /// Non-empty `children` replace `props.children`.
    pub fn create(
        &self,
        ty: impl Into<ElementType>,
        mut props: Props,
        children: Vec<Element>,
    ) -> Result<Element> {
        if !children.is_empty() {
            props.set_children(children);
        }

        match ty.into() {
            ElementType::Host(tag) => Ok(Element::host(tag, props)),
            ElementType::Class(class) => {
                let adapter = self.node()?.adapter_for(class);
                Ok(Element::component(adapter, props))
            }
            ElementType::Component(constructor) => self.child(&constructor, props),
        }
    }

    pub fn text(&self, text: impl Into<String>) -> Element {
        Element::text(text)
    }

    /// The node this factory creates elements for.
    pub fn node(&self) -> Result<ComponentNode> {
        self.node.upgrade().ok_or(RecycleError::Detached)
    }

    fn child(&self, constructor: &Constructor, props: Props) -> Result<Element> {
        let node = self.node()?;

        if let Some(child) = node.saved_child(constructor.id(), props.key()) {
            validate_child(&child, node.times_rendered())?;
            return Ok(Element::component(child.class()?, props));
        }

        let key = props.key().map(str::to_string);
        let child = ComponentNode::new(constructor, key, Some(&node));
        node.register_child(&child)?;
        Ok(Element::component(child.class()?, props))
    }
}

impl fmt::Debug for ElementFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.upgrade();
        f.debug_struct("ElementFactory")
            .field("node", &node.as_ref().map(ComponentNode::name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{component, ComponentDescriptor};
    use crate::config::reset_config;
    use crate::host::HostClass;

    fn item() -> ComponentDescriptor<()> {
        ComponentDescriptor::new(|_, props: &Props, _| {
            Ok(Element::text(props.get_str("label").unwrap_or_default()))
        })
        .display_name("Item")
    }

    fn list() -> ComponentDescriptor<()> {
        ComponentDescriptor::new(|_, _, _| Ok(Element::text("list")))
    }

    #[derive(PartialEq)]
    struct Badge;

    impl HostClass for Badge {
        fn display_name(&self) -> &str {
            "Badge"
        }

        fn render(&self, props: &Props, factory: &ElementFactory) -> Result<Element> {
            factory.create("span", props.clone(), vec![factory.text("new")])
        }
    }

    #[derive(PartialEq)]
    struct Tone(&'static str);

    impl HostClass for Tone {
        fn display_name(&self) -> &str {
            self.0
        }

        fn render(&self, _props: &Props, factory: &ElementFactory) -> Result<Element> {
            Ok(factory.text(self.0))
        }
    }

    fn class_of(element: &Element) -> std::rc::Rc<dyn crate::host::ComponentClass> {
        element.class().cloned().unwrap()
    }

    #[test]
    fn test_host_elements_pass_through() {
        let node = ComponentNode::root(&component(list));
        let h = node.element_factory();

        let element = h
            .create("ul", Props::new().set("id", "todos"), vec![h.text("a")])
            .unwrap();

        assert_eq!(element.tag(), Some("ul"));
        assert_eq!(element.children().len(), 1);
        assert_eq!(node.children().len(), 0);
    }

    #[test]
    fn test_first_use_creates_and_registers() {
        reset_config();
        let node = ComponentNode::root(&component(list));
        node.begin_render();
        let h = node.element_factory();

        let a = h.create(component(item), Props::new().with_key("a"), vec![]).unwrap();
        let b = h.create(component(item), Props::new().with_key("b"), vec![]).unwrap();

        assert_eq!(node.children().len(), 2);
        assert_eq!(node.saved_children_len(), 2);
        assert!(!crate::element::same_class(&class_of(&a), &class_of(&b)));
        assert_eq!(class_of(&a).display_name(), "Item");
    }

    #[test]
    fn test_later_passes_resolve_to_saved_child() {
        reset_config();
        let node = ComponentNode::root(&component(list));
        let h = node.element_factory();

        node.begin_render();
        let first = h.create(component(item), Props::new().with_key("a"), vec![]).unwrap();

        node.begin_render();
        let second = h.create(component(item), Props::new().with_key("a"), vec![]).unwrap();
        let third = h.create(component(item), Props::new().with_key("a"), vec![]).unwrap();

        assert!(crate::element::same_class(&class_of(&first), &class_of(&second)));
        assert!(crate::element::same_class(&class_of(&second), &class_of(&third)));
        assert_eq!(node.children().len(), 1);
    }

    #[test]
    fn test_first_pass_repeat_is_rejected() {
        reset_config();
        let node = ComponentNode::root(&component(list));
        node.begin_render();
        let h = node.element_factory();

        h.create(component(item), Props::new(), vec![]).unwrap();
        let err = h.create(component(item), Props::new(), vec![]).unwrap_err();
        assert_eq!(err, RecycleError::MissingKey { name: "Item".into() });
    }

    #[test]
    fn test_host_class_adapter_is_cached() {
        let node = ComponentNode::root(&component(list));
        let h = node.element_factory();

        let first = h.create(ElementType::class(Badge), Props::new(), vec![]).unwrap();
        let second = h.create(ElementType::class(Badge), Props::new(), vec![]).unwrap();

        assert!(crate::element::same_class(&class_of(&first), &class_of(&second)));
        assert_eq!(class_of(&first).display_name(), "Badge");
    }

    #[test]
    fn test_host_class_values_get_their_own_adapter() {
        let node = ComponentNode::root(&component(list));
        let h = node.element_factory();

        let red = h.create(ElementType::class(Tone("red")), Props::new(), vec![]).unwrap();
        let blue = h.create(ElementType::class(Tone("blue")), Props::new(), vec![]).unwrap();
        let red_again = h.create(ElementType::class(Tone("red")), Props::new(), vec![]).unwrap();
        let badge = h.create(ElementType::class(Badge), Props::new(), vec![]).unwrap();

        assert!(!crate::element::same_class(&class_of(&red), &class_of(&blue)));
        assert!(crate::element::same_class(&class_of(&red), &class_of(&red_again)));
        assert!(!crate::element::same_class(&class_of(&red), &class_of(&badge)));
        assert_eq!(class_of(&blue).display_name(), "blue");
    }

    #[test]
    fn test_detached_factory_errors() {
        let h = ComponentNode::root(&component(list)).element_factory();
        assert_eq!(
            h.create("div", Props::new(), vec![]).map(|_| ()),
            Ok(())
        );
        assert_eq!(
            h.create(component(item), Props::new(), vec![]).unwrap_err(),
            RecycleError::Detached
        );
    }
}
