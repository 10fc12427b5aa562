//! Component constructors.

use std::any::{type_name, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::types::State;

use super::{ComponentDescriptor, ComponentNode};

/// Identity of a constructor: the type of its function item or closure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConstructorId(TypeId);

/// A zero-argument function producing a [`ComponentDescriptor`], with the
/// state type erased.
///
/// Two `Constructor`s built from the same function item (or the same
/// closure expression) share one identity, so calling [`component`] on
/// every render resolves to the same child.
#[derive(Clone)]
pub struct Constructor {
    id: ConstructorId,
    name: &'static str,
    build: Rc<dyn Fn(&ComponentNode)>,
}

impl Constructor {
    pub fn id(&self) -> ConstructorId {
        self.id
    }

    /// Default display name: the function's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the constructor and give its descriptor to `node`.
    pub(crate) fn build(&self, node: &ComponentNode) {
        (self.build)(node)
    }
}

impl PartialEq for Constructor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Constructor {}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.name).finish()
    }
}

/// Wrap a constructor function.
///
/// ```ignore
/// fn counter() -> ComponentDescriptor<Count> {
///     ComponentDescriptor::new(counter_view).reducers(counter_reducers)
/// }
///
/// h.create(component(counter), Props::new(), vec![])?;
/// ```
pub fn component<S, F>(constructor: F) -> Constructor
where
    S: State,
    F: Fn() -> ComponentDescriptor<S> + 'static,
{
    Constructor {
        id: ConstructorId(TypeId::of::<F>()),
        name: short_name(type_name::<F>()),
        build: Rc::new(move |node: &ComponentNode| node.render(constructor())),
    }
}

/// Last path segment that is not a closure marker.
fn short_name(path: &'static str) -> &'static str {
    path.rsplit("::")
        .find(|segment| !segment.starts_with("{{"))
        .unwrap_or(path)
}
