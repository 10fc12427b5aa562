//! Component Module - Constructors, descriptors and component nodes.
//!
//! A constructor is a plain function returning a [`ComponentDescriptor`].
//! The first time a parent's view creates an element for it (per key), a
//! [`ComponentNode`] is built: it runs the constructor, synthesizes a
//! component class for the host and wires the node into the action tree.
//!
//! # Example
//!
//! ```ignore
//! use spark_recycle::prelude::*;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Count(i64);
//!
//! fn counter() -> ComponentDescriptor<Count> {
//!     ComponentDescriptor::new(|state: &Count, _props, h| {
//!         h.create(
//!             "div",
//!             Props::new(),
//!             vec![
//!                 h.create("button", Props::new().set("class", "inc"), vec![h.text("+")])?,
//!                 h.text(state.0.to_string()),
//!             ],
//!         )
//!     })
//!     .actions(|sources, _| sources.dom(".inc").events("click").map(|_| Action::new("inc")))
//!     .reducers(|sources, _| {
//!         sources
//!             .actions()
//!             .of_kind("inc")
//!             .reduce_with(reducer("inc", |s: &Count, _| Count(s.0 + 1)))
//!     })
//! }
//! ```

mod class;
mod constructor;
mod descriptor;
mod node;
mod registry;

pub use constructor::{component, Constructor, ConstructorId};
pub use descriptor::{ActionsFn, ComponentDescriptor, ReducersFn, ShouldUpdateFn, ViewFn};
pub use node::ComponentNode;
pub(crate) use node::WeakNode;
pub use registry::{validate_child, SavedChildren};
