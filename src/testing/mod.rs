//! Testing Module - An in-memory host for driving components.
//!
//! - [`MemoryElement`] - a DOM element implementing [`DomNode`] and
//!   [`DomElement`] with a small selector engine
//! - [`Harness`] - mounts a component tree, dispatches DOM events and
//!   runs render passes until the tree settles
//!
//! # Example
//!
//! ```ignore
//! use spark_recycle::testing::Harness;
//!
//! let mut app = Harness::mount(&component(counter))?;
//! app.dispatch(".inc", DomEvent::new("click"))?;
//! assert_eq!(app.root().unwrap().state::<Count>(), Some(Count(1)));
//! ```
//!
//! [`DomNode`]: crate::dom::DomNode
//! [`DomElement`]: crate::dom::DomElement

mod dom;
mod harness;

pub use dom::MemoryElement;
pub use harness::Harness;
