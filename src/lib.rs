//! # spark-recycle
//!
//! Reactive component composition: actions up, state down.
//!
//! Components never wire props and callbacks to each other. Each one
//! declares how DOM events become actions and how actions fold into
//! state; the tree of component nodes carries actions upward and state
//! flows down through re-rendering. Rendering itself belongs to a host
//! library, reached through the traits in [`host`].
//!
//! ## Architecture
//!
//! ```text
//! DOM events → DomRegistry → actions(sources, props) → own actions ─┐
//!                                children actions (ActionBus) ──────┤
//!                                                                   ▼
//!             re-render ← state ← create_state_stream ← reducers(sources, props)
//!                 │
//!                 └→ ElementFactory → saved children / new ComponentNodes
//! ```
//!
//! Latest component state is kept in a
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) signal per node.
//!
//! ## Modules
//!
//! - [`stream`] - Synchronous push streams (subject, merge, scan, switch, share)
//! - [`engine`] - Reducers, action/lifecycle buses, state machine, sources
//! - [`dom`] - Host DOM boundary and the DOM observable registry
//! - [`element`] - Elements, props and the element factory
//! - [`component`] - Constructors, descriptors and component nodes
//! - [`host`] - Traits the rendering library implements
//! - [`testing`] - In-memory DOM and host harness

pub mod component;
pub mod config;
pub mod dom;
pub mod element;
pub mod engine;
pub mod error;
pub mod host;
pub mod stream;
pub mod testing;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use component::{component, ComponentDescriptor, ComponentNode, Constructor, ConstructorId};

pub use config::{config, reset_config, set_config, RecycleConfig};

pub use dom::{DomElement, DomNode, DomRegistry};

pub use element::{Element, ElementFactory, ElementType, PropType, PropTypes, Props};

pub use engine::{
    create_actions_stream, create_state_stream, generate_sources, reducer, register_reducer,
    ActionBus, DomSource, LifecycleBus, LifecycleEvent, Reducer, ReducerEnvelope, Sources,
};

pub use error::{RecycleError, Result};

pub use host::{ComponentClass, ComponentInstance, DynHostClass, HostClass, Updater};

pub use stream::{Stream, Streams, Subject, Subscription};

/// Everything a component definition usually needs.
pub mod prelude {
    pub use crate::component::{component, ComponentDescriptor};
    pub use crate::element::{Element, ElementFactory, ElementType, Props};
    pub use crate::engine::{reducer, LifecycleEvent, Sources};
    pub use crate::error::Result;
    pub use crate::stream::{Stream, Streams};
    pub use crate::types::{Action, DomEvent};
}
