//! Dataflow Engine - Reducers, buses, state machine and sources.
//!
//! The engine turns a component's declarative `actions` / `reducers`
//! functions into live streams:
//!
//! ```text
//! DOM events ──► actions(sources, props) ──► own actions ──┐
//! children actions (ActionBus, switched) ──────────────────┤
//!                                                          ▼
//!                            reducers(sources, props) ──► envelopes
//!                                                          │
//!                              create_state_stream ◄───────┘
//!                                     │
//!                                     ▼
//!                          state ──► re-render
//! ```
//!
//! Nothing here knows about component nodes. The component module wires
//! these pieces together per node.

mod bus;
mod reducer;
mod sources;
mod state_machine;

pub use bus::{ActionBus, LifecycleBus, LifecycleEvent};
pub use reducer::{reducer, register_reducer, Reducer, ReducerEnvelope};
pub use sources::{generate_sources, DomSource, Sources};
pub use state_machine::{create_actions_stream, create_state_stream};
