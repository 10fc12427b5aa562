//! Action and lifecycle buses.
//!
//! - [`ActionBus`] carries whole streams: each time a component's child set
//!   changes, the merged children-action stream is republished and
//!   subscribers switch to it.
//! - [`LifecycleBus`] carries [`LifecycleEvent`]s published by the owning
//!   component.

use std::fmt;

use crate::stream::{Stream, Subject};
use crate::types::{Action, State};

use super::Reducer;

// =============================================================================
// Action Bus
// =============================================================================

/// Re-emittable source of a component's children actions.
#[derive(Clone, Debug, Default)]
pub struct ActionBus {
    subject: Subject<Stream<Action>>,
}

impl ActionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current children-action stream.
    pub fn publish(&self, actions: Stream<Action>) {
        self.subject.next(actions);
    }

    /// Raw stream of published streams.
    pub fn streams(&self) -> Stream<Stream<Action>> {
        self.subject.stream()
    }

    /// Actions of whichever stream was published last.
    pub fn switched(&self) -> Stream<Action> {
        self.subject.stream().switch_latest().share()
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Lifecycle notifications of a component.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent<S> {
    ComponentMounted { state: S },
    ComponentUpdated { state: S },
    WillCallReducer { action: Action, reducer: Reducer<S> },
}

impl<S> LifecycleEvent<S> {
    /// Event tag as used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ComponentMounted { .. } => "componentMounted",
            Self::ComponentUpdated { .. } => "componentUpdated",
            Self::WillCallReducer { .. } => "willCallReducer",
        }
    }
}

/// Lifecycle channel of one component.
pub struct LifecycleBus<S> {
    subject: Subject<LifecycleEvent<S>>,
}

impl<S: State> LifecycleBus<S> {
    pub fn new() -> Self {
        Self {
            subject: Subject::new(),
        }
    }

    pub fn publish(&self, event: LifecycleEvent<S>) {
        self.subject.next(event);
    }

    /// Read-only view for sources.
    pub fn stream(&self) -> Stream<LifecycleEvent<S>> {
        self.subject.stream()
    }
}

impl<S: State> Default for LifecycleBus<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for LifecycleBus<S> {
    fn clone(&self) -> Self {
        Self {
            subject: self.subject.clone(),
        }
    }
}

impl<S> fmt::Debug for LifecycleBus<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleBus").field("subject", &self.subject).finish()
    }
}
