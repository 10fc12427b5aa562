//! Reducers and reducer envelopes.

use std::fmt;
use std::rc::Rc;

use crate::stream::Stream;
use crate::types::Action;

/// A named pure function `(state, action) -> state`.
///
/// Identity is the function allocation: clones compare equal, two reducers
/// built from the same closure code do not.
pub struct Reducer<S> {
    name: Rc<str>,
    func: Rc<dyn Fn(&S, &Action) -> S>,
}

impl<S> Reducer<S> {
    pub fn new(name: &str, func: impl Fn(&S, &Action) -> S + 'static) -> Self {
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, state: &S, action: &Action) -> S {
        (self.func)(state, action)
    }
}

impl<S> Clone for Reducer<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
        }
    }
}

impl<S> PartialEq for Reducer<S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl<S> fmt::Debug for Reducer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reducer").field(&self.name).finish()
    }
}

/// Shorthand for [`Reducer::new`].
pub fn reducer<S>(name: &str, func: impl Fn(&S, &Action) -> S + 'static) -> Reducer<S> {
    Reducer::new(name, func)
}

// =============================================================================
// Envelope
// =============================================================================

/// A reducer paired with the action that triggered it.
pub struct ReducerEnvelope<S> {
    pub reducer: Reducer<S>,
    pub action: Action,
}

impl<S> ReducerEnvelope<S> {
    pub fn new(reducer: Reducer<S>, action: Action) -> Self {
        Self { reducer, action }
    }
}

impl<S> Clone for ReducerEnvelope<S> {
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            action: self.action.clone(),
        }
    }
}

impl<S> fmt::Debug for ReducerEnvelope<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducerEnvelope")
            .field("reducer", &self.reducer)
            .field("action", &self.action)
            .finish()
    }
}

/// Pair every action of `actions` with `reducer`.
pub fn register_reducer<S: 'static>(
    actions: &Stream<Action>,
    reducer: Reducer<S>,
) -> Stream<ReducerEnvelope<S>> {
    actions.map(move |action| ReducerEnvelope::new(reducer.clone(), action.clone()))
}

impl Stream<Action> {
    /// Method form of [`register_reducer`].
    pub fn reduce_with<S: 'static>(&self, reducer: Reducer<S>) -> Stream<ReducerEnvelope<S>> {
        register_reducer(self, reducer)
    }

    /// Keep only actions of the given type.
    pub fn of_kind(&self, kind: &str) -> Stream<Action> {
        let kind = kind.to_string();
        self.filter(move |action| action.kind == kind)
    }
}
