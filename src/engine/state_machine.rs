//! Reactive State Machine.
//!
//! ```text
//! reducer streams ──merge──► startWith(initial) ──scan──► share ──► state
//!                                                  │
//!                                                  └─► lifecycle: willCallReducer
//! ```
//!
//! Envelopes are applied strictly in the order the merge emits them.

use crate::config::config;
use crate::stream::{Stream, Streams};
use crate::types::{Action, State};

use super::{LifecycleBus, LifecycleEvent, ReducerEnvelope};

/// Build the shared state stream of a component.
///
/// Publishes `initial_state` first, then the result of every reducer
/// application. A `WillCallReducer` event is published on `lifecycle`
/// right before each reducer runs.
pub fn create_state_stream<S: State>(
    reducers: impl Into<Streams<ReducerEnvelope<S>>>,
    initial_state: S,
    lifecycle: &LifecycleBus<S>,
) -> Stream<S> {
    let lifecycle = lifecycle.clone();

    Stream::merge(reducers.into())
        .scan(initial_state, move |state, envelope: &ReducerEnvelope<S>| {
            lifecycle.publish(LifecycleEvent::WillCallReducer {
                action: envelope.action.clone(),
                reducer: envelope.reducer.clone(),
            });
            if config().trace_reducers {
                tracing::trace!(
                    reducer = envelope.reducer.name(),
                    action = %envelope.action.kind,
                    "calling reducer"
                );
            }
            envelope.reducer.apply(state, &envelope.action)
        })
        .share()
}

/// Merge action streams, dropping empty emissions.
///
/// An actions function may decide to emit nothing for a given event by
/// mapping it to `None`.
pub fn create_actions_stream(actions: impl Into<Streams<Option<Action>>>) -> Stream<Action> {
    Stream::merge(actions.into()).filter_map(|action| action.clone())
}

// Plain action streams never emit `None`; let them stand in for the
// optional form so `actions` functions can return either.

impl From<Stream<Action>> for Streams<Option<Action>> {
    fn from(stream: Stream<Action>) -> Self {
        Streams::from(stream.map(|action| Some(action.clone())))
    }
}

impl From<Vec<Stream<Action>>> for Streams<Option<Action>> {
    fn from(streams: Vec<Stream<Action>>) -> Self {
        streams
            .into_iter()
            .map(|stream| stream.map(|action| Some(action.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reducer;
    use crate::stream::Subject;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq, Default)]
    struct Counter {
        count: i32,
    }

    #[test]
    fn test_counter_reaches_two() {
        let actions: Subject<Action> = Subject::new();
        let lifecycle = LifecycleBus::new();
        let inc = reducer("inc", |s: &Counter, a: &Action| {
            if a.is("inc") {
                Counter { count: s.count + 1 }
            } else {
                s.clone()
            }
        });

        let states = Rc::new(RefCell::new(Vec::new()));
        let states_clone = states.clone();
        let state = create_state_stream(
            actions.stream().reduce_with(inc),
            Counter::default(),
            &lifecycle,
        );
        let _sub = state.subscribe(move |s: &Counter| states_clone.borrow_mut().push(s.clone()));

        actions.next(Action::new("inc"));
        actions.next(Action::new("inc"));

        let counts: Vec<i32> = states.borrow().iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![0, 1, 2]);
    }

    #[test]
    fn test_will_call_reducer_precedes_state() {
        let actions: Subject<Action> = Subject::new();
        let lifecycle: LifecycleBus<i32> = LifecycleBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_lifecycle = log.clone();
        let _lsub = lifecycle.stream().subscribe(move |e: &LifecycleEvent<i32>| {
            if let LifecycleEvent::WillCallReducer { action, reducer } = e {
                log_lifecycle
                    .borrow_mut()
                    .push(format!("will:{}:{}", reducer.name(), action.kind));
            }
        });

        let double = reducer("double", |s: &i32, _: &Action| s * 2);
        let state = create_state_stream(actions.stream().reduce_with(double), 1, &lifecycle);
        let log_state = log.clone();
        let _ssub = state.subscribe(move |s: &i32| log_state.borrow_mut().push(format!("state:{s}")));

        actions.next(Action::new("go"));

        assert_eq!(
            *log.borrow(),
            vec!["state:1", "will:double:go", "state:2"]
        );
    }

    #[test]
    fn test_shared_state_runs_reducers_once() {
        let actions: Subject<Action> = Subject::new();
        let lifecycle: LifecycleBus<i32> = LifecycleBus::new();
        let calls = Rc::new(RefCell::new(0));
        let calls_clone = calls.clone();
        let counted = reducer("count", move |s: &i32, _: &Action| {
            *calls_clone.borrow_mut() += 1;
            s + 1
        });

        let state = create_state_stream(actions.stream().reduce_with(counted), 0, &lifecycle);
        let _a = state.subscribe(|_| {});
        let _b = state.subscribe(|_| {});

        actions.next(Action::new("x"));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_actions_stream_filters_none() {
        let clicks: Subject<Option<Action>> = Subject::new();
        let keys: Subject<Option<Action>> = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let actions = create_actions_stream(vec![clicks.stream(), keys.stream()]);
        let _sub = actions.subscribe(move |a: &Action| seen_clone.borrow_mut().push(a.kind.clone()));

        clicks.next(Some(Action::new("click")));
        keys.next(None);
        keys.next(Some(Action::new("key")));
        clicks.next(None);

        assert_eq!(*seen.borrow(), vec!["click", "key"]);
    }

    #[test]
    fn test_plain_action_streams_are_accepted() {
        let left: Subject<Action> = Subject::new();
        let right: Subject<Action> = Subject::new();
        let count = Rc::new(RefCell::new(0));
        let count_clone = count.clone();

        let actions = create_actions_stream(vec![left.stream(), right.stream()]);
        let _sub = actions.subscribe(move |_| *count_clone.borrow_mut() += 1);

        left.next(Action::new("a"));
        right.next(Action::new("b"));
        assert_eq!(*count.borrow(), 2);
    }
}
