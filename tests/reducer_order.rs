//! State stream ordering properties.
//!
//! Run with: cargo test --test reducer_order

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use spark_recycle::{create_state_stream, reducer, Action, LifecycleBus, LifecycleEvent, Subject};

#[derive(Clone, Debug)]
enum Step {
    Add(i64),
    Double,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![(-1000i64..1000).prop_map(Step::Add), Just(Step::Double)]
}

proptest! {
    #[test]
    fn prop_state_folds_actions_in_emission_order(
        initial in -1000i64..1000,
        steps in prop::collection::vec(step(), 0..24),
    ) {
        let actions: Subject<Action> = Subject::new();
        let add = reducer("add", |s: &i64, a: &Action| s + a.payload.as_i64().unwrap_or(0));
        let double = reducer("double", |s: &i64, _: &Action| s * 2);
        let state = create_state_stream(
            vec![
                actions.stream().of_kind("add").reduce_with(add),
                actions.stream().of_kind("double").reduce_with(double),
            ],
            initial,
            &LifecycleBus::new(),
        );

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _subscription = state.subscribe(move |s: &i64| seen_clone.borrow_mut().push(*s));

        let mut expected = vec![initial];
        let mut current = initial;
        for step in &steps {
            match step {
                Step::Add(n) => {
                    actions.next(Action::with_payload("add", *n));
                    current += n;
                }
                Step::Double => {
                    actions.next(Action::new("double"));
                    current *= 2;
                }
            }
            expected.push(current);
        }

        let seen = seen.borrow().clone();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_every_reducer_call_is_announced(kinds in prop::collection::vec(prop::bool::ANY, 0..16)) {
        let actions: Subject<Action> = Subject::new();
        let lifecycle = LifecycleBus::new();
        let state = create_state_stream(
            actions.stream().reduce_with(reducer("count", |s: &usize, _: &Action| s + 1)),
            0usize,
            &lifecycle,
        );

        let announced = Rc::new(RefCell::new(Vec::new()));
        let announced_clone = announced.clone();
        let _lifecycle = lifecycle.stream().subscribe(move |event: &LifecycleEvent<usize>| {
            if let LifecycleEvent::WillCallReducer { action, .. } = event {
                announced_clone.borrow_mut().push(action.kind.clone());
            }
        });
        let _state = state.subscribe(|_: &usize| {});

        let expected: Vec<String> = kinds
            .iter()
            .map(|flag| if *flag { "on" } else { "off" }.to_string())
            .collect();
        for kind in &expected {
            actions.next(Action::new(kind.as_str()));
        }

        let announced = announced.borrow().clone();
        prop_assert_eq!(announced, expected);
    }
}
