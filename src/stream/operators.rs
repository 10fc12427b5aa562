//! Stream operators.
//!
//! Each operator returns a new cold [`Stream`]; nothing runs until the result
//! is subscribed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{Observer, Stream, Subject, Subscription};

impl<T: 'static> Stream<T> {
    /// Transform every value.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Stream<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |observer: Observer<U>| {
            let f = f.clone();
            source.subscribe(move |value| observer(&f(value)))
        })
    }

    /// Keep values matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Stream::new(move |observer: Observer<T>| {
            let predicate = predicate.clone();
            source.subscribe(move |value| {
                if predicate(value) {
                    observer(value);
                }
            })
        })
    }

    /// Transform and drop `None` results.
    pub fn filter_map<U: 'static>(&self, f: impl Fn(&T) -> Option<U> + 'static) -> Stream<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |observer: Observer<U>| {
            let f = f.clone();
            source.subscribe(move |value| {
                if let Some(mapped) = f(value) {
                    observer(&mapped);
                }
            })
        })
    }

    /// Merge several streams into one, in emission order.
    pub fn merge(streams: impl IntoIterator<Item = Stream<T>>) -> Stream<T> {
        let sources: Rc<Vec<Stream<T>>> = Rc::new(streams.into_iter().collect());
        Stream::new(move |observer: Observer<T>| {
            let subscriptions: Vec<Subscription> = sources
                .iter()
                .map(|source| source.subscribe_observer(observer.clone()))
                .collect();
            Subscription::new(move || {
                for subscription in subscriptions {
                    subscription.unsubscribe();
                }
            })
        })
    }

    /// Seeded running fold.
    ///
    /// Publishes `seed` first, then `f(previous, value)` for every value.
    /// Each subscription folds independently from `seed`.
    pub fn scan<A: Clone + 'static>(
        &self,
        seed: A,
        f: impl Fn(&A, &T) -> A + 'static,
    ) -> Stream<A> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::new(move |observer: Observer<A>| {
            let accumulator = Rc::new(RefCell::new(seed.clone()));
            observer(&seed);

            let f = f.clone();
            source.subscribe(move |value| {
                // No borrow may be held while `f` runs: reducers can re-enter
                let previous = accumulator.borrow().clone();
                let next = f(&previous, value);
                *accumulator.borrow_mut() = next.clone();
                observer(&next);
            })
        })
    }

    /// Multicast one upstream subscription to every subscriber.
    ///
    /// The upstream is connected by the first subscriber and released when
    /// the last one unsubscribes.
    pub fn share(&self) -> Stream<T> {
        let shared = Rc::new(Shared {
            source: self.clone(),
            subject: Subject::new(),
            connection: RefCell::new(None),
            subscribers: Cell::new(0),
        });

        Stream::new(move |observer: Observer<T>| {
            let inner = shared.subject.subscribe_observer(observer);
            let count = shared.subscribers.get() + 1;
            shared.subscribers.set(count);

            if count == 1 {
                let subject = shared.subject.clone();
                let connection = shared.source.subscribe(move |value| subject.emit(value));
                *shared.connection.borrow_mut() = Some(connection);
            }

            let shared = shared.clone();
            Subscription::new(move || {
                inner.unsubscribe();
                let count = shared.subscribers.get().saturating_sub(1);
                shared.subscribers.set(count);
                if count == 0 {
                    let connection = shared.connection.borrow_mut().take();
                    if let Some(connection) = connection {
                        connection.unsubscribe();
                    }
                }
            })
        })
    }
}

struct Shared<T> {
    source: Stream<T>,
    subject: Subject<T>,
    connection: RefCell<Option<Subscription>>,
    subscribers: Cell<usize>,
}

impl<T: 'static> Stream<Stream<T>> {
    /// Flatten a stream of streams, following only the latest inner stream.
    ///
    /// When a new inner stream arrives the previous one is unsubscribed
    /// before the new one is subscribed.
    pub fn switch_latest(&self) -> Stream<T> {
        let outer = self.clone();
        Stream::new(move |observer: Observer<T>| {
            let current: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

            let current_for_outer = current.clone();
            let outer_sub = outer.subscribe(move |inner: &Stream<T>| {
                let previous = current_for_outer.borrow_mut().take();
                if let Some(previous) = previous {
                    previous.unsubscribe();
                }
                let next = inner.subscribe_observer(observer.clone());
                *current_for_outer.borrow_mut() = Some(next);
            });

            Subscription::new(move || {
                outer_sub.unsubscribe();
                let inner = current.borrow_mut().take();
                if let Some(inner) = inner {
                    inner.unsubscribe();
                }
            })
        })
    }
}
