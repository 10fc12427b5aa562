//! Subject - Multicast publish/subscribe channel.
//!
//! Observers are stored with an id so they can be removed through the
//! returned [`Subscription`]. Delivery iterates over a snapshot of the
//! observer list: observers may subscribe, unsubscribe or publish while a
//! value is being delivered.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{Observer, Stream, Subscription};

struct Observers<T> {
    entries: Vec<(usize, Observer<T>)>,
    next_id: usize,
}

impl<T> Observers<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    fn contains(&self, id: usize) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }
}

/// A hot multicast channel.
///
/// Values pushed with [`Subject::next`] reach every observer subscribed at
/// that moment. Nothing is replayed to late subscribers.
pub struct Subject<T> {
    observers: Rc<RefCell<Observers<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<T: 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observers.borrow().entries.len())
            .finish()
    }
}

impl<T: 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            observers: Rc::new(RefCell::new(Observers::new())),
        }
    }

    /// Publish a value to all current observers.
    pub fn next(&self, value: T) {
        self.emit(&value);
    }

    /// Publish a borrowed value to all current observers.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(usize, Observer<T>)> = self
            .observers
            .borrow()
            .entries
            .iter()
            .map(|(id, observer)| (*id, observer.clone()))
            .collect();

        for (id, observer) in snapshot {
            // Skip observers removed by an earlier observer in this round
            if self.observers.borrow().contains(id) {
                observer(value);
            }
        }
    }

    /// Subscribe a callback.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe_observer(Rc::new(callback))
    }

    /// Subscribe an already shared observer.
    pub fn subscribe_observer(&self, observer: Observer<T>) -> Subscription {
        let id = {
            let mut observers = self.observers.borrow_mut();
            let id = observers.next_id;
            observers.next_id += 1;
            observers.entries.push((id, observer));
            id
        };

        let weak: Weak<RefCell<Observers<T>>> = Rc::downgrade(&self.observers);
        Subscription::new(move || {
            if let Some(observers) = weak.upgrade() {
                observers
                    .borrow_mut()
                    .entries
                    .retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Read-only stream view of this subject.
    pub fn stream(&self) -> Stream<T> {
        let subject = self.clone();
        Stream::new(move |observer| subject.subscribe_observer(observer))
    }

    /// Number of observers currently attached.
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_multicast() {
        let subject = Subject::new();
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));

        let a_clone = a.clone();
        let _sa = subject.subscribe(move |v: &i32| a_clone.set(a_clone.get() + v));
        let b_clone = b.clone();
        let _sb = subject.subscribe(move |v: &i32| b_clone.set(b_clone.get() + v * 10));

        subject.next(2);
        assert_eq!(a.get(), 2);
        assert_eq!(b.get(), 20);
    }

    #[test]
    fn test_unsubscribe_removes_observer() {
        let subject = Subject::new();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let sub = subject.subscribe(move |_: &()| count_clone.set(count_clone.get() + 1));
        subject.next(());
        sub.unsubscribe();
        subject.next(());

        assert_eq!(count.get(), 1);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn test_no_replay_for_late_subscribers() {
        let subject = Subject::new();
        subject.next(1);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = subject.subscribe(move |v: &i32| seen_clone.borrow_mut().push(*v));
        subject.next(2);

        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_reentrant_publish_and_subscribe() {
        let subject: Subject<i32> = Subject::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner = subject.clone();
        let seen_clone = seen.clone();
        let _sub = subject.subscribe(move |v| {
            seen_clone.borrow_mut().push(*v);
            if *v == 1 {
                inner.next(2);
                // Subscribing mid-delivery must not panic
                let _late = inner.subscribe(|_| {});
            }
        });

        subject.next(1);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
