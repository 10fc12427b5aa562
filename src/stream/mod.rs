//! Stream Module - Synchronous push-based streams.
//!
//! The dataflow engine needs a handful of reactive-stream primitives:
//!
//! - [`Subject`] - hot multicast channel with an imperative `next`
//! - [`Stream`] - cold subscribe function, composed with operators
//! - Operators: `map`, `filter`, `filter_map`, `merge`, `scan`,
//!   `switch_latest`, `share`
//!
//! Everything is single-threaded and synchronous: a value pushed into a
//! subject is delivered to every downstream observer before `next` returns.
//! There are no error or completion channels.
//!
//! # Example
//!
//! ```ignore
//! use spark_recycle::stream::Subject;
//!
//! let clicks = Subject::new();
//! let doubled = clicks.stream().map(|n: &i32| n * 2);
//!
//! let sub = doubled.subscribe(|n| println!("{n}"));
//! clicks.next(21); // prints 42
//! sub.unsubscribe();
//! ```

mod operators;
mod subject;
mod subscription;

use std::fmt;
use std::rc::Rc;

pub use subject::Subject;
pub use subscription::{Subscription, SubscriptionSet};

/// Observer callback shared between operators.
pub type Observer<T> = Rc<dyn Fn(&T)>;

// =============================================================================
// Stream
// =============================================================================

/// A cold stream: subscribing runs the subscribe function for that observer.
pub struct Stream<T> {
    subscribe_fn: Rc<dyn Fn(Observer<T>) -> Subscription>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: self.subscribe_fn.clone(),
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Stream")
    }
}

impl<T: 'static> Stream<T> {
    /// Build a stream from a subscribe function.
    pub fn new(subscribe: impl Fn(Observer<T>) -> Subscription + 'static) -> Self {
        Self {
            subscribe_fn: Rc::new(subscribe),
        }
    }

    /// A stream that never emits.
    pub fn empty() -> Self {
        Self::new(|_| Subscription::empty())
    }

    /// Subscribe a callback.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        (self.subscribe_fn)(Rc::new(callback))
    }

    /// Subscribe an already shared observer.
    pub fn subscribe_observer(&self, observer: Observer<T>) -> Subscription {
        (self.subscribe_fn)(observer)
    }
}

// =============================================================================
// Streams - one or many
// =============================================================================

/// One or more streams, normalized to a list.
///
/// `actions` and `reducers` functions may return a single stream or a vector
/// of them; both convert into `Streams`.
pub struct Streams<T>(Vec<Stream<T>>);

impl<T> Streams<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, stream: Stream<T>) {
        self.0.push(stream);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for Streams<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Stream<T>> for Streams<T> {
    fn from(stream: Stream<T>) -> Self {
        Self(vec![stream])
    }
}

impl<T> From<Vec<Stream<T>>> for Streams<T> {
    fn from(streams: Vec<Stream<T>>) -> Self {
        Self(streams)
    }
}

impl<T> FromIterator<Stream<T>> for Streams<T> {
    fn from_iter<I: IntoIterator<Item = Stream<T>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Streams<T> {
    type Item = Stream<T>;
    type IntoIter = std::vec::IntoIter<Stream<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
