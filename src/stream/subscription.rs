//! Subscription handles.
//!
//! A [`Subscription`] is the cleanup half of `subscribe()`. Dropping it does
//! nothing; call [`Subscription::unsubscribe`] to detach the observer.

use std::fmt;

/// Handle returned by every `subscribe` call.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Create a subscription that runs `teardown` when unsubscribed.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Detach the observer. Runs the teardown exactly once.
    pub fn unsubscribe(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }

    /// True when there is nothing left to release.
    pub fn is_closed(&self) -> bool {
        self.teardown.is_none()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

// =============================================================================
// Subscription Set
// =============================================================================

/// A bag of subscriptions released together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    entries: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, subscription: Subscription) {
        if !subscription.is_closed() {
            self.entries.push(subscription);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take every subscription out of the set.
    ///
    /// Callers unsubscribe the returned handles after releasing any borrow
    /// on the set, since teardown may re-enter.
    pub fn take_all(&mut self) -> Vec<Subscription> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_unsubscribe_runs_teardown_once() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let sub = Subscription::new(move || count_clone.set(count_clone.get() + 1));
        assert!(!sub.is_closed());
        sub.unsubscribe();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_drop_does_not_unsubscribe() {
        let called = Rc::new(Cell::new(false));
        let called_clone = called.clone();

        drop(Subscription::new(move || called_clone.set(true)));
        assert!(!called.get());
    }

    #[test]
    fn test_set_skips_empty() {
        let mut set = SubscriptionSet::new();
        set.add(Subscription::empty());
        set.add(Subscription::new(|| {}));
        assert_eq!(set.len(), 1);

        for sub in set.take_all() {
            sub.unsubscribe();
        }
        assert!(set.is_empty());
    }
}
