//! Replace-on-write value stream.

use std::sync::Arc;

/// Handle returned by [`Observable::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

type Subscriber<T> = Box<dyn FnMut(&Arc<T>) + Send>;

/// Latest-value-wins holder with change callbacks.
///
/// Every `set` replaces the value outright and notifies subscribers in
/// subscription order. A new subscriber is called once, immediately, with
/// the current value.
pub struct Observable<T> {
    latest: Arc<T>,
    version: u64,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
}

impl<T> Observable<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            latest: Arc::new(initial),
            version: 0,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Current value.
    #[must_use]
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.latest)
    }

    /// Number of `set` calls so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the value and notify.
    pub fn set(&mut self, value: T) {
        self.latest = Arc::new(value);
        self.version += 1;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.latest);
        }
    }

    pub fn subscribe(&mut self, mut subscriber: impl FnMut(&Arc<T>) + Send + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        subscriber(&self.latest);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("latest", &self.latest)
            .field("version", &self.version)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_subscribe_fires_immediately() {
        let mut observable = Observable::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        observable.subscribe(move |v| sink.lock().push(**v));
        observable.set(2);
        observable.set(3);

        assert_eq!(*seen.lock(), vec![1, 2, 3]);
        assert_eq!(*observable.get(), 3);
        assert_eq!(observable.version(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut observable = Observable::new("a");
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);

        let id = observable.subscribe(move |_| *sink.lock() += 1);
        assert!(observable.unsubscribe(id));
        assert!(!observable.unsubscribe(id));
        observable.set("b");

        assert_eq!(*seen.lock(), 1);
        assert_eq!(observable.subscriber_count(), 0);
    }
}
