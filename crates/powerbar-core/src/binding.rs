//! Notification channels and shared state between widgets.
//!
//! - `Signal<T>` - Synchronous observer list; `emit` calls every subscriber in
//!   connection order on the emitting thread
//! - `SharedValue<T>` - Value readable by several widgets, read fresh on
//!   every access
//!
//! # Example
//!
//! ```
//! use powerbar_core::binding::Signal;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! let clicked = Signal::<i32>::new();
//! let last = Arc::new(AtomicI32::new(0));
//! let sink = Arc::clone(&last);
//! clicked.connect(move |v| sink.store(*v, Ordering::Relaxed));
//!
//! clicked.emit(&42);
//! assert_eq!(last.load(Ordering::Relaxed), 42);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

/// Type alias for subscriber callbacks.
type SubscriberFn<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Type alias for subscribers list.
type Subscribers<T> = Arc<RwLock<Vec<(SubscriptionId, SubscriberFn<T>)>>>;

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Handle returned by [`Signal::connect`], used to disconnect later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observer list for a widget notification.
///
/// Clones share the subscriber list. Subscribers must not connect to or
/// disconnect from the signal that is currently calling them.
pub struct Signal<T> {
    subscribers: Subscribers<T>,
}

impl<T> Signal<T> {
    /// Create a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a subscriber. It runs once per emit.
    pub fn connect<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.subscribers
            .write()
            .expect("Signal lock poisoned")
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was not connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().expect("Signal lock poisoned");
        let before = subscribers.len();
        subscribers.retain(|(sub, _)| *sub != id);
        subscribers.len() != before
    }

    /// Deliver `value` to every subscriber, in connection order.
    pub fn emit(&self, value: &T) {
        let subscribers = self.subscribers.read().expect("Signal lock poisoned");
        for (_, sub) in subscribers.iter() {
            sub(value);
        }
    }

    /// Number of connected subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("Signal lock poisoned").len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A value shared between an owner and its readers.
///
/// Clones point at the same value. Readers never cache; they see the latest
/// `set` on their next access.
pub struct SharedValue<T> {
    value: Arc<RwLock<T>>,
}

impl<T> SharedValue<T> {
    /// Wrap an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// Replace the value.
    pub fn set(&self, value: T) {
        *self.value.write().expect("SharedValue lock poisoned") = value;
    }

    /// Mutate the value in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value.write().expect("SharedValue lock poisoned"));
    }

    /// Borrow the value for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.value.read().expect("SharedValue lock poisoned")
    }
}

impl<T: Clone> SharedValue<T> {
    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: Default> Default for SharedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedValue").field(&*self.read()).finish()
    }
}
