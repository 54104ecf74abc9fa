//! Change listener types for observable values.
//!
//! A change listener is called synchronously with the new number every time
//! its value changes.

use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a change listener.
///
/// Returned on registration and used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Generate a new unique listener ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered change listener.
///
/// The callback is reference counted so the notifying value can take a
/// snapshot of its listeners and call them without holding a borrow.
#[derive(Clone)]
pub struct ChangeListener {
    id: ListenerId,
    notify: Rc<dyn Fn(f64)>,
}

impl ChangeListener {
    /// Create a new listener with the given callback.
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn(f64) + 'static,
    {
        Self {
            id: ListenerId::new(),
            notify: Rc::new(notify),
        }
    }

    /// Get the listener's unique ID.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Tell the listener about a new value.
    pub fn notify(&self, value: f64) {
        (self.notify)(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listener_ids_are_unique() {
        let id1 = ListenerId::new();
        let id2 = ListenerId::new();
        let id3 = ListenerId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn listener_notify_passes_value() {
        let seen = Rc::new(Cell::new(0.0));
        let seen_clone = seen.clone();

        let listener = ChangeListener::new(move |value| seen_clone.set(value));

        assert_eq!(seen.get(), 0.0);
        listener.notify(42.5);
        assert_eq!(seen.get(), 42.5);
    }
}
