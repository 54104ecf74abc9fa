//! Projection Implementation
//!
//! A Projection derives UI state from one or more observable values, such as
//! whether an upgrade button is affordable.
//!
//! # How Projections Work
//!
//! 1. When created, the projection subscribes to each source and runs its
//!    function once.
//!
//! 2. Whenever any source changes, the function runs again, synchronously.
//!
//! 3. Disposing (or dropping) the projection unsubscribes it from every
//!    source.
//!
//! The function usually pushes its result into a display node such as a
//! [`ToggleButton`](crate::render::ToggleButton), which takes care of
//! deferring the actual display write.

use std::cell::Cell;
use std::rc::Rc;

use crate::reactive::{ListenerId, ObservableValue};

struct ProjectionState {
    run: Box<dyn Fn()>,
    armed: Cell<bool>,
    disposed: Cell<bool>,
    run_count: Cell<usize>,
}

impl ProjectionState {
    fn execute(&self) {
        if self.disposed.get() || !self.armed.get() {
            return;
        }
        (self.run)();
        self.run_count.set(self.run_count.get() + 1);
    }
}

/// A derived computation that re-runs whenever a source value changes.
///
/// # Example
///
/// ```rust,ignore
/// let button = ToggleButton::new(surface, "#33cc33", "#ee2222", &scheduler);
/// let affordable = Projection::new(&[gold.clone(), price.clone()], move || {
///     button.set_state(gold.get() >= price.get());
/// });
/// ```
pub struct Projection {
    state: Rc<ProjectionState>,
    subscriptions: Vec<(ObservableValue, ListenerId)>,
}

impl Projection {
    /// Subscribe to `sources` and run `run` once.
    pub fn new<F>(sources: &[ObservableValue], run: F) -> Self
    where
        F: Fn() + 'static,
    {
        let state = Rc::new(ProjectionState {
            run: Box::new(run),
            armed: Cell::new(false),
            disposed: Cell::new(false),
            run_count: Cell::new(0),
        });

        // Listeners fire on registration; stay disarmed so setup runs once.
        let subscriptions: Vec<_> = sources
            .iter()
            .map(|source| {
                let state = Rc::clone(&state);
                let id = source.add_change_listener(move |_| state.execute());
                (source.clone(), id)
            })
            .collect();

        state.armed.set(true);
        state.execute();

        Self {
            state,
            subscriptions,
        }
    }

    /// Run the function again now.
    pub fn refresh(&self) {
        self.state.execute();
    }

    /// Stop reacting to the sources.
    pub fn dispose(&mut self) {
        self.state.disposed.set(true);
        for (source, id) in self.subscriptions.drain(..) {
            source.remove_change_listener(id);
        }
    }

    /// Check if the projection has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.state.disposed.get()
    }

    /// Get the number of times the function has run.
    pub fn run_count(&self) -> usize {
        self.state.run_count.get()
    }

    /// Get the number of sources still subscribed.
    pub fn source_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Drop for Projection {
    fn drop(&mut self) {
        self.dispose();
    }
}
