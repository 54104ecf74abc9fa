//! Observable Value Implementation
//!
//! An observable value is the game's unit of state: a non-negative, finite
//! number that tells the rest of the game when it changes.
//!
//! # How Values Work
//!
//! 1. `set` validates the new number. Negative, NaN and infinite numbers are
//!    dropped without a signal, as is a number equal to the current one.
//!
//! 2. Change listeners are called synchronously, in registration order,
//!    with the new number.
//!
//! 3. If the number is a new maximum, every milestone it reached is removed
//!    from the index and then called, smallest threshold first.
//!
//! 4. The value enqueues itself on its [`RenderScheduler`]. At the end of the
//!    tick the scheduler calls `render`, which writes the formatted text into
//!    every attached surface.
//!
//! # Reentrancy
//!
//! Listeners and milestone callbacks may set this value or any other, add
//! listeners, or register milestones. No interior borrow is held while
//! caller code runs.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug};
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{trace, warn};

use super::format::Formatter;
use super::listener::{ChangeListener, ListenerId};
use super::milestone::MilestoneIndex;
use crate::render::{DisplayNode, NodeId, QueueLink, RenderScheduler, RenderSurface};

type Surfaces = SmallVec<[Rc<dyn RenderSurface>; 2]>;

/// Check whether a number may be stored in an observable value.
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

struct ValueCell {
    id: NodeId,
    current: Cell<f64>,
    high_water_mark: Cell<f64>,
    listeners: RefCell<Vec<ChangeListener>>,
    milestones: RefCell<MilestoneIndex>,
    surfaces: RefCell<Surfaces>,
    formatter: RefCell<Formatter>,
    last_rendered: RefCell<Option<String>>,
    link: QueueLink,
    scheduler: RenderScheduler,
}

impl ValueCell {
    fn format(&self) -> String {
        let formatter = self.formatter.borrow().clone();
        formatter.format(self.current.get())
    }
}

impl DisplayNode for ValueCell {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn queue_link(&self) -> &QueueLink {
        &self.link
    }

    fn render(&self) {
        let text = self.format();
        if self.last_rendered.borrow().as_deref() == Some(text.as_str()) {
            return;
        }

        let surfaces = self.surfaces.borrow().clone();
        for surface in &surfaces {
            surface.set_text(&text);
        }
        *self.last_rendered.borrow_mut() = Some(text);
    }
}

/// A numeric game value with change notification, milestones and deferred
/// rendering.
///
/// Cloning the handle shares the value.
///
/// # Example
///
/// ```rust,ignore
/// let scheduler = RenderScheduler::new();
/// let gold = ObservableValue::new(0.0, &scheduler);
///
/// gold.when_reached(1000.0, || println!("Gold Digger unlocked"));
/// gold.set(1500.0);      // prints once
/// gold.set(-3.0);        // ignored
/// scheduler.flush();     // attached surfaces now show "1,500"
/// ```
#[derive(Clone)]
pub struct ObservableValue {
    inner: Rc<ValueCell>,
}

impl ObservableValue {
    /// Create a value using the default comma-grouping formatter.
    pub fn new(initial: f64, scheduler: &RenderScheduler) -> Self {
        Self::with_formatter(initial, Formatter::default(), scheduler)
    }

    /// Create a value with a specific formatter.
    ///
    /// An invalid initial number is replaced by zero.
    pub fn with_formatter(initial: f64, formatter: Formatter, scheduler: &RenderScheduler) -> Self {
        let initial = if is_valid_amount(initial) {
            initial + 0.0
        } else {
            warn!(initial, "invalid initial value replaced with 0");
            0.0
        };

        Self {
            inner: Rc::new(ValueCell {
                id: NodeId::new(),
                current: Cell::new(initial),
                high_water_mark: Cell::new(initial),
                listeners: RefCell::new(Vec::new()),
                milestones: RefCell::new(MilestoneIndex::new()),
                surfaces: RefCell::new(SmallVec::new()),
                formatter: RefCell::new(formatter),
                last_rendered: RefCell::new(None),
                link: QueueLink::new(),
                scheduler: scheduler.clone(),
            }),
        }
    }

    /// Get the value's unique ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Get the current number.
    pub fn get(&self) -> f64 {
        self.inner.current.get()
    }

    /// The largest number this value has ever held.
    pub fn high_water_mark(&self) -> f64 {
        self.inner.high_water_mark.get()
    }

    /// Store a new number.
    ///
    /// Negative, NaN and infinite numbers are ignored, as is the current
    /// number. Otherwise listeners fire, reached milestones fire, and the
    /// value is queued for render.
    pub fn set(&self, value: f64) {
        if !is_valid_amount(value) {
            trace!(value = %self.inner.id, rejected = value, "invalid assignment dropped");
            return;
        }
        // Folds -0.0 into 0.0.
        let value = value + 0.0;
        let cell = &self.inner;
        if cell.current.get() == value {
            return;
        }

        cell.current.set(value);
        let new_peak = value > cell.high_water_mark.get();
        if new_peak {
            cell.high_water_mark.set(value);
        }

        self.notify_listeners(value);
        if new_peak {
            self.fire_reached(value);
        }

        cell.scheduler.enqueue(Rc::clone(&self.inner) as Rc<dyn DisplayNode>);
    }

    /// Replace the number using a function of the current one.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(f64) -> f64,
    {
        self.set(f(self.get()));
    }

    /// Register a change listener.
    ///
    /// The listener is called right away with the current number, then on
    /// every change.
    pub fn add_change_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(f64) + 'static,
    {
        let listener = ChangeListener::new(listener);
        listener.notify(self.get());

        let id = listener.id();
        self.inner.listeners.borrow_mut().push(listener);
        id
    }

    /// Remove a change listener. Returns whether it was registered.
    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|listener| listener.id() != id);
        listeners.len() != before
    }

    /// Get the number of change listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Call `callback` once, the first time this value reaches `threshold`.
    ///
    /// If the value has already been at or above `threshold` at any point,
    /// the callback runs immediately. A NaN threshold can never be reached
    /// and is dropped.
    pub fn when_reached<F>(&self, threshold: f64, callback: F)
    where
        F: FnOnce() + 'static,
    {
        if threshold.is_nan() {
            warn!(value = %self.inner.id, "milestone with NaN threshold dropped");
            return;
        }
        if self.high_water_mark() >= threshold {
            callback();
            return;
        }
        self.inner.milestones.borrow_mut().insert(threshold, callback);
    }

    /// Number of milestones still waiting to fire.
    pub fn pending_milestones(&self) -> usize {
        self.inner.milestones.borrow().len()
    }

    /// Attach a surface and write the current text into it.
    ///
    /// Returns `false` if the same surface handle is already attached.
    pub fn attach_surface(&self, surface: Rc<dyn RenderSurface>) -> bool {
        {
            let surfaces = self.inner.surfaces.borrow();
            if surfaces
                .iter()
                .any(|attached| std::ptr::addr_eq(Rc::as_ptr(attached), Rc::as_ptr(&surface)))
            {
                return false;
            }
        }

        surface.set_text(&self.format());
        self.inner.surfaces.borrow_mut().push(surface);
        true
    }

    /// Get the number of attached surfaces.
    pub fn surface_count(&self) -> usize {
        self.inner.surfaces.borrow().len()
    }

    /// Replace the formatter and queue a render so surfaces pick it up.
    pub fn set_formatter(&self, formatter: Formatter) {
        *self.inner.formatter.borrow_mut() = formatter;
        self.inner
            .scheduler
            .enqueue(Rc::clone(&self.inner) as Rc<dyn DisplayNode>);
    }

    /// Format the current number with this value's formatter.
    pub fn format(&self) -> String {
        self.inner.format()
    }

    /// Format an arbitrary number with this value's formatter.
    pub fn format_amount(&self, amount: f64) -> String {
        let formatter = self.inner.formatter.borrow().clone();
        formatter.format(amount)
    }

    /// Check whether the value is queued for render.
    pub fn is_dirty(&self) -> bool {
        self.inner.link.is_dirty()
    }

    /// Check whether two handles refer to the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify_listeners(&self, value: f64) {
        let listeners: SmallVec<[ChangeListener; 4]> =
            self.inner.listeners.borrow().iter().cloned().collect();
        for listener in &listeners {
            listener.notify(value);
        }
    }

    fn fire_reached(&self, value: f64) {
        loop {
            // The index borrow must end before the callback runs.
            let reached = self.inner.milestones.borrow_mut().pop_reached(value);
            match reached {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

impl Debug for ObservableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableValue")
            .field("id", &self.inner.id)
            .field("value", &self.get())
            .field("high_water_mark", &self.high_water_mark())
            .field("listener_count", &self.listener_count())
            .field("pending_milestones", &self.pending_milestones())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
