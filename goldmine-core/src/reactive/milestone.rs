//! Milestone Index
//!
//! Pending one-shot "threshold reached" callbacks for a single value.
//!
//! Entries are kept sorted by threshold, largest first, so the next
//! milestone to fire is always the last element. Checking a new high-water
//! mark only ever looks at the tail and stops at the first entry that is
//! still out of reach.

use std::fmt;

/// A one-shot callback waiting for a value to reach `threshold`.
pub(crate) struct Milestone {
    threshold: f64,
    callback: Box<dyn FnOnce()>,
}

/// Thresholds sorted descending, with their callbacks.
#[derive(Default)]
pub struct MilestoneIndex {
    entries: Vec<Milestone>,
}

impl MilestoneIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a milestone, keeping the descending order.
    ///
    /// Equal thresholds fire in the order they were inserted, so a new entry
    /// goes in front of (further from the tail than) existing equal ones.
    /// A linear scan is enough for the handful of milestones a value has.
    pub fn insert<F>(&mut self, threshold: f64, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let at = self
            .entries
            .iter()
            .position(|entry| threshold >= entry.threshold)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            at,
            Milestone {
                threshold,
                callback: Box::new(callback),
            },
        );
    }

    /// Remove and return the callback of the smallest pending milestone if
    /// `value` has reached it.
    ///
    /// The entry is gone from the index before the caller gets to run it.
    pub fn pop_reached(&mut self, value: f64) -> Option<Box<dyn FnOnce()>> {
        match self.entries.last() {
            Some(entry) if entry.threshold <= value => {
                self.entries.pop().map(|entry| entry.callback)
            }
            _ => None,
        }
    }

    /// The smallest threshold still pending.
    pub fn next_threshold(&self) -> Option<f64> {
        self.entries.last().map(|entry| entry.threshold)
    }

    /// Number of pending milestones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no milestones are pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending thresholds, largest first.
    pub fn thresholds(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|entry| entry.threshold)
    }
}

impl fmt::Debug for MilestoneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.thresholds()).finish()
    }
}
