//! Display Nodes
//!
//! This module defines the renderable nodes that live in the render queue,
//! and the intrusive link each of them carries.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a display node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A renderable object that can be queued on a [`RenderScheduler`] to be
/// rendered at the end of the current tick.
///
/// [`RenderScheduler`]: super::RenderScheduler
pub trait DisplayNode {
    /// The node's identifier, used for diagnostics.
    fn node_id(&self) -> NodeId;

    /// The intrusive link used by the scheduler.
    fn queue_link(&self) -> &QueueLink;

    /// Push the node's current state to its surfaces.
    fn render(&self);
}

/// Intrusive queue membership for a [`DisplayNode`].
///
/// `dirty` is true exactly while the node is reachable from the scheduler's
/// head. `next` points at the following queued node and is only meaningful
/// while `dirty` is set.
#[derive(Default)]
pub struct QueueLink {
    dirty: Cell<bool>,
    next: RefCell<Option<Rc<dyn DisplayNode>>>,
}

impl QueueLink {
    /// Create an unlinked, clean queue link.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the owning node is currently queued for render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub(crate) fn set_dirty(&self, dirty: bool) {
        self.dirty.set(dirty);
    }

    pub(crate) fn set_next(&self, next: Option<Rc<dyn DisplayNode>>) {
        *self.next.borrow_mut() = next;
    }

    pub(crate) fn peek_next(&self) -> Option<Rc<dyn DisplayNode>> {
        self.next.borrow().clone()
    }

    pub(crate) fn take_next(&self) -> Option<Rc<dyn DisplayNode>> {
        self.next.borrow_mut().take()
    }
}

impl fmt::Debug for QueueLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueLink")
            .field("dirty", &self.dirty.get())
            .field("next", &self.next.borrow().as_ref().map(|n| n.node_id()))
            .finish()
    }
}
