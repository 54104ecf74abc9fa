//! Render Scheduler
//!
//! The scheduler batches display writes to the end of a tick. Nodes that
//! change during game logic enqueue themselves; `flush` renders each of them
//! once, no matter how many times it changed.
//!
//! # Algorithm
//!
//! The queue is a singly-linked FIFO threaded through the nodes themselves
//! (see [`QueueLink`](super::QueueLink)):
//!
//! 1. `enqueue` checks the node's dirty flag. A dirty node is already queued
//!    and the call returns immediately.
//! 2. Otherwise the node is marked dirty and appended at the tail.
//! 3. `flush` detaches the head, renders it, then clears its dirty flag, and
//!    repeats until the queue is empty.
//!
//! Every operation except `flush` is O(1) and nothing is allocated per tick.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use super::node::DisplayNode;

struct QueueEnds {
    head: RefCell<Option<Rc<dyn DisplayNode>>>,
    tail: RefCell<Option<Rc<dyn DisplayNode>>>,
}

/// Handle to a render queue.
///
/// Cloning the handle shares the queue. Values take a handle at construction
/// and enqueue themselves on it; the game loop flushes it once per tick.
///
/// A queued value holds a handle to the queue that holds it, so call
/// [`clear`](Self::clear) or [`flush`](Self::flush) before dropping the last
/// owner of a non-empty queue.
#[derive(Clone)]
pub struct RenderScheduler {
    inner: Rc<QueueEnds>,
}

impl RenderScheduler {
    /// Create a new scheduler with an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(QueueEnds {
                head: RefCell::new(None),
                tail: RefCell::new(None),
            }),
        }
    }

    /// Queue a node to be rendered on the next flush.
    ///
    /// Does nothing if the node is already queued.
    pub fn enqueue(&self, node: Rc<dyn DisplayNode>) {
        let link = node.queue_link();
        if link.is_dirty() {
            return;
        }
        link.set_dirty(true);
        link.set_next(None);
        trace!(node = %node.node_id(), "queued for render");

        let mut tail = self.inner.tail.borrow_mut();
        match tail.take() {
            None => *self.inner.head.borrow_mut() = Some(Rc::clone(&node)),
            Some(last) => last.queue_link().set_next(Some(Rc::clone(&node))),
        }
        *tail = Some(node);
    }

    /// Render every queued node and empty the queue.
    ///
    /// A node enqueued while the flush is running is rendered by the same
    /// flush. Returns the number of renders performed.
    pub fn flush(&self) -> usize {
        let mut rendered = 0;
        while let Some(node) = self.pop_front() {
            node.render();
            node.queue_link().set_dirty(false);
            rendered += 1;
        }
        if rendered > 0 {
            debug!(rendered, "flushed render queue");
        }
        rendered
    }

    /// Drop every queued node without rendering it.
    pub fn clear(&self) {
        while let Some(node) = self.pop_front() {
            node.queue_link().set_dirty(false);
        }
    }

    /// Check whether anything is queued.
    pub fn is_empty(&self) -> bool {
        self.inner.head.borrow().is_none()
    }

    /// Count queued nodes. Walks the list.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.inner.head.borrow().clone();
        while let Some(node) = cursor {
            count += 1;
            cursor = node.queue_link().peek_next();
        }
        count
    }

    fn pop_front(&self) -> Option<Rc<dyn DisplayNode>> {
        let mut head = self.inner.head.borrow_mut();
        let node = head.take()?;
        *head = node.queue_link().take_next();
        if head.is_none() {
            *self.inner.tail.borrow_mut() = None;
        }
        Some(node)
    }
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("queued", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::node::{NodeId, QueueLink};
    use std::cell::{Cell, RefCell};

    struct CountingNode {
        id: NodeId,
        link: QueueLink,
        renders: Cell<usize>,
        log: Rc<RefCell<Vec<NodeId>>>,
    }

    impl CountingNode {
        fn new(log: &Rc<RefCell<Vec<NodeId>>>) -> Rc<Self> {
            Rc::new(Self {
                id: NodeId::new(),
                link: QueueLink::new(),
                renders: Cell::new(0),
                log: Rc::clone(log),
            })
        }
    }

    impl DisplayNode for CountingNode {
        fn node_id(&self) -> NodeId {
            self.id
        }

        fn queue_link(&self) -> &QueueLink {
            &self.link
        }

        fn render(&self) {
            self.renders.set(self.renders.get() + 1);
            self.log.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn enqueue_marks_dirty_and_flush_clears() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let node = CountingNode::new(&log);

        scheduler.enqueue(node.clone());
        assert!(node.link.is_dirty());
        assert_eq!(scheduler.len(), 1);

        assert_eq!(scheduler.flush(), 1);
        assert!(!node.link.is_dirty());
        assert!(scheduler.is_empty());
        assert_eq!(node.renders.get(), 1);
    }

    #[test]
    fn double_enqueue_renders_once() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let node = CountingNode::new(&log);

        scheduler.enqueue(node.clone());
        scheduler.enqueue(node.clone());
        scheduler.enqueue(node.clone());
        assert_eq!(scheduler.len(), 1);

        scheduler.flush();
        assert_eq!(node.renders.get(), 1);
    }

    #[test]
    fn flush_renders_in_fifo_order() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = CountingNode::new(&log);
        let b = CountingNode::new(&log);
        let c = CountingNode::new(&log);

        scheduler.enqueue(b.clone());
        scheduler.enqueue(a.clone());
        scheduler.enqueue(c.clone());
        scheduler.enqueue(b.clone());

        assert_eq!(scheduler.flush(), 3);
        assert_eq!(*log.borrow(), vec![b.id, a.id, c.id]);
    }

    #[test]
    fn node_can_requeue_after_flush() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let node = CountingNode::new(&log);

        scheduler.enqueue(node.clone());
        scheduler.flush();
        scheduler.enqueue(node.clone());
        scheduler.flush();

        assert_eq!(node.renders.get(), 2);
        assert_eq!(scheduler.flush(), 0);
    }

    #[test]
    fn clear_drops_without_rendering() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = CountingNode::new(&log);
        let b = CountingNode::new(&log);

        scheduler.enqueue(a.clone());
        scheduler.enqueue(b.clone());
        scheduler.clear();

        assert!(scheduler.is_empty());
        assert!(!a.link.is_dirty());
        assert!(!b.link.is_dirty());
        assert!(log.borrow().is_empty());
    }

    struct ChainingNode {
        id: NodeId,
        link: QueueLink,
        scheduler: RenderScheduler,
        follower: RefCell<Option<Rc<dyn DisplayNode>>>,
        renders: Cell<usize>,
    }

    impl DisplayNode for ChainingNode {
        fn node_id(&self) -> NodeId {
            self.id
        }

        fn queue_link(&self) -> &QueueLink {
            &self.link
        }

        fn render(&self) {
            self.renders.set(self.renders.get() + 1);
            if let Some(next) = self.follower.borrow_mut().take() {
                self.scheduler.enqueue(next);
            }
        }
    }

    #[test]
    fn nodes_queued_during_flush_render_in_same_flush() {
        let scheduler = RenderScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let follower = CountingNode::new(&log);
        let queued_follower: Rc<dyn DisplayNode> = follower.clone();
        let leader = Rc::new(ChainingNode {
            id: NodeId::new(),
            link: QueueLink::new(),
            scheduler: scheduler.clone(),
            follower: RefCell::new(Some(queued_follower)),
            renders: Cell::new(0),
        });

        scheduler.enqueue(leader.clone());
        assert_eq!(scheduler.flush(), 2);
        assert_eq!(leader.renders.get(), 1);
        assert_eq!(follower.renders.get(), 1);
        assert!(scheduler.is_empty());
    }
}
