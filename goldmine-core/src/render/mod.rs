//! Deferred Rendering
//!
//! Display writes are batched to the end of each tick. Anything that wants
//! to update the screen implements [`DisplayNode`] and enqueues itself on a
//! [`RenderScheduler`]; the game loop flushes the scheduler once per tick.
//!
//! # Design Decisions
//!
//! 1. The queue is intrusive: each node carries its own dirty flag and next
//!    pointer, so membership tests and enqueue are O(1) and a tick allocates
//!    nothing.
//!
//! 2. A node renders at most once per flush regardless of how many times it
//!    was enqueued.
//!
//! 3. The scheduler is an explicit handle rather than ambient global state,
//!    so tests and independent sessions get their own queues.

mod button;
mod node;
mod scheduler;
mod surface;

pub use button::{ToggleButton, BUTTON_COLOR_PROPERTY};
pub use node::{DisplayNode, NodeId, QueueLink};
pub use scheduler::RenderScheduler;
pub use surface::{RenderSurface, TextSurface};
