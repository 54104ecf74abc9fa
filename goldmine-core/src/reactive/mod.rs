//! Reactive Primitives
//!
//! This module implements the observable values that hold every number in
//! the game, together with their listener, milestone and formatting
//! machinery.
//!
//! # Concepts
//!
//! ## Observable values
//!
//! An [`ObservableValue`] is a container for a non-negative, finite number.
//! Invalid assignments are dropped, so game state can never be poisoned by a
//! bad upstream computation.
//!
//! ## Change listeners
//!
//! Callbacks run synchronously with the new number whenever it changes.
//! They see the current number once on registration.
//!
//! ## Milestones
//!
//! One-shot callbacks that fire the first time a value's high-water mark
//! reaches a threshold. They drive achievement unlocks.
//!
//! # Implementation Notes
//!
//! Values are single-threaded (`Rc` + `Cell`/`RefCell`). Rendering is
//! deferred through [`crate::render::RenderScheduler`].

mod format;
mod listener;
mod milestone;
mod value;

pub use format::{commify, time_span, Formatter, TimeSpanStyle, INVALID_NUMBER, INVALID_TIME_SPAN};
pub use listener::{ChangeListener, ListenerId};
pub use milestone::MilestoneIndex;
pub use value::{is_valid_amount, ObservableValue};
