//! Goldmine Core
//!
//! This crate provides the reactive state and render core of the Idle Gold
//! Digger game. It implements:
//!
//! - Observable values with change listeners and threshold milestones
//! - A render queue that batches surface writes to the end of a tick
//! - Dotted-path bindings from view surfaces to game state
//! - Persistence of game state as a single JSON save
//! - The game itself: economy, achievements and the tick loop
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: Observable values, listeners, milestones and formatters
//! - `render`: The intrusive render queue and the surfaces it writes to
//! - `binding`: Path resolution and projections over several values
//! - `storage`: Key-value stores and the save device
//! - `game`: Game rules and the loop that drives them
//! - `config`: Session settings
//!
//! Everything runs on one thread. The render queue is passed explicitly to
//! every value that renders, so tests can build as many as they need.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use goldmine_core::reactive::ObservableValue;
//! use goldmine_core::render::{RenderScheduler, TextSurface};
//!
//! let scheduler = RenderScheduler::new();
//! let gold = ObservableValue::new(0.0, &scheduler);
//! let label = TextSurface::new();
//! gold.attach_surface(Rc::new(label.clone()));
//!
//! gold.when_reached(1000.0, || println!("Gold Digger unlocked"));
//!
//! gold.set(1234.5);
//! // Prints "Gold Digger unlocked"; the label still shows "0"
//! scheduler.flush();
//! assert_eq!(label.text(), "1,234.5");
//! ```

pub mod binding;
pub mod config;
pub mod game;
pub mod reactive;
pub mod render;
pub mod storage;
