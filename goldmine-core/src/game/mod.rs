//! Idle Gold Digger
//!
//! The game built on the reactive core: the economy, achievements, the
//! shared tooltip, and the loop that ties them to the render queue and the
//! save file.

mod achievements;
mod economy;
mod game_loop;
mod tooltip;

pub use achievements::{Achievement, AchievementTracker, THRESHOLD_PLACEHOLDER};
pub use economy::{Game, Upgrade, UpgradeKind, AFFORDABLE_COLOR, UNAFFORDABLE_COLOR};
pub use game_loop::GameLoop;
pub use tooltip::Tooltip;

use thiserror::Error;

use crate::binding::BindingError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Failures while setting up a game session.
#[derive(Debug, Error)]
pub enum GameError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Save data could not be read or bound.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A view binding failed.
    #[error(transparent)]
    Binding(#[from] BindingError),
}
