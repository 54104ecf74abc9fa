//! Achievements unlocked when a game value first reaches a threshold.

use std::cell::Cell;
use std::rc::Rc;

use tracing::info;

use super::economy::Game;
use crate::binding::BindingRoot;
use crate::reactive::ObservableValue;
use crate::render::RenderScheduler;

/// Placeholder in a description template replaced by the formatted
/// threshold.
pub const THRESHOLD_PLACEHOLDER: &str = "{$}";

/// One achievement and its unlock state.
#[derive(Debug)]
pub struct Achievement {
    name: String,
    icon: String,
    description: String,
    threshold: f64,
    source: ObservableValue,
    unlocked: Rc<Cell<bool>>,
}

impl Achievement {
    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Icon file name.
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Description with the threshold filled in.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Value the source has to reach.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Check whether the achievement has been unlocked.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked.get()
    }

    /// `"Unlocked"`, or progress toward the threshold.
    pub fn progress_text(&self) -> String {
        if self.is_unlocked() {
            "Unlocked".to_string()
        } else {
            format!(
                "Progress: {} / {}",
                self.source.format(),
                self.source.format_amount(self.threshold)
            )
        }
    }

    /// Multi-line tooltip: name, description and progress.
    pub fn tooltip_text(&self) -> String {
        format!("{}\n{}\n{}", self.name, self.description, self.progress_text())
    }
}

/// Owns every achievement and counts unlocks.
#[derive(Debug)]
pub struct AchievementTracker {
    achievements: Vec<Rc<Achievement>>,
    total_unlocked: ObservableValue,
    total_achievements: ObservableValue,
}

impl AchievementTracker {
    /// Create an empty tracker.
    pub fn new(scheduler: &RenderScheduler) -> Self {
        Self {
            achievements: Vec::new(),
            total_unlocked: ObservableValue::new(0.0, scheduler),
            total_achievements: ObservableValue::new(0.0, scheduler),
        }
    }

    /// Create a tracker holding the standard achievements for `game`.
    pub fn with_defaults(game: &Game, scheduler: &RenderScheduler) -> Self {
        let mut tracker = Self::new(scheduler);
        tracker.create("Gold Digger", "gold_coin.png", game.gold(), 1000.0, "Earn {$} gold.");
        tracker.create(
            "Alchemist's Bane",
            "transmute.png",
            game.gold(),
            1e6,
            "Earn {$} gold.",
        );
        tracker.create(
            "Longevity",
            "longevity.png",
            game.total_time_played(),
            5.0 * 3600.0 * 1000.0,
            "Play for {$}.",
        );
        tracker
    }

    /// Add an achievement that unlocks when `source` first reaches
    /// `threshold`. Unlocks immediately if it already has.
    pub fn create(
        &mut self,
        name: &str,
        icon: &str,
        source: &ObservableValue,
        threshold: f64,
        description: &str,
    ) -> Rc<Achievement> {
        let achievement = Rc::new(Achievement {
            name: name.to_string(),
            icon: icon.to_string(),
            description: description
                .replace(THRESHOLD_PLACEHOLDER, &source.format_amount(threshold)),
            threshold,
            source: source.clone(),
            unlocked: Rc::new(Cell::new(false)),
        });

        let unlocked = Rc::clone(&achievement.unlocked);
        let total_unlocked = self.total_unlocked.clone();
        let name = achievement.name.clone();
        source.when_reached(threshold, move || {
            unlocked.set(true);
            info!(achievement = name.as_str(), "achievement unlocked");
            total_unlocked.update(|total| total + 1.0);
        });

        self.total_achievements.update(|total| total + 1.0);
        self.achievements.push(Rc::clone(&achievement));
        achievement
    }

    /// Every achievement, in creation order.
    pub fn achievements(&self) -> &[Rc<Achievement>] {
        &self.achievements
    }

    /// Look an achievement up by name.
    pub fn find(&self, name: &str) -> Option<&Rc<Achievement>> {
        self.achievements.iter().find(|a| a.name == name)
    }

    /// Number of unlocked achievements.
    pub fn total_unlocked(&self) -> &ObservableValue {
        &self.total_unlocked
    }

    /// Number of achievements.
    pub fn total_achievements(&self) -> &ObservableValue {
        &self.total_achievements
    }
}

impl BindingRoot for AchievementTracker {
    fn exposed_values(&self) -> Vec<(&'static str, ObservableValue)> {
        vec![
            ("total_unlocked", self.total_unlocked.clone()),
            ("total_achievements", self.total_achievements.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageDevice};

    fn setup() -> (Game, AchievementTracker) {
        let scheduler = RenderScheduler::new();
        let mut storage = StorageDevice::open(MemoryStore::new(), "idg_save_data").unwrap();
        let game = Game::new(&scheduler, &mut storage).unwrap();
        let tracker = AchievementTracker::with_defaults(&game, &scheduler);
        (game, tracker)
    }

    #[test]
    fn defaults_start_locked() {
        let (_game, tracker) = setup();
        assert_eq!(tracker.total_achievements().get(), 3.0);
        assert_eq!(tracker.total_unlocked().get(), 0.0);
        assert!(tracker.achievements().iter().all(|a| !a.is_unlocked()));
    }

    #[test]
    fn descriptions_use_source_formatter() {
        let (_game, tracker) = setup();
        assert_eq!(tracker.find("Gold Digger").unwrap().description(), "Earn 1,000 gold.");
        assert_eq!(
            tracker.find("Alchemist's Bane").unwrap().description(),
            "Earn 1,000,000 gold."
        );
        assert_eq!(tracker.find("Longevity").unwrap().description(), "Play for 05:00:00.");
    }

    #[test]
    fn unlocks_once_when_threshold_reached() {
        let (game, tracker) = setup();
        let digger = tracker.find("Gold Digger").unwrap().clone();

        game.gold().set(999.0);
        assert!(!digger.is_unlocked());
        assert_eq!(digger.progress_text(), "Progress: 999 / 1,000");

        game.gold().set(1000.0);
        assert!(digger.is_unlocked());
        assert_eq!(tracker.total_unlocked().get(), 1.0);

        game.gold().set(0.0);
        game.gold().set(5000.0);
        assert_eq!(tracker.total_unlocked().get(), 1.0);
        assert_eq!(digger.progress_text(), "Unlocked");
    }

    #[test]
    fn already_reached_unlocks_on_creation() {
        let (game, mut tracker) = setup();
        game.total_clicks().set(50.0);

        let clicker = tracker.create("Clicker", "click.png", game.total_clicks(), 10.0, "Click {$} times.");
        assert!(clicker.is_unlocked());
        assert_eq!(tracker.total_unlocked().get(), 1.0);
        assert_eq!(tracker.total_achievements().get(), 4.0);
    }

    #[test]
    fn tooltip_lists_name_description_progress() {
        let (_game, tracker) = setup();
        let longevity = tracker.find("Longevity").unwrap();
        assert_eq!(
            longevity.tooltip_text(),
            "Longevity\nPlay for 05:00:00.\nProgress: 00:00:00 / 05:00:00"
        );
    }
}
