//! Game Loop
//!
//! Each tick runs the game logic, autosaves and refreshes the tooltip on
//! their own cadences, then flushes the render queue. All of it happens on
//! one thread; a tick never yields halfway.

use std::rc::Rc;

use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use super::achievements::{Achievement, AchievementTracker};
use super::economy::Game;
use super::tooltip::Tooltip;
use super::GameError;
use crate::binding::ViewRegistry;
use crate::config::GameConfig;
use crate::render::RenderScheduler;
use crate::storage::{KeyValueStore, StorageDevice, StorageError};

/// A running game session.
pub struct GameLoop<S: KeyValueStore> {
    config: GameConfig,
    scheduler: RenderScheduler,
    storage: StorageDevice<S>,
    game: Game,
    achievements: AchievementTracker,
    tooltip: Option<Tooltip>,
    autosave_timer: f64,
    tooltip_timer: f64,
    ticks: u64,
}

impl<S: KeyValueStore> GameLoop<S> {
    /// Load the previous session from `store` and build the game.
    pub fn new(config: GameConfig, store: S) -> Result<Self, GameError> {
        config.validate()?;
        let scheduler = RenderScheduler::new();
        let mut storage = StorageDevice::open(store, &config.storage_key)?;
        let game = Game::new(&scheduler, &mut storage)?;
        let achievements = AchievementTracker::with_defaults(&game, &scheduler);

        Ok(Self {
            config,
            scheduler,
            storage,
            game,
            achievements,
            tooltip: None,
            autosave_timer: 0.0,
            tooltip_timer: 0.0,
            ticks: 0,
        })
    }

    /// A registry exposing `game.*` and `achievements.*` paths.
    pub fn view_registry(&self) -> Result<ViewRegistry, GameError> {
        let mut registry = ViewRegistry::new();
        registry.define("game", &self.game)?;
        registry.define("achievements", &self.achievements)?;
        Ok(registry)
    }

    /// Use `tooltip` for hover text refreshed by the loop.
    pub fn set_tooltip(&mut self, tooltip: Tooltip) {
        self.tooltip = Some(tooltip);
    }

    /// Show an achievement's live tooltip.
    pub fn hover_achievement(&self, achievement: &Rc<Achievement>) {
        if let Some(tooltip) = &self.tooltip {
            let achievement = Rc::clone(achievement);
            tooltip.show_dynamic(move || achievement.tooltip_text());
        }
    }

    /// Run one tick covering `elapsed_ms` milliseconds.
    ///
    /// Returns the number of nodes rendered. The render queue is flushed
    /// even when the autosave fails; the save error is returned afterwards.
    pub fn tick(&mut self, elapsed_ms: f64) -> Result<usize, StorageError> {
        self.game.update(elapsed_ms);
        self.ticks += 1;

        self.autosave_timer += elapsed_ms;
        let saved = if self.autosave_timer >= self.config.autosave_interval_ms as f64 {
            self.autosave_timer = 0.0;
            self.storage.save()
        } else {
            Ok(())
        };

        self.tooltip_timer += elapsed_ms;
        if self.tooltip_timer >= self.config.tooltip_refresh_ms as f64 {
            self.tooltip_timer = 0.0;
            if let Some(tooltip) = &self.tooltip {
                tooltip.refresh();
            }
        }

        let rendered = self.scheduler.flush();
        trace!(tick = self.ticks, elapsed_ms, rendered, "tick complete");
        saved.map(|()| rendered)
    }

    /// Drive ticks from a timer at the configured rate.
    ///
    /// Runs `max_ticks` ticks, or forever when `None`. The future is not
    /// `Send`; run it on a current-thread runtime or a `LocalSet`. A failed
    /// autosave is logged and the loop keeps going.
    pub async fn run(&mut self, max_ticks: Option<u64>) {
        let mut interval = time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(tick_rate_hz = self.config.tick_rate_hz, "game loop started");

        let mut last_tick = Instant::now();
        let mut remaining = max_ticks;
        while remaining != Some(0) {
            interval.tick().await;
            let now = Instant::now();
            let elapsed = now.duration_since(last_tick);
            last_tick = now;

            if let Err(err) = self.tick(elapsed.as_secs_f64() * 1000.0) {
                warn!(tick = self.ticks, error = %err, "autosave failed");
            }
            if let Some(left) = remaining.as_mut() {
                *left -= 1;
            }
        }

        debug!(ticks = self.ticks, "game loop stopped");
    }

    /// Save immediately.
    pub fn save(&self) -> Result<(), StorageError> {
        self.storage.save()
    }

    /// The game state.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable game state, for attaching buttons.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// The achievements.
    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    /// The storage device.
    pub fn storage(&self) -> &StorageDevice<S> {
        &self.storage
    }

    /// The render queue flushed at the end of each tick.
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl<S: KeyValueStore> Drop for GameLoop<S> {
    fn drop(&mut self) {
        // Queued nodes hold the scheduler that holds them.
        self.scheduler.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderSurface, TextSurface};
    use crate::storage::MemoryStore;
    use std::io;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&self, key: &str, _data: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn session(store: MemoryStore) -> GameLoop<MemoryStore> {
        GameLoop::new(GameConfig::default(), store).unwrap()
    }

    #[test]
    fn tick_updates_then_flushes() {
        let mut session = session(MemoryStore::new());
        let label = TextSurface::new();
        session
            .view_registry()
            .unwrap()
            .attach("game.total_time_played", Rc::new(label.clone()))
            .unwrap();
        assert_eq!(label.text(), "00:00:00");

        session.tick(1000.0).unwrap();
        assert_eq!(label.text(), "00:00:01");
        assert!(session.scheduler().is_empty());
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn autosaves_on_interval() {
        let store = MemoryStore::new();
        let mut session = session(store.clone());

        session.tick(6000.0).unwrap();
        assert!(store.get("idg_save_data").is_none());

        session.tick(1000.0).unwrap();
        let blob = store.get("idg_save_data").unwrap();
        assert!(blob.contains("\"tt\":7000.0"));
    }

    #[test]
    fn tooltip_refreshes_on_interval() {
        let mut session = session(MemoryStore::new());
        let surface = TextSurface::new();
        session.set_tooltip(Tooltip::new(Rc::new(surface.clone()) as Rc<dyn RenderSurface>));

        let digger = session.achievements().find("Gold Digger").unwrap().clone();
        session.hover_achievement(&digger);
        assert!(surface.text().ends_with("Progress: 0 / 1,000"));

        session.game().gold().set(400.0);
        session.tick(250.0).unwrap();
        assert!(surface.text().ends_with("Progress: 0 / 1,000"));

        session.tick(250.0).unwrap();
        assert!(surface.text().ends_with("Progress: 400.5 / 1,000"));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let config = GameConfig {
            tick_rate_hz: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameLoop::new(config, MemoryStore::new()),
            Err(GameError::Config(_))
        ));
    }

    #[tokio::test]
    async fn run_drives_requested_ticks() {
        let config = GameConfig {
            tick_rate_hz: 200,
            ..GameConfig::default()
        };
        let mut session = GameLoop::new(config, MemoryStore::new()).unwrap();

        session.run(Some(3)).await;
        assert_eq!(session.ticks(), 3);
        assert!(session.game().total_time_played().get() >= 0.0);
    }

    #[test]
    fn failed_autosave_still_flushes() {
        let mut session = GameLoop::new(GameConfig::default(), ReadOnlyStore).unwrap();
        let label = TextSurface::new();
        session
            .view_registry()
            .unwrap()
            .attach("game.total_time_played", Rc::new(label.clone()))
            .unwrap();

        let result = session.tick(7000.0);
        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert!(session.scheduler().is_empty());
        assert_eq!(label.text(), "00:00:07");

        assert!(session.tick(1000.0).is_ok());
        assert_eq!(label.text(), "00:00:08");
    }

    #[tokio::test]
    async fn run_survives_failed_autosaves() {
        let config = GameConfig {
            tick_rate_hz: 200,
            autosave_interval_ms: 0,
            ..GameConfig::default()
        };
        let mut session = GameLoop::new(config, ReadOnlyStore).unwrap();

        session.run(Some(3)).await;
        assert_eq!(session.ticks(), 3);
    }

    #[test]
    fn dropping_a_session_releases_queued_values() {
        let session = session(MemoryStore::new());
        let surface = Rc::new(TextSurface::new());
        session.game().gold().attach_surface(surface.clone());

        session.game().gold().set(5.0);
        assert!(!session.scheduler().is_empty());
        drop(session);

        assert_eq!(Rc::strong_count(&surface), 1);
    }
}
