//! Economy
//!
//! The game's numbers and the rules that move them: mining gold by
//! clicking, passive income, and the two upgrades.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::binding::{BindingRoot, Projection};
use crate::reactive::{Formatter, ObservableValue, TimeSpanStyle};
use crate::render::{RenderScheduler, RenderSurface, ToggleButton};
use crate::storage::{KeyValueStore, StorageDevice, StorageError};

/// Button color when an upgrade is affordable.
pub const AFFORDABLE_COLOR: &str = "#33cc33";

/// Button color when an upgrade is out of reach.
pub const UNAFFORDABLE_COLOR: &str = "#ee2222";

/// Which upgrade track an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    /// Gold earned per second.
    Income,
    /// Gold earned per click.
    Click,
}

/// An upgrade track: the amount it produces, its level and its next price.
#[derive(Debug, Clone)]
pub struct Upgrade {
    output: ObservableValue,
    level: ObservableValue,
    price: ObservableValue,
}

impl Upgrade {
    fn new(output: f64, price: f64, scheduler: &RenderScheduler) -> Self {
        Self {
            output: ObservableValue::new(output, scheduler),
            level: ObservableValue::new(1.0, scheduler),
            price: ObservableValue::new(price, scheduler),
        }
    }

    /// Amount produced at the current level.
    pub fn output(&self) -> &ObservableValue {
        &self.output
    }

    /// Current level, starting at 1.
    pub fn level(&self) -> &ObservableValue {
        &self.level
    }

    /// Gold required for the next level.
    pub fn price(&self) -> &ObservableValue {
        &self.price
    }

    fn apply(&self) {
        self.output.update(|output| (output * 1.1 + 1.0).floor());
        self.level.update(|level| level + 1.0);
        self.price.update(|price| price * 1.2);
    }

    /// Re-apply free upgrades until the saved level is reached.
    fn replay(&self, saved_level: f64) {
        // Saturating cast: NaN and negatives become 0.
        let saved_level = saved_level as u32;
        for _ in 1..saved_level {
            self.apply();
        }
    }
}

/// The state of one game session.
pub struct Game {
    gold: ObservableValue,
    income: Upgrade,
    click: Upgrade,
    total_gold_earned: ObservableValue,
    total_gold_mined: ObservableValue,
    total_clicks: ObservableValue,
    total_time_played: ObservableValue,
    frame_rate: ObservableValue,
    frame_time: Cell<f64>,
    frame_count: Cell<u32>,
    scheduler: RenderScheduler,
    buttons: Vec<Projection>,
}

impl Game {
    /// Create the game state and bind it to `storage`, restoring the
    /// previous session if one was loaded.
    pub fn new<S: KeyValueStore>(
        scheduler: &RenderScheduler,
        storage: &mut StorageDevice<S>,
    ) -> Result<Self, StorageError> {
        let game = Self {
            gold: ObservableValue::new(0.0, scheduler),
            income: Upgrade::new(1.0, 10.0, scheduler),
            click: Upgrade::new(1.0, 10.0, scheduler),
            total_gold_earned: ObservableValue::new(0.0, scheduler),
            total_gold_mined: ObservableValue::new(0.0, scheduler),
            total_clicks: ObservableValue::new(0.0, scheduler),
            total_time_played: ObservableValue::with_formatter(
                0.0,
                Formatter::TimeSpan(TimeSpanStyle::Compact),
                scheduler,
            ),
            frame_rate: ObservableValue::new(0.0, scheduler),
            frame_time: Cell::new(0.0),
            frame_count: Cell::new(0),
            scheduler: scheduler.clone(),
            buttons: Vec::new(),
        };
        game.bind_storage(storage)?;
        Ok(game)
    }

    fn bind_storage<S: KeyValueStore>(&self, storage: &mut StorageDevice<S>) -> Result<(), StorageError> {
        storage.bind_value("gd", &self.gold)?;

        let (income, level) = (self.income.clone(), self.income.level.clone());
        storage.bind("cp", move |saved| income.replay(saved), move || level.get())?;
        let (click, level) = (self.click.clone(), self.click.level.clone());
        storage.bind("il", move |saved| click.replay(saved), move || level.get())?;

        storage.bind_value("tg", &self.total_gold_earned)?;
        storage.bind_value("tm", &self.total_gold_mined)?;
        storage.bind_value("tc", &self.total_clicks)?;
        storage.bind_value("tt", &self.total_time_played)?;
        Ok(())
    }

    /// Drive `surface`'s color from whether the upgrade is affordable.
    pub fn attach_upgrade_button(&mut self, kind: UpgradeKind, surface: Rc<dyn RenderSurface>) {
        let button = ToggleButton::new(surface, AFFORDABLE_COLOR, UNAFFORDABLE_COLOR, &self.scheduler);
        let gold = self.gold.clone();
        let price = self.upgrade(kind).price.clone();

        let projection = Projection::new(&[gold.clone(), price.clone()], move || {
            button.set_state(gold.get() >= price.get());
        });
        self.buttons.push(projection);
    }

    /// The upgrade track for `kind`.
    pub fn upgrade(&self, kind: UpgradeKind) -> &Upgrade {
        match kind {
            UpgradeKind::Income => &self.income,
            UpgradeKind::Click => &self.click,
        }
    }

    fn earn_gold(&self, amount: f64) {
        self.gold.update(|gold| gold + amount);
        self.total_gold_earned.update(|total| total + amount);
    }

    /// Mine gold by clicking once.
    pub fn click(&self) {
        let amount = self.click.output.get();
        self.earn_gold(amount);
        self.total_gold_mined.update(|mined| mined + amount);
        self.total_clicks.update(|clicks| clicks + 1.0);
    }

    /// Buy the next level of an upgrade. Returns `false` if it is not
    /// affordable.
    pub fn try_upgrade(&self, kind: UpgradeKind) -> bool {
        let upgrade = self.upgrade(kind);
        let price = upgrade.price.get();
        if self.gold.get() < price {
            return false;
        }
        self.gold.update(|gold| gold - price);
        upgrade.apply();
        debug!(?kind, level = upgrade.level.get(), "upgrade bought");
        true
    }

    /// Advance the simulation by `elapsed_ms` milliseconds.
    pub fn update(&self, elapsed_ms: f64) {
        self.earn_gold(self.income.output.get() * (elapsed_ms / 1000.0));
        self.total_time_played.update(|played| played + elapsed_ms);

        self.frame_count.set(self.frame_count.get() + 1);
        self.frame_time.set(self.frame_time.get() + elapsed_ms);
        if self.frame_time.get() >= 1000.0 {
            self.frame_rate
                .set(f64::from(self.frame_count.get()) * 1000.0 / self.frame_time.get());
            self.frame_time.set(0.0);
            self.frame_count.set(0);
        }
    }

    /// Current gold.
    pub fn gold(&self) -> &ObservableValue {
        &self.gold
    }

    /// Gold earned from all sources, ever.
    pub fn total_gold_earned(&self) -> &ObservableValue {
        &self.total_gold_earned
    }

    /// Gold earned by clicking, ever.
    pub fn total_gold_mined(&self) -> &ObservableValue {
        &self.total_gold_mined
    }

    /// Number of clicks, ever.
    pub fn total_clicks(&self) -> &ObservableValue {
        &self.total_clicks
    }

    /// Milliseconds accounted for by the game loop, across sessions.
    pub fn total_time_played(&self) -> &ObservableValue {
        &self.total_time_played
    }

    /// Ticks per second, measured over the last second.
    pub fn frame_rate(&self) -> &ObservableValue {
        &self.frame_rate
    }
}

impl BindingRoot for Game {
    fn exposed_values(&self) -> Vec<(&'static str, ObservableValue)> {
        vec![
            ("gold", self.gold.clone()),
            ("income", self.income.output.clone()),
            ("income_level", self.income.level.clone()),
            ("income_upgrade_price", self.income.price.clone()),
            ("gold_per_click", self.click.output.clone()),
            ("click_level", self.click.level.clone()),
            ("click_upgrade_price", self.click.price.clone()),
            ("total_gold_earned", self.total_gold_earned.clone()),
            ("total_gold_mined", self.total_gold_mined.clone()),
            ("total_clicks", self.total_clicks.clone()),
            ("total_time_played", self.total_time_played.clone()),
            ("frame_rate", self.frame_rate.clone()),
        ]
    }
}
