//! Aura: an incremental clicker economy.
//!
//! `AuraGame` is the session the UI layer talks to: it owns the state, the
//! save store, the RNG and the timers, and turns every user action into an
//! outcome plus a log event. Rendering reads the post-transition state
//! through the accessors.

pub mod catalog;
pub mod formula;
pub mod logic;
pub mod save;
pub mod state;
pub mod storage;

#[cfg(test)]
mod simulator;

use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{EconomyError, PersistenceError};
use crate::time::Cadence;

use catalog::{AchievementId, GeneratorId, UpgradeId};
use logic::{Accrual, PrestigeOutcome, Purchase, SpinOutcome};
use state::{GameState, ShopEntry};
use storage::SaveStore;

/// Something that happened, for the UI layer to present.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Loaded { restored: bool },
    NotEnoughAura { cost: f64 },
    UpgradePurchased { id: UpgradeId, cost: f64 },
    GeneratorPurchased { id: GeneratorId, cost: f64 },
    AchievementUnlocked(AchievementId),
    Spin(SpinOutcome),
    RebirthLocked { threshold: f64 },
    Rebirth { awarded: u64 },
    Saved,
    SaveFailed(String),
    Reset,
}

impl GameEvent {
    pub fn is_important(&self) -> bool {
        matches!(
            self,
            GameEvent::AchievementUnlocked(_)
                | GameEvent::Spin(SpinOutcome::Jackpot { .. })
                | GameEvent::Rebirth { .. }
                | GameEvent::SaveFailed(_)
        )
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use logic::format_number;
        match self {
            GameEvent::Loaded { .. } => write!(f, "Game loaded"),
            GameEvent::NotEnoughAura { .. } => write!(f, "Not enough Aura!"),
            GameEvent::UpgradePurchased { id, .. } => write!(f, "{} purchased!", id.title()),
            GameEvent::GeneratorPurchased { id, .. } => write!(f, "{} purchased!", id.title()),
            GameEvent::AchievementUnlocked(id) => {
                write!(f, "Achievement unlocked: {}", id.title())
            }
            GameEvent::Spin(SpinOutcome::Small { reward }) => {
                write!(f, "Spin: +{} Aura!", format_number(*reward))
            }
            GameEvent::Spin(SpinOutcome::ClickBoost { .. }) => {
                write!(f, "Spin: Click power boosted!")
            }
            GameEvent::Spin(SpinOutcome::Jackpot { reward }) => {
                write!(f, "Jackpot! +{} Aura!", format_number(*reward))
            }
            GameEvent::RebirthLocked { threshold } => {
                write!(
                    f,
                    "Reach {} total Aura to rebirth.",
                    format_number(*threshold)
                )
            }
            GameEvent::Rebirth { awarded } => {
                write!(f, "You rebirthed and gained {awarded} prestige points!")
            }
            GameEvent::Saved => write!(f, "Saved"),
            GameEvent::SaveFailed(_) => write!(f, "Auto-save failed"),
            GameEvent::Reset => write!(f, "Game reset"),
        }
    }
}

/// What the autosave did during an `update` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutosaveStatus {
    #[default]
    Idle,
    Saved,
    Failed,
}

/// Result of one `update` call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    /// Aura added by passive production.
    pub accrued: f64,
    pub autosave: AutosaveStatus,
}

/// A running Aura session.
pub struct AuraGame<S: SaveStore, R: Rng = ChaCha8Rng> {
    pub state: GameState,
    store: S,
    rng: R,
    config: SessionConfig,
    accrual: Accrual,
    accrual_clock: Cadence,
    autosave_clock: Cadence,
    log: VecDeque<GameEvent>,
}

impl<S: SaveStore> AuraGame<S, ChaCha8Rng> {
    /// Start a session: load the saved game (or start fresh) and start the
    /// clocks at `now_ms`. Seeds the RNG from the config, else from the clock.
    pub fn new(store: S, config: SessionConfig, now_ms: f64) -> Self {
        let seed = config.rng_seed.unwrap_or(now_ms as u64);
        Self::with_rng(store, config, ChaCha8Rng::seed_from_u64(seed), now_ms)
    }
}

impl<S: SaveStore, R: Rng> AuraGame<S, R> {
    pub fn with_rng(mut store: S, config: SessionConfig, rng: R, now_ms: f64) -> Self {
        let loaded = save::load_game(&mut store, &config.storage_key);
        let restored = loaded.is_some();
        let mut state = loaded.unwrap_or_default();
        logic::recalculate(&mut state);

        let mut game = Self {
            state,
            store,
            rng,
            accrual: Accrual::new(now_ms),
            accrual_clock: Cadence::starting_at(config.accrual_interval_ms, now_ms),
            autosave_clock: Cadence::starting_at(config.autosave_interval_ms, now_ms),
            config,
            log: VecDeque::new(),
        };
        game.push(GameEvent::Loaded { restored });
        game.after_mutation();
        game
    }

    /// Click the orb. Returns the Aura gained.
    pub fn click(&mut self) -> f64 {
        let gained = logic::click(&mut self.state, self.config.click_variance, &mut self.rng);
        self.after_mutation();
        gained
    }

    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Result<Purchase, EconomyError> {
        match logic::purchase_upgrade(&mut self.state, id) {
            Ok(bought) => {
                debug!(
                    upgrade = id.key(),
                    cost = bought.cost,
                    owned = bought.owned,
                    "upgrade purchased"
                );
                self.push(GameEvent::UpgradePurchased {
                    id,
                    cost: bought.cost,
                });
                self.after_mutation();
                Ok(bought)
            }
            Err(e) => {
                self.reject(&e);
                Err(e)
            }
        }
    }

    pub fn purchase_generator(&mut self, id: GeneratorId) -> Result<Purchase, EconomyError> {
        match logic::purchase_generator(&mut self.state, id) {
            Ok(bought) => {
                debug!(
                    generator = id.key(),
                    cost = bought.cost,
                    owned = bought.owned,
                    "generator purchased"
                );
                self.push(GameEvent::GeneratorPurchased {
                    id,
                    cost: bought.cost,
                });
                self.after_mutation();
                Ok(bought)
            }
            Err(e) => {
                self.reject(&e);
                Err(e)
            }
        }
    }

    pub fn spin(&mut self) -> Result<SpinOutcome, EconomyError> {
        match logic::spin(&mut self.state, &mut self.rng) {
            Ok(outcome) => {
                debug!(?outcome, "lucky spin");
                self.push(GameEvent::Spin(outcome));
                self.after_mutation();
                Ok(outcome)
            }
            Err(e) => {
                self.reject(&e);
                Err(e)
            }
        }
    }

    /// Rebirth. The UI confirms with the player before calling this;
    /// `pending_prestige_points` tells it what to show.
    pub fn prestige(&mut self) -> Result<PrestigeOutcome, EconomyError> {
        match logic::prestige(&mut self.state) {
            Ok(outcome) => {
                info!(awarded = outcome.awarded, total = outcome.total, "rebirth");
                self.push(GameEvent::Rebirth {
                    awarded: outcome.awarded,
                });
                self.after_mutation();
                Ok(outcome)
            }
            Err(e) => {
                self.reject(&e);
                Err(e)
            }
        }
    }

    /// Explicit save.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let result = save::save_game(&mut self.store, &self.config.storage_key, &self.state);
        match &result {
            Ok(()) => self.push(GameEvent::Saved),
            Err(e) => self.push(GameEvent::SaveFailed(e.to_string())),
        }
        result
    }

    /// Discard the saved game and start over. The UI confirms first.
    /// If the blob cannot be removed nothing changes.
    pub fn reset(&mut self) -> Result<(), PersistenceError> {
        save::delete_save(&mut self.store, &self.config.storage_key)?;
        self.state = GameState::new();
        logic::recalculate(&mut self.state);
        self.push(GameEvent::Reset);
        Ok(())
    }

    /// Drive the timers. Call from any frame or interval callback.
    ///
    /// Runs one accrual tick whenever at least one accrual interval has
    /// passed (crediting the full elapsed time), and flushes to storage
    /// whenever an autosave interval has passed.
    pub fn update(&mut self, now_ms: f64) -> Tick {
        let mut tick = Tick::default();

        if self.accrual_clock.update(now_ms) > 0 {
            tick.accrued = self.accrual.tick(&mut self.state, now_ms);
            if tick.accrued > 0.0 {
                self.after_mutation();
            }
        }

        if self.autosave_clock.update(now_ms) > 0 {
            tick.autosave =
                match save::save_game(&mut self.store, &self.config.storage_key, &self.state) {
                    Ok(()) => AutosaveStatus::Saved,
                    Err(e) => {
                        self.push(GameEvent::SaveFailed(e.to_string()));
                        AutosaveStatus::Failed
                    }
                };
        }

        tick
    }

    /// Best-effort final save on exit. Failure is logged and swallowed.
    pub fn shutdown(&mut self) {
        if let Err(e) = save::save_game(&mut self.store, &self.config.storage_key, &self.state) {
            warn!(error = %e, "final save failed");
        }
    }

    pub fn aura(&self) -> f64 {
        self.state.aura
    }

    pub fn per_click(&self) -> f64 {
        self.state.per_click
    }

    pub fn per_sec(&self) -> f64 {
        self.state.per_sec
    }

    pub fn upgrade_shop(&self) -> Vec<ShopEntry> {
        self.state.upgrade_shop()
    }

    pub fn generator_shop(&self) -> Vec<ShopEntry> {
        self.state.generator_shop()
    }

    pub fn achievements(&self) -> Vec<AchievementId> {
        self.state.achievements.iter().copied().collect()
    }

    pub fn pending_prestige_points(&self) -> u64 {
        logic::pending_prestige_points(&self.state)
    }

    /// Recent events, oldest first.
    pub fn log(&self) -> &VecDeque<GameEvent> {
        &self.log
    }

    /// Take all logged events, oldest first.
    pub fn drain_log(&mut self) -> Vec<GameEvent> {
        self.log.drain(..).collect()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn after_mutation(&mut self) {
        for id in logic::check_achievements(&mut self.state) {
            info!(achievement = id.key(), "achievement unlocked");
            self.push(GameEvent::AchievementUnlocked(id));
        }
    }

    fn reject(&mut self, err: &EconomyError) {
        debug!(error = %err, "action rejected");
        let event = match err {
            EconomyError::InsufficientFunds { cost, .. } => {
                GameEvent::NotEnoughAura { cost: *cost }
            }
            EconomyError::BelowPrestigeThreshold { threshold, .. } => GameEvent::RebirthLocked {
                threshold: *threshold,
            },
        };
        self.push(event);
    }

    fn push(&mut self, event: GameEvent) {
        self.log.push_back(event);
        while self.log.len() > self.config.log_capacity {
            self.log.pop_front();
        }
    }
}
