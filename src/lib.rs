//! Aura, the economic core of an incremental clicker game.
//!
//! The player gathers Aura by clicking and from generators, spends it on
//! upgrades, gambles on a lucky spin, and eventually rebirths for permanent
//! prestige points. This crate holds the state, the transitions and the
//! persistence; a UI layer drives `AuraGame` and renders what it reads back.

pub mod aura;
pub mod config;
pub mod error;
pub mod time;

pub use aura::catalog::{AchievementId, GeneratorId, UpgradeId};
pub use aura::logic::{PrestigeOutcome, Purchase, SpinBand, SpinOutcome};
pub use aura::state::GameState;
pub use aura::storage::{MemoryStore, SaveStore};
pub use aura::{AuraGame, AutosaveStatus, GameEvent, Tick};
pub use config::SessionConfig;
pub use error::{CorruptState, EconomyError, PersistenceError};

#[cfg(not(target_arch = "wasm32"))]
pub use aura::storage::FileStore;
#[cfg(target_arch = "wasm32")]
pub use aura::storage::LocalStorage;
