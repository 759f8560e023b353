//! Session configuration.

use serde::{Deserialize, Serialize};

/// Runtime knobs for an `AuraGame` session.
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key of the persisted blob in the save store.
    pub storage_key: String,
    /// Accrual tick cadence (500ms = twice per second).
    pub accrual_interval_ms: f64,
    /// Periodic persistence flush cadence.
    pub autosave_interval_ms: f64,
    /// Click yield variance, as a fraction (0.04 = ±4%). 0 disables it.
    pub click_variance: f64,
    /// Fixed RNG seed. When absent the session seeds from the clock.
    pub rng_seed: Option<u64>,
    /// Maximum number of retained log events.
    pub log_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: crate::aura::save::STORAGE_KEY.to_string(),
            accrual_interval_ms: 500.0,
            autosave_interval_ms: 10_000.0,
            click_variance: 0.04,
            rng_seed: None,
            log_capacity: 50,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Deterministic configuration: fixed seed, no click variance.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            click_variance: 0.0,
            rng_seed: Some(seed),
            ..Self::default()
        }
    }
}
