//! Aura save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current blob format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format still readable. Only bump on
//!   breaking changes (a field changes meaning or is removed).
//!
//! Blobs in `MIN_COMPATIBLE_VERSION..=SAVE_VERSION` load with missing fields
//! filled from defaults. Anything else, anything unparsable, and any record
//! whose `aura` is not a number is corrupt: it is discarded and the game
//! starts fresh.
//!
//! The blob is JSON with camelCase field names and catalog keys
//! (`"click2"`, `"g1"`, `"firstClick"`), so saves written by the browser
//! build of the game load unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use super::catalog::{AchievementId, GeneratorId, UpgradeId};
use super::state::GameState;
use super::storage::SaveStore;
use crate::error::{CorruptState, PersistenceError};

/// Save format version. Increment when adding fields.
pub const SAVE_VERSION: u32 = 1;

/// Oldest save format that can still be loaded.
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Default key of the blob in the save store.
pub const STORAGE_KEY: &str = "aura_game_v1";

#[derive(Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SaveData {
    #[serde(deserialize_with = "nullable_f64")]
    aura: f64,
    #[serde(deserialize_with = "nullable_f64")]
    total_aura: f64,
    #[serde(deserialize_with = "nullable_f64")]
    per_click: f64,
    #[serde(deserialize_with = "nullable_f64")]
    per_sec: f64,
    /// Owned count per upgrade key.
    upgrades: BTreeMap<String, u32>,
    /// Owned count per generator key.
    generators: BTreeMap<String, u32>,
    prestige_points: u64,
    /// Unlocked achievement keys.
    unlocks: BTreeMap<String, bool>,
    version: u32,
}

impl Default for SaveData {
    fn default() -> Self {
        extract_save(&GameState::new())
    }
}

/// Non-finite numbers are written as `null`; read them back as NaN so
/// `GameState::sanitize` can coerce them instead of rejecting the record.
fn nullable_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn extract_save(state: &GameState) -> SaveData {
    SaveData {
        aura: state.aura,
        total_aura: state.total_aura,
        per_click: state.per_click,
        per_sec: state.per_sec,
        upgrades: state
            .upgrades
            .iter()
            .map(|(id, n)| (id.key().to_string(), *n))
            .collect(),
        generators: state
            .generators
            .iter()
            .map(|(id, n)| (id.key().to_string(), *n))
            .collect(),
        prestige_points: state.prestige_points,
        unlocks: state
            .achievements
            .iter()
            .map(|id| (id.key().to_string(), true))
            .collect(),
        version: SAVE_VERSION,
    }
}

/// Copy a decoded blob into `state`. Keys no longer in the catalogs are
/// dropped.
fn apply_save(state: &mut GameState, save: &SaveData) {
    state.aura = save.aura;
    state.total_aura = save.total_aura;
    state.per_click = save.per_click;
    state.per_sec = save.per_sec;

    state.upgrades = save
        .upgrades
        .iter()
        .filter_map(|(key, n)| Some((UpgradeId::from_key(key)?, *n)))
        .collect();
    state.generators = save
        .generators
        .iter()
        .filter_map(|(key, n)| Some((GeneratorId::from_key(key)?, *n)))
        .collect();
    state.achievements = save
        .unlocks
        .iter()
        .filter(|(_, unlocked)| **unlocked)
        .filter_map(|(key, _)| AchievementId::from_key(key))
        .collect();

    state.prestige_points = save.prestige_points;
    state.version = SAVE_VERSION;
    state.sanitize();
}

/// Serialize the whole state to the blob format.
pub fn encode_save(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&extract_save(state))
}

/// Parse and validate a blob.
pub fn decode_save(json: &str) -> Result<GameState, CorruptState> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.get("aura").is_some_and(serde_json::Value::is_number) {
        return Err(CorruptState::MissingAura);
    }

    let save: SaveData = serde_json::from_value(value)?;
    if save.version < MIN_COMPATIBLE_VERSION || save.version > SAVE_VERSION {
        return Err(CorruptState::UnsupportedVersion {
            found: save.version,
            min: MIN_COMPATIBLE_VERSION,
            max: SAVE_VERSION,
        });
    }
    if save.version < SAVE_VERSION {
        info!(
            saved = save.version,
            current = SAVE_VERSION,
            "migrating save data from an older version"
        );
    }

    let mut state = GameState::new();
    apply_save(&mut state, &save);
    Ok(state)
}

/// Write the state under `key`. Failures are logged and returned for the
/// caller to show as a warning.
pub fn save_game<S: SaveStore + ?Sized>(
    store: &mut S,
    key: &str,
    state: &GameState,
) -> Result<(), PersistenceError> {
    let result = encode_save(state)
        .map_err(PersistenceError::from)
        .and_then(|json| store.write(key, &json));
    match &result {
        Ok(()) => debug!(key, aura = state.aura, "game saved"),
        Err(e) => warn!(key, error = %e, "save failed"),
    }
    result
}

/// Read the state stored under `key`.
///
/// Returns `None` when nothing is stored, the store cannot be read, or the
/// blob is corrupt. A corrupt blob is removed.
pub fn load_game<S: SaveStore + ?Sized>(store: &mut S, key: &str) -> Option<GameState> {
    let json = match store.read(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "could not read save data");
            return None;
        }
    };

    match decode_save(&json) {
        Ok(state) => {
            info!(
                key,
                aura = state.aura,
                prestige = state.prestige_points,
                "game loaded"
            );
            Some(state)
        }
        Err(e) => {
            warn!(key, error = %e, "discarding corrupt save data");
            if let Err(e) = store.remove(key) {
                warn!(key, error = %e, "could not remove corrupt save data");
            }
            None
        }
    }
}

/// Delete the blob stored under `key`.
pub fn delete_save<S: SaveStore + ?Sized>(
    store: &mut S,
    key: &str,
) -> Result<(), PersistenceError> {
    store.remove(key)?;
    info!(key, "save data deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aura::logic;
    use crate::aura::storage::MemoryStore;
    use crate::error::EconomyError;

    fn sample_state() -> GameState {
        let mut s = GameState::new();
        s.aura = 12_345.6;
        s.total_aura = 99_999.25;
        s.per_click = 7.5;
        s.per_sec = 24.4;
        s.upgrades.insert(UpgradeId::SharpFingers, 2);
        s.upgrades.insert(UpgradeId::AutoTuner, 1);
        s.generators.insert(GeneratorId::AuraBubble, 12);
        s.generators.insert(GeneratorId::LuminousOrb, 3);
        s.achievements.insert(AchievementId::FirstClick);
        s.achievements.insert(AchievementId::Rich);
        s.prestige_points = 4;
        s
    }

    #[test]
    fn encode_decode_roundtrip() {
        let original = sample_state();
        let json = encode_save(&original).unwrap();
        let restored = decode_save(&json).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn blob_uses_catalog_keys() {
        let json = encode_save(&sample_state()).unwrap();
        assert!(json.contains(r#""totalAura":"#), "{json}");
        assert!(json.contains(r#""click2":2"#), "{json}");
        assert!(json.contains(r#""g1":12"#), "{json}");
        assert!(json.contains(r#""firstClick":true"#), "{json}");
        assert!(json.contains(r#""version":1"#), "{json}");
    }

    /// A blob as written by the browser build of the game.
    #[test]
    fn loads_browser_blob() {
        let json = r#"{
            "aura": 512.5,
            "totalAura": 3000,
            "perClick": 2,
            "perSec": 0.4,
            "upgrades": { "click2": 1 },
            "generators": { "g1": 2 },
            "prestigePoints": 0,
            "unlocks": { "firstClick": true, "rich": true },
            "version": 1
        }"#;
        let state = decode_save(json).unwrap();
        assert_eq!(state.aura, 512.5);
        assert_eq!(state.total_aura, 3000.0);
        assert_eq!(state.per_click, 2.0);
        assert_eq!(state.upgrade_count(UpgradeId::SharpFingers), 1);
        assert_eq!(state.generator_count(GeneratorId::AuraBubble), 2);
        assert!(state.achievements.contains(&AchievementId::Rich));
    }

    #[test]
    fn missing_fields_default() {
        let state = decode_save(r#"{ "aura": 10 }"#).unwrap();
        assert_eq!(state.aura, 10.0);
        assert_eq!(state.per_click, 1.0);
        assert_eq!(state.total_aura, 0.0);
        assert!(state.upgrades.is_empty());
        assert_eq!(state.prestige_points, 0);
    }

    #[test]
    fn non_numeric_aura_is_rejected() {
        assert!(matches!(
            decode_save(r#"{ "aura": "lots" }"#),
            Err(CorruptState::MissingAura)
        ));
        assert!(matches!(
            decode_save(r#"{ "aura": null }"#),
            Err(CorruptState::MissingAura)
        ));
        assert!(matches!(
            decode_save(r#"{ "totalAura": 5 }"#),
            Err(CorruptState::MissingAura)
        ));
        assert!(matches!(
            decode_save("[1, 2]"),
            Err(CorruptState::MissingAura)
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            decode_save("{ not json"),
            Err(CorruptState::Malformed(_))
        ));
        assert!(matches!(
            decode_save(r#"{ "aura": 1, "upgrades": "none" }"#),
            Err(CorruptState::Malformed(_))
        ));
    }

    #[test]
    fn unsupported_versions_are_rejected() {
        assert!(matches!(
            decode_save(r#"{ "aura": 1, "version": 0 }"#),
            Err(CorruptState::UnsupportedVersion { found: 0, .. })
        ));
        assert!(matches!(
            decode_save(r#"{ "aura": 1, "version": 99 }"#),
            Err(CorruptState::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn null_numbers_are_coerced() {
        let state = decode_save(r#"{ "aura": 3, "perClick": null, "perSec": null }"#).unwrap();
        assert_eq!(state.per_click, 1.0);
        assert_eq!(state.per_sec, 0.0);
    }

    #[test]
    fn non_finite_state_saves_and_loads_safely() {
        let mut state = GameState::new();
        state.aura = 5.0;
        state.per_click = f64::NAN;
        let json = encode_save(&state).unwrap();
        let restored = decode_save(&json).unwrap();
        assert_eq!(restored.per_click, 1.0);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = r#"{
            "aura": 1,
            "upgrades": { "click2": 1, "removedUpgrade": 4 },
            "generators": { "g9": 2 },
            "unlocks": { "collector": false, "legacy": true },
            "futureField": [1, 2, 3]
        }"#;
        let state = decode_save(json).unwrap();
        assert_eq!(state.upgrades.len(), 1);
        assert!(state.generators.is_empty());
        assert!(state.achievements.is_empty());
    }

    #[test]
    fn huge_owned_counts_load_but_price_out() {
        let json = r#"{
            "aura": 100,
            "upgrades": { "click2": 4294967295, "click5": 2147483648 },
            "generators": { "g1": 4294967295 }
        }"#;
        let mut state = decode_save(json).unwrap();
        assert_eq!(state.upgrade_cost(UpgradeId::SharpFingers), f64::INFINITY);
        assert_eq!(state.upgrade_cost(UpgradeId::AuraChanneling), f64::INFINITY);
        assert_eq!(state.generator_cost(GeneratorId::AuraBubble), f64::INFINITY);

        let before = state.clone();
        for id in [UpgradeId::SharpFingers, UpgradeId::AuraChanneling] {
            assert!(matches!(
                logic::purchase_upgrade(&mut state, id),
                Err(EconomyError::InsufficientFunds { .. })
            ));
        }
        assert!(logic::purchase_generator(&mut state, GeneratorId::AuraBubble).is_err());
        assert_eq!(state, before);

        // Items with sane counts stay purchasable.
        assert!(logic::purchase_generator(&mut state, GeneratorId::LuminousOrb).is_ok());
    }

    #[test]
    fn save_and_load_through_store() {
        let mut store = MemoryStore::new();
        let original = sample_state();
        save_game(&mut store, STORAGE_KEY, &original).unwrap();
        assert!(store.get(STORAGE_KEY).is_some());
        assert_eq!(load_game(&mut store, STORAGE_KEY), Some(original));
    }

    #[test]
    fn load_missing_is_none() {
        let mut store = MemoryStore::new();
        assert_eq!(load_game(&mut store, STORAGE_KEY), None);
    }

    #[test]
    fn load_corrupt_removes_blob() {
        let mut store = MemoryStore::new();
        store.insert(STORAGE_KEY, "garbage");
        assert_eq!(load_game(&mut store, STORAGE_KEY), None);
        assert_eq!(store.get(STORAGE_KEY), None);
    }

    #[test]
    fn save_failure_is_reported() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let err = save_game(&mut store, STORAGE_KEY, &GameState::new()).unwrap_err();
        assert!(matches!(err, PersistenceError::Storage(_)));
    }

    #[test]
    fn delete_clears_blob() {
        let mut store = MemoryStore::new();
        save_game(&mut store, STORAGE_KEY, &sample_state()).unwrap();
        delete_save(&mut store, STORAGE_KEY).unwrap();
        assert_eq!(load_game(&mut store, STORAGE_KEY), None);
    }
}
