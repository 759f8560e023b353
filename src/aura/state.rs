/// Aura game state: the single mutable aggregate every operation threads through.
use std::collections::{BTreeMap, BTreeSet};

use super::catalog::{AchievementId, GeneratorId, UpgradeId};
use super::formula::{cost_at, efficiency_multiplier, production_at};

/// Aura per click at the start of a fresh run, before prestige scaling.
pub const BASE_CLICK: f64 = 1.0;

/// Full economic state of an Aura game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable Aura. Always finite and ≥ 0.
    pub aura: f64,
    /// Aura earned in this run. Only reset by prestige.
    pub total_aura: f64,
    /// Aura per click.
    pub per_click: f64,
    /// Aura per second. Derived from generators by `logic::recalculate`.
    pub per_sec: f64,
    /// Owned count per upgrade. Absent means zero.
    pub upgrades: BTreeMap<UpgradeId, u32>,
    /// Owned count per generator. Absent means zero.
    pub generators: BTreeMap<GeneratorId, u32>,
    pub achievements: BTreeSet<AchievementId>,
    /// Permanent prestige currency. Survives rebirth.
    pub prestige_points: u64,
    /// Save format version this state was written with.
    pub version: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            aura: 0.0,
            total_aura: 0.0,
            per_click: BASE_CLICK,
            per_sec: 0.0,
            upgrades: BTreeMap::new(),
            generators: BTreeMap::new(),
            achievements: BTreeSet::new(),
            prestige_points: 0,
            version: super::save::SAVE_VERSION,
        }
    }

    pub fn upgrade_count(&self, id: UpgradeId) -> u32 {
        self.upgrades.get(&id).copied().unwrap_or(0)
    }

    pub fn generator_count(&self, id: GeneratorId) -> u32 {
        self.generators.get(&id).copied().unwrap_or(0)
    }

    /// Upgrade purchases across the catalog, repeats included.
    pub fn upgrade_purchases(&self) -> u32 {
        self.upgrades
            .values()
            .fold(0u32, |acc, n| acc.saturating_add(*n))
    }

    /// Generator efficiency from owned Auto Tuner levels.
    pub fn efficiency(&self) -> f64 {
        efficiency_multiplier(self.upgrade_count(UpgradeId::AutoTuner))
    }

    /// Price of the next purchase of `id`.
    pub fn upgrade_cost(&self, id: UpgradeId) -> f64 {
        cost_at(id.base_cost(), self.upgrade_count(id))
    }

    /// Price of the next unit of `id`.
    pub fn generator_cost(&self, id: GeneratorId) -> f64 {
        cost_at(id.base_cost(), self.generator_count(id))
    }

    /// Aura per second produced by all owned units of `id`.
    pub fn generator_production(&self, id: GeneratorId) -> f64 {
        production_at(id.base_production(), self.generator_count(id), self.efficiency())
    }

    /// Aura per second gained by buying one more unit of `id`.
    pub fn next_unit_production(&self, id: GeneratorId) -> f64 {
        let n = self.generator_count(id);
        let eff = self.efficiency();
        production_at(id.base_production(), n.saturating_add(1), eff)
            - production_at(id.base_production(), n, eff)
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        self.aura >= cost
    }

    /// Coerce corrupted numeric fields to safe values.
    ///
    /// Non-finite Aura and production become 0, a non-finite click yield
    /// becomes 1, and negative values are clamped to 0.
    pub fn sanitize(&mut self) {
        self.aura = finite_or(self.aura, 0.0).max(0.0);
        self.total_aura = finite_or(self.total_aura, 0.0).max(0.0);
        self.per_sec = finite_or(self.per_sec, 0.0).max(0.0);
        self.per_click = finite_or(self.per_click, BASE_CLICK).max(0.0);
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// One row of the upgrade or generator shop, as the UI layer sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShopEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub owned: u32,
    pub cost: f64,
    pub affordable: bool,
    /// Production gained by the next purchase (generators only).
    pub next_gain: Option<f64>,
}

impl GameState {
    pub fn upgrade_shop(&self) -> Vec<ShopEntry> {
        UpgradeId::all()
            .iter()
            .map(|&id| {
                let cost = self.upgrade_cost(id);
                ShopEntry {
                    key: id.key(),
                    title: id.title(),
                    owned: self.upgrade_count(id),
                    cost,
                    affordable: self.can_afford(cost),
                    next_gain: None,
                }
            })
            .collect()
    }

    pub fn generator_shop(&self) -> Vec<ShopEntry> {
        GeneratorId::all()
            .iter()
            .map(|&id| {
                let cost = self.generator_cost(id);
                ShopEntry {
                    key: id.key(),
                    title: id.title(),
                    owned: self.generator_count(id),
                    cost,
                    affordable: self.can_afford(cost),
                    next_gain: Some(self.next_unit_production(id)),
                }
            })
            .collect()
    }
}
