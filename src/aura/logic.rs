//! Aura game logic: pure state transitions, fully testable.
//!
//! Every mutating operation here finishes with `recalculate`, so derived
//! values are current as soon as the call returns. Failed operations return
//! an error before touching the state.

use rand::Rng;

use super::catalog::{AchievementCondition, AchievementId, GeneratorId, UpgradeEffect, UpgradeId};
use super::state::{GameState, BASE_CLICK};
use crate::error::EconomyError;

/// Entry cost of the lucky spin.
pub const SPIN_COST: f64 = 50.0;
/// Lifetime Aura needed for one prestige point.
pub const PRESTIGE_THRESHOLD: f64 = 10_000.0;
/// Base click bonus per prestige point.
pub const PRESTIGE_SCALING: f64 = 0.5;

/// Bonus per click granted by the spin's middle band.
const SPIN_CLICK_BONUS: f64 = 2.0;

/// A completed purchase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Purchase {
    /// Aura debited.
    pub cost: f64,
    /// Owned count after the purchase.
    pub owned: u32,
}

/// Re-derive production from owned generators and coerce corrupted numbers.
pub fn recalculate(state: &mut GameState) {
    let per_sec: f64 = GeneratorId::all()
        .iter()
        .map(|&g| state.generator_production(g))
        .sum();
    state.per_sec = round_to(per_sec, 4);
    state.sanitize();
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Unlock every achievement whose condition now holds. Returns the newly
/// unlocked ones in catalog order.
pub fn check_achievements(state: &mut GameState) -> Vec<AchievementId> {
    let mut unlocked = Vec::new();
    for &id in AchievementId::all() {
        if state.achievements.contains(&id) {
            continue;
        }
        let met = match id.condition() {
            AchievementCondition::TotalAura(threshold) => state.total_aura >= threshold,
            AchievementCondition::UpgradePurchases(count) => state.upgrade_purchases() >= count,
        };
        if met {
            state.achievements.insert(id);
            unlocked.push(id);
        }
    }
    unlocked
}

/// Manual click. The yield varies by ±`variance` and is floored; a variance
/// of 0 uses the exact click value and draws nothing from `rng`.
pub fn click<R: Rng>(state: &mut GameState, variance: f64, rng: &mut R) -> f64 {
    let factor = if variance > 0.0 {
        1.0 + (rng.gen::<f64>() * 2.0 * variance - variance)
    } else {
        1.0
    };
    let gained = (state.per_click * factor).floor().max(0.0);
    let gained = if gained.is_finite() { gained } else { 0.0 };
    state.aura += gained;
    state.total_aura += gained;
    recalculate(state);
    gained
}

/// Buy one more of `id`. Leaves the state untouched if unaffordable.
pub fn purchase_upgrade(state: &mut GameState, id: UpgradeId) -> Result<Purchase, EconomyError> {
    let cost = state.upgrade_cost(id);
    if !state.can_afford(cost) {
        return Err(EconomyError::InsufficientFunds {
            cost,
            available: state.aura,
        });
    }

    state.aura = (state.aura - cost).max(0.0);
    let owned = state.upgrade_count(id).saturating_add(1);
    state.upgrades.insert(id, owned);
    apply_upgrade_effect(state, id.effect());
    recalculate(state);

    Ok(Purchase { cost, owned })
}

fn apply_upgrade_effect(state: &mut GameState, effect: UpgradeEffect) {
    match effect {
        UpgradeEffect::MultiplyClick(m) => state.per_click *= m,
        UpgradeEffect::AddClick(amount) => state.per_click += amount,
        UpgradeEffect::MultiplyIncome(m) => {
            state.per_click *= m;
            // per_sec is re-derived right after, so only the click half persists.
            state.per_sec *= m;
        }
        // Read from the owned count by `GameState::efficiency`.
        UpgradeEffect::GeneratorEfficiency => {}
    }
}

/// Buy one more unit of `id`. Leaves the state untouched if unaffordable.
pub fn purchase_generator(
    state: &mut GameState,
    id: GeneratorId,
) -> Result<Purchase, EconomyError> {
    let cost = state.generator_cost(id);
    if !state.can_afford(cost) {
        return Err(EconomyError::InsufficientFunds {
            cost,
            available: state.aura,
        });
    }

    state.aura = (state.aura - cost).max(0.0);
    let owned = state.generator_count(id).saturating_add(1);
    state.generators.insert(id, owned);
    recalculate(state);

    Ok(Purchase { cost, owned })
}

/// Add `elapsed_secs` worth of passive production. Returns the amount added.
///
/// Nothing is added when production or elapsed time is not positive, or
/// when the product is not finite.
pub fn accrue(state: &mut GameState, elapsed_secs: f64) -> f64 {
    // NaN fails both comparisons.
    let positive = state.per_sec > 0.0 && elapsed_secs > 0.0;
    if !positive {
        return 0.0;
    }
    let amount = state.per_sec * elapsed_secs;
    if !amount.is_finite() {
        return 0.0;
    }
    state.aura += amount;
    state.total_aura += amount;
    recalculate(state);
    amount
}

/// Passive income driven by wall-clock timestamps.
///
/// Each tick credits the time since the previous one, so accrual stays
/// correct across slow ticks and suspended tabs.
#[derive(Clone, Debug)]
pub struct Accrual {
    last_tick_ms: f64,
}

impl Accrual {
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_tick_ms: now_ms,
        }
    }

    pub fn tick(&mut self, state: &mut GameState, now_ms: f64) -> f64 {
        let elapsed = (now_ms - self.last_tick_ms) / 1000.0;
        let added = accrue(state, elapsed);
        if now_ms.is_finite() {
            self.last_tick_ms = now_ms;
        }
        added
    }

    pub fn last_tick_ms(&self) -> f64 {
        self.last_tick_ms
    }
}

/// Outcome band of a spin, picked from one uniform sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinBand {
    /// `[0, 0.5)`
    Small,
    /// `[0.5, 0.85)`
    ClickBoost,
    /// `[0.85, 1)`
    Jackpot,
}

/// Map a sample in `[0, 1)` to its band. Boundaries belong to the upper band.
pub fn spin_band(sample: f64) -> SpinBand {
    if sample < 0.5 {
        SpinBand::Small
    } else if sample < 0.85 {
        SpinBand::ClickBoost
    } else {
        SpinBand::Jackpot
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpinOutcome {
    Small { reward: f64 },
    ClickBoost { bonus: f64 },
    Jackpot { reward: f64 },
}

/// Lucky spin: pay `SPIN_COST`, receive one weighted reward.
pub fn spin<R: Rng>(state: &mut GameState, rng: &mut R) -> Result<SpinOutcome, EconomyError> {
    if !state.can_afford(SPIN_COST) {
        return Err(EconomyError::InsufficientFunds {
            cost: SPIN_COST,
            available: state.aura,
        });
    }
    state.aura = (state.aura - SPIN_COST).max(0.0);

    let outcome = match spin_band(rng.gen::<f64>()) {
        SpinBand::Small => {
            let reward = (25.0 + rng.gen::<f64>() * 75.0).floor();
            state.aura += reward;
            state.total_aura += reward;
            SpinOutcome::Small { reward }
        }
        SpinBand::ClickBoost => {
            state.per_click += SPIN_CLICK_BONUS;
            SpinOutcome::ClickBoost {
                bonus: SPIN_CLICK_BONUS,
            }
        }
        SpinBand::Jackpot => {
            let reward = (200.0 + rng.gen::<f64>() * 800.0).floor();
            state.aura += reward;
            state.total_aura += reward;
            SpinOutcome::Jackpot { reward }
        }
    };
    recalculate(state);
    Ok(outcome)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrestigeOutcome {
    /// Points earned by this rebirth.
    pub awarded: u64,
    /// Prestige points held afterwards.
    pub total: u64,
}

/// Prestige points a rebirth would award right now.
pub fn pending_prestige_points(state: &GameState) -> u64 {
    if state.total_aura >= PRESTIGE_THRESHOLD {
        (state.total_aura / PRESTIGE_THRESHOLD).floor() as u64
    } else {
        0
    }
}

/// Rebirth: convert lifetime Aura into prestige points and clear the run.
///
/// The caller confirms intent first. Below the threshold this reports the
/// shortfall and changes nothing.
pub fn prestige(state: &mut GameState) -> Result<PrestigeOutcome, EconomyError> {
    if state.total_aura < PRESTIGE_THRESHOLD {
        return Err(EconomyError::BelowPrestigeThreshold {
            threshold: PRESTIGE_THRESHOLD,
            shortfall: PRESTIGE_THRESHOLD - state.total_aura,
        });
    }

    let awarded = pending_prestige_points(state);
    state.prestige_points = state.prestige_points.saturating_add(awarded);

    state.aura = 0.0;
    state.total_aura = 0.0;
    state.per_click = BASE_CLICK + state.prestige_points as f64 * PRESTIGE_SCALING;
    state.upgrades.clear();
    state.generators.clear();
    state.achievements.clear();
    recalculate(state);

    Ok(PrestigeOutcome {
        awarded,
        total: state.prestige_points,
    })
}

/// Short human form: `1.5k`, `2.00M`, `3.10B`, `1.00T`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "0".to_string();
    }
    if n >= 1e12 {
        format!("{:.2}T", n / 1e12)
    } else if n >= 1e9 {
        format!("{:.2}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.2}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.1}k", n / 1e3)
    } else {
        format!("{}", n.floor() as i64)
    }
}
