//! Cost and production curves.
//!
//! Pure functions. Callers pass non-negative finite inputs.

/// Cost growth per owned unit, shared by every catalog.
pub const GROWTH_RATE: f64 = 1.15;

/// Generator efficiency gained per Auto Tuner level.
pub const EFFICIENCY_PER_LEVEL: f64 = 0.2;

/// Price of the next unit when `owned` are already owned. Never below 1.
///
/// Counts past `i32::MAX` price like `i32::MAX`, which is already infinite
/// for any positive base.
pub fn cost_at(base_cost: f64, owned: u32) -> f64 {
    let exponent = i32::try_from(owned).unwrap_or(i32::MAX);
    (base_cost * GROWTH_RATE.powi(exponent)).floor().max(1.0)
}

/// Aura per second produced by `owned` units.
pub fn production_at(base_production: f64, owned: u32, efficiency: f64) -> f64 {
    base_production * owned as f64 * efficiency
}

/// Efficiency multiplier for a given Auto Tuner level.
///
/// Levels stack: each purchase adds another 20% of base output.
pub fn efficiency_multiplier(level: u32) -> f64 {
    1.0 + EFFICIENCY_PER_LEVEL * level as f64
}
