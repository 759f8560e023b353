//! Static catalogs: upgrades, generators and achievements.
//!
//! `GameState` only stores owned counts keyed by these ids; titles, costs
//! and effects are looked up here.

/// Repeatable upgrades. Every purchase applies the effect once more.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpgradeId {
    SharpFingers,
    AuraChanneling,
    MinorMultiplier,
    AutoTuner,
    GoldenAura,
}

/// What buying an upgrade does to the state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpgradeEffect {
    /// Multiply Aura per click.
    MultiplyClick(f64),
    /// Add a flat amount to Aura per click.
    AddClick(f64),
    /// Multiply both click yield and current production.
    MultiplyIncome(f64),
    /// Raise generator efficiency by one level (see `formula::efficiency_multiplier`).
    GeneratorEfficiency,
}

impl UpgradeId {
    /// All upgrades in shop order.
    pub fn all() -> &'static [UpgradeId] {
        &[
            UpgradeId::SharpFingers,
            UpgradeId::AuraChanneling,
            UpgradeId::MinorMultiplier,
            UpgradeId::AutoTuner,
            UpgradeId::GoldenAura,
        ]
    }

    /// Stable key used in the persisted blob.
    pub fn key(&self) -> &'static str {
        match self {
            UpgradeId::SharpFingers => "click2",
            UpgradeId::AuraChanneling => "click5",
            UpgradeId::MinorMultiplier => "mult1",
            UpgradeId::AutoTuner => "autoBoost",
            UpgradeId::GoldenAura => "goldenAura",
        }
    }

    pub fn from_key(key: &str) -> Option<UpgradeId> {
        Self::all().iter().copied().find(|u| u.key() == key)
    }

    pub fn title(&self) -> &'static str {
        match self {
            UpgradeId::SharpFingers => "Sharp Fingers",
            UpgradeId::AuraChanneling => "Aura Channeling",
            UpgradeId::MinorMultiplier => "Minor Multiplier",
            UpgradeId::AutoTuner => "Auto Tuner",
            UpgradeId::GoldenAura => "Golden Aura",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeId::SharpFingers => "Double aura per click",
            UpgradeId::AuraChanneling => "Increase click by +5",
            UpgradeId::MinorMultiplier => "Multiply all income by 1.5",
            UpgradeId::AutoTuner => "Increase generator efficiency by 20%",
            UpgradeId::GoldenAura => "Small permanent bonus +10 to per click",
        }
    }

    /// Cost of the first purchase.
    pub fn base_cost(&self) -> f64 {
        match self {
            UpgradeId::SharpFingers => 25.0,
            UpgradeId::AuraChanneling => 150.0,
            UpgradeId::MinorMultiplier => 500.0,
            UpgradeId::AutoTuner => 2_500.0,
            UpgradeId::GoldenAura => 15_000.0,
        }
    }

    pub fn effect(&self) -> UpgradeEffect {
        match self {
            UpgradeId::SharpFingers => UpgradeEffect::MultiplyClick(2.0),
            UpgradeId::AuraChanneling => UpgradeEffect::AddClick(5.0),
            UpgradeId::MinorMultiplier => UpgradeEffect::MultiplyIncome(1.5),
            UpgradeId::AutoTuner => UpgradeEffect::GeneratorEfficiency,
            UpgradeId::GoldenAura => UpgradeEffect::AddClick(10.0),
        }
    }
}

/// Passive producers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GeneratorId {
    AuraBubble,
    LuminousOrb,
    PrismReactor,
}

impl GeneratorId {
    /// All generators in shop order.
    pub fn all() -> &'static [GeneratorId] {
        &[
            GeneratorId::AuraBubble,
            GeneratorId::LuminousOrb,
            GeneratorId::PrismReactor,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            GeneratorId::AuraBubble => "g1",
            GeneratorId::LuminousOrb => "g2",
            GeneratorId::PrismReactor => "g3",
        }
    }

    pub fn from_key(key: &str) -> Option<GeneratorId> {
        Self::all().iter().copied().find(|g| g.key() == key)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GeneratorId::AuraBubble => "Aura Bubble",
            GeneratorId::LuminousOrb => "Luminous Orb",
            GeneratorId::PrismReactor => "Prism Reactor",
        }
    }

    pub fn base_cost(&self) -> f64 {
        match self {
            GeneratorId::AuraBubble => 10.0,
            GeneratorId::LuminousOrb => 100.0,
            GeneratorId::PrismReactor => 1_000.0,
        }
    }

    /// Aura per second per unit, before efficiency.
    pub fn base_production(&self) -> f64 {
        match self {
            GeneratorId::AuraBubble => 0.2,
            GeneratorId::LuminousOrb => 2.0,
            GeneratorId::PrismReactor => 20.0,
        }
    }
}

/// When an achievement unlocks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementCondition {
    /// Lifetime Aura of the current run reached the threshold.
    TotalAura(f64),
    /// Upgrade purchases (repeats included) reached the count.
    UpgradePurchases(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AchievementId {
    FirstClick,
    Rich,
    Collector,
}

impl AchievementId {
    pub fn all() -> &'static [AchievementId] {
        &[
            AchievementId::FirstClick,
            AchievementId::Rich,
            AchievementId::Collector,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            AchievementId::FirstClick => "firstClick",
            AchievementId::Rich => "rich",
            AchievementId::Collector => "collector",
        }
    }

    pub fn from_key(key: &str) -> Option<AchievementId> {
        Self::all().iter().copied().find(|a| a.key() == key)
    }

    pub fn title(&self) -> &'static str {
        match self {
            AchievementId::FirstClick => "First Click",
            AchievementId::Rich => "1,000 Aura",
            AchievementId::Collector => "Buy 10 upgrades",
        }
    }

    pub fn condition(&self) -> AchievementCondition {
        match self {
            AchievementId::FirstClick => AchievementCondition::TotalAura(1.0),
            AchievementId::Rich => AchievementCondition::TotalAura(1_000.0),
            AchievementId::Collector => AchievementCondition::UpgradePurchases(10),
        }
    }
}
