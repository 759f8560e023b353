//! Balance simulator for Aura.
//! Run with: cargo test simulate_greedy -- --nocapture

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::aura::catalog::{GeneratorId, UpgradeId};
    use crate::aura::logic;
    use crate::aura::state::GameState;

    /// Clicks per simulated second.
    const CLICK_RATE: u32 = 5;

    /// The bot stops buying an upgrade at this level. Repeated Sharp
    /// Fingers doubles the click each time, which overflows to infinity
    /// within seconds of greedy play.
    const MAX_UPGRADE_LEVEL: u32 = 3;

    enum Buy {
        Generator(GeneratorId),
        Upgrade(UpgradeId),
    }

    /// Cheapest-payback affordable purchase, if any.
    fn best_purchase(state: &GameState) -> Option<Buy> {
        let mut best: Option<(f64, Buy)> = None;

        for &g in GeneratorId::all() {
            let cost = state.generator_cost(g);
            let gain = state.next_unit_production(g);
            if !state.can_afford(cost) || gain <= 0.0 {
                continue;
            }
            let payback = cost / gain;
            if beats(&best, payback) {
                best = Some((payback, Buy::Generator(g)));
            }
        }

        for &u in UpgradeId::all() {
            let cost = state.upgrade_cost(u);
            if state.upgrade_count(u) >= MAX_UPGRADE_LEVEL || !state.can_afford(cost) {
                continue;
            }
            let gain = estimate_upgrade_gain(state, u);
            if gain <= 0.0 {
                continue;
            }
            let payback = cost / gain;
            if beats(&best, payback) {
                best = Some((payback, Buy::Upgrade(u)));
            }
        }

        best.map(|(_, b)| b)
    }

    fn beats(best: &Option<(f64, Buy)>, payback: f64) -> bool {
        match best {
            Some((current, _)) => payback < *current,
            None => true,
        }
    }

    /// Aura per second the upgrade would add at the current click rate.
    fn estimate_upgrade_gain(state: &GameState, id: UpgradeId) -> f64 {
        let mut after = state.clone();
        after.aura = f64::MAX;
        if logic::purchase_upgrade(&mut after, id).is_err() {
            return 0.0;
        }
        let income = |s: &GameState| s.per_sec + s.per_click * CLICK_RATE as f64;
        income(&after) - income(state)
    }

    /// Play greedily for `seconds`, returning the final state.
    fn simulate(seconds: u32) -> GameState {
        let mut state = GameState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..seconds {
            for _ in 0..CLICK_RATE {
                logic::click(&mut state, 0.04, &mut rng);
            }
            logic::accrue(&mut state, 1.0);
            while let Some(buy) = best_purchase(&state) {
                let bought = match buy {
                    Buy::Generator(g) => logic::purchase_generator(&mut state, g),
                    Buy::Upgrade(u) => logic::purchase_upgrade(&mut state, u),
                };
                assert!(bought.is_ok(), "greedy bot chose an unaffordable item");
                assert!(state.aura >= 0.0);
            }
            logic::check_achievements(&mut state);
        }
        state
    }

    #[test]
    fn simulate_greedy_reaches_prestige_within_an_hour() {
        let state = simulate(3_600);
        println!(
            "after 1h: total={} per_click={} per_sec={} upgrades={:?} generators={:?}",
            logic::format_number(state.total_aura),
            state.per_click,
            state.per_sec,
            state.upgrades,
            state.generators
        );
        assert!(state.total_aura >= logic::PRESTIGE_THRESHOLD);
        assert!(logic::pending_prestige_points(&state) >= 1);
        assert!(state.aura.is_finite() && state.aura >= 0.0);
    }

    #[test]
    fn simulate_greedy_buys_generators_early() {
        let state = simulate(120);
        let owned: u32 = GeneratorId::all()
            .iter()
            .map(|&g| state.generator_count(g))
            .sum();
        assert!(owned > 0, "no generators after two minutes");
        assert!(state.per_sec > 0.0);
    }
}
