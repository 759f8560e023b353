//! Wall clock and fixed-interval cadences.
//!
//! The host calls `AuraGame::update(now_ms)` from whatever frame or timer
//! callback it has. A `Cadence` converts that stream of timestamps into
//! "this interval elapsed" signals using an accumulator, so the accrual
//! tick and the autosave flush fire at their designed rates regardless of
//! how often the host calls in.

/// Current wall-clock time in milliseconds.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in milliseconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

pub struct Cadence {
    /// Milliseconds between fires (e.g. 500ms = twice per second)
    interval_ms: f64,
    /// Accumulated milliseconds not yet consumed as fires
    accumulator: f64,
    /// Total fires since creation
    pub total_fires: u64,
    /// Timestamp of the last update (ms), None before the first one
    last_timestamp: Option<f64>,
}

impl Cadence {
    /// Create a cadence firing once every `interval_ms` milliseconds.
    /// Non-positive intervals are treated as 1ms.
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: if interval_ms > 0.0 { interval_ms } else { 1.0 },
            accumulator: 0.0,
            total_fires: 0,
            last_timestamp: None,
        }
    }

    /// Create a cadence whose clock starts at `now_ms`.
    pub fn starting_at(interval_ms: f64, now_ms: f64) -> Self {
        let mut cadence = Self::new(interval_ms);
        cadence.last_timestamp = Some(now_ms);
        cadence
    }

    /// Feed a wall-clock timestamp. Returns how many whole intervals
    /// elapsed since the previous call. A clock that moves backwards
    /// contributes nothing.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) if now_ms.is_finite() => (now_ms - prev).max(0.0),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_timestamp = Some(now_ms);
        }

        self.accumulator += delta;
        let fires = (self.accumulator / self.interval_ms).min(u32::MAX as f64) as u32;
        self.accumulator -= fires as f64 * self.interval_ms;
        self.total_fires += fires as u64;
        fires
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}
