//! Telemetry scheduler.
//!
//! Turns the dispatcher's `rate_hz` into a sampling period and decides,
//! once per loop iteration, whether a telemetry frame is due.
//!
//! ```text
//!   rate_hz ──▶ period_ms = max(1, ⌊1000 / rate_hz⌋)
//!
//!   now ─┬─ never sent ─────────────────▶ due
//!        ├─ now - last >= period_ms ────▶ due
//!        └─ otherwise ──────────────────▶ wait
//! ```
//!
//! The rate is read fresh on every call, so a `SET RATE` takes effect at
//! the next iteration without resetting the phase.

/// Rate-driven telemetry pacing.
#[derive(Debug, Clone, Default)]
pub struct TelemetryScheduler {
    last_ms: Option<u64>,
}

impl TelemetryScheduler {
    pub const fn new() -> Self {
        Self { last_ms: None }
    }

    /// Sampling period for `rate_hz`, never below 1 ms.
    pub fn period_ms(rate_hz: f32) -> u64 {
        if rate_hz.is_nan() || rate_hz <= 0.0 {
            return u64::MAX;
        }
        let period = (1000.0 / f64::from(rate_hz)) as u64;
        period.max(1)
    }

    /// Returns `true` and records `now_ms` if a frame is due.
    pub fn due(&mut self, now_ms: u64, rate_hz: f32) -> bool {
        let ready = match self.last_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= Self::period_ms(rate_hz),
        };
        if ready {
            self.last_ms = Some(now_ms);
        }
        ready
    }

    /// Time of the last frame, if any.
    pub fn last_ms(&self) -> Option<u64> {
        self.last_ms
    }
}
