//! Simulated sensors for the host runner.
//!
//! Stands in for the BME/TMP chips, the one-wire bus and the four ADC
//! inputs when no hardware is attached.  The ADC channels inject the
//! kind of noise the trimmed-mean filter exists for: small Gaussian-ish
//! jitter plus occasional large switching spikes.
//!
//! Noise comes from a seeded [`XorShiftRng`], so a given seed always
//! produces the same sample stream.

use rand_core::{RngCore, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::app::ports::{SampleSource, SensorPort};

// ── Temperature sources ───────────────────────────────────────

/// A fixed set of temperature probes drifting slowly around a baseline.
pub struct SimTemperatureBus {
    baselines: Vec<f32>,
    rng: XorShiftRng,
}

impl SimTemperatureBus {
    /// `count` probes starting at `base_c`, each 0.25 °C apart.
    pub fn new(count: usize, base_c: f32, seed: u64) -> Self {
        let baselines = (0..count).map(|i| base_c + 0.25 * i as f32).collect();
        Self {
            baselines,
            rng: XorShiftRng::seed_from_u64(seed),
        }
    }
}

impl SensorPort for SimTemperatureBus {
    fn count(&self) -> usize {
        self.baselines.len()
    }

    fn read_at(&mut self, index: usize) -> f32 {
        let Some(base) = self.baselines.get_mut(index) else {
            return f32::NAN;
        };
        // ±5 mK random walk per read
        let step = (self.rng.next_u32() % 11) as f32 - 5.0;
        *base += step * 0.001;
        *base
    }
}

// ── ADC channels ──────────────────────────────────────────────

/// One noisy ADC input, in millivolts.
pub struct SimAdcChannel {
    level_mv: i32,
    jitter_mv: u32,
    /// Chance of a spike per sample, out of 1000.
    spike_per_mille: u32,
    spike_mv: i32,
    rng: XorShiftRng,
}

impl SimAdcChannel {
    pub fn new(level_mv: i32, seed: u64) -> Self {
        Self {
            level_mv,
            jitter_mv: 3,
            spike_per_mille: 50,
            spike_mv: 800,
            rng: XorShiftRng::seed_from_u64(seed),
        }
    }

    pub fn with_noise(mut self, jitter_mv: u32, spike_per_mille: u32, spike_mv: i32) -> Self {
        self.jitter_mv = jitter_mv;
        self.spike_per_mille = spike_per_mille.min(1000);
        self.spike_mv = spike_mv;
        self
    }
}

impl SampleSource for SimAdcChannel {
    fn sample(&mut self) -> i32 {
        let span = self.jitter_mv.saturating_mul(2).saturating_add(1);
        let jitter = (self.rng.next_u32() % span) as i32 - self.jitter_mv as i32;
        let roll = self.rng.next_u32() % 1000;
        let spike = if roll < self.spike_per_mille {
            if roll % 2 == 0 { self.spike_mv } else { -self.spike_mv }
        } else {
            0
        };
        self.level_mv.saturating_add(jitter).saturating_add(spike)
    }
}
