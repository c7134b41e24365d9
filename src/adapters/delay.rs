//! Busy-wait delay for the ADC filter.
//!
//! Spins on `Instant` rather than sleeping: the filter's 300 µs spacing is
//! well below the OS scheduler's resolution.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

/// Spinning [`DelayNs`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let deadline = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < deadline {
            core::hint::spin_loop();
        }
    }
}
