//! Command-silence safety watchdog.
//!
//! The watchdog is polled **every loop iteration** after command intake.
//! While the node is running it expects some recognised command (a `PING`
//! is enough) at least every `timeout_ms`; when the link goes quiet for
//! longer it forces the node to `Idle` and shuts every actuator down.
//!
//! ## Trip lifecycle
//!
//! 1. `START` sets `running` and stamps `last_command_ms`.
//! 2. Every recognised command re-stamps `last_command_ms`, valid or not.
//! 3. Each iteration, [`SafetyWatchdog::check`] compares the stamp with the
//!    current time.  Strictly more than `timeout_ms` of silence trips.
//! 4. A trip clears `running` and calls `stop_all()` once.  Being idle,
//!    the watchdog stays disarmed until the next `START`.
//!
//! There are no timers or interrupts: correctness only depends on the loop
//! calling `check` at a bounded interval.  The ADC filter's ~35 ms
//! blocking read is the longest such gap.

use log::error;

use crate::app::ports::ActuatorPort;
use crate::app::state::RuntimeState;
use crate::config::SystemConfig;

/// Watchdog deadline used by the default configuration.
pub const SAFETY_TIMEOUT_MS: u32 = 3000;

/// Safety watchdog.
pub struct SafetyWatchdog {
    timeout_ms: u64,
    trips: u32,
}

impl SafetyWatchdog {
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_timeout(config.safety_timeout_ms)
    }

    pub fn with_timeout(timeout_ms: u32) -> Self {
        Self {
            timeout_ms: u64::from(timeout_ms),
            trips: 0,
        }
    }

    /// Pure predicate: is the node running past its command deadline?
    ///
    /// A `now_ms` earlier than the last command stamp counts as zero
    /// elapsed time.
    pub fn is_expired(&self, state: &RuntimeState, now_ms: u64) -> bool {
        state.running && now_ms.saturating_sub(state.last_command_ms) > self.timeout_ms
    }

    /// Enforce the deadline.  Returns `true` if this call tripped.
    pub fn check(
        &mut self,
        state: &mut RuntimeState,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
    ) -> bool {
        if !self.is_expired(state, now_ms) {
            return false;
        }

        state.running = false;
        hw.stop_all();
        self.trips = self.trips.saturating_add(1);
        error!(
            "SAFETY TIMEOUT: no command for {} ms (limit {} ms), forcing stop",
            now_ms.saturating_sub(state.last_command_ms),
            self.timeout_ms
        );
        true
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Trips since construction.
    pub fn trip_count(&self) -> u32 {
        self.trips
    }
}
