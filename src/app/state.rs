//! Runtime state owned by the dispatcher.
//!
//! One explicit struct replaces free-standing run/rate/timestamp globals.
//! It is created by [`Dispatcher::new`](super::dispatcher::Dispatcher::new)
//! and only mutated by command application and the watchdog check.

use crate::config::SystemConfig;

/// The two states of the run/stop machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not running: no telemetry, actuators stopped.
    Idle,
    /// Running: telemetry at `rate_hz`, watchdog armed.
    Active,
}

/// Mutable node state.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeState {
    pub running: bool,
    /// Telemetry rate; always `> 0`.
    pub rate_hz: f32,
    /// Monotonic time of the last recognised command.
    pub last_command_ms: u64,
    pub filter_enabled: bool,
}

impl RuntimeState {
    /// Boot state: idle, rate and filter from `config`.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            running: false,
            rate_hz: config.default_rate_hz,
            last_command_ms: 0,
            filter_enabled: config.filter_enabled_at_boot,
        }
    }

    pub fn run_state(&self) -> RunState {
        if self.running {
            RunState::Active
        } else {
            RunState::Idle
        }
    }
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new(&SystemConfig::default())
    }
}
