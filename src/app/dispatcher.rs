//! Command dispatcher and the run/stop state machine.
//!
//! ```text
//!            START                      STOP / watchdog trip
//!   ┌──────┐ ─────────────▶ ┌────────┐ ─────────────────────▶ ┌──────┐
//!   │ Idle │                │ Active │                        │ Idle │
//!   └──────┘ ◀───────────── └────────┘                        └──────┘
//!              STOP
//! ```
//!
//! `SET RATE`, `SET PWM`, `SET FILTER` and `PING` never change the run
//! state.  Every recognised command stamps the watchdog *before* its
//! parameters are validated, so even a stream of rejected commands keeps
//! the link alive.  [`Command::None`] touches nothing.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::protocol::command::Command;
use crate::safety::SafetyWatchdog;

use super::events::{Ack, AppEvent, ProtocolError};
use super::ports::{ActuatorPort, EventSink};
use super::state::{RunState, RuntimeState};

/// PWM channel routed to the heater.
pub const HEATER_CHANNEL: i32 = 0;
/// PWM channel routed to the cooler.
pub const COOLER_CHANNEL: i32 = 1;

/// Owns [`RuntimeState`] and applies commands to it.
pub struct Dispatcher {
    state: RuntimeState,
    watchdog: SafetyWatchdog,
    max_rate_hz: f32,
    report_safety_timeout: bool,
}

impl Dispatcher {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: RuntimeState::new(config),
            watchdog: SafetyWatchdog::new(config),
            max_rate_hz: config.max_rate_hz(),
            report_safety_timeout: config.report_safety_timeout,
        }
    }

    /// Apply one parsed command received at `now_ms`.
    pub fn apply(
        &mut self,
        cmd: Command,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if !cmd.is_recognized() {
            return;
        }
        self.state.last_command_ms = now_ms;

        match cmd {
            Command::None => {}
            Command::Start => {
                self.set_running(true);
                sink.emit(&AppEvent::Ack(Ack::Start));
            }
            Command::Stop => {
                self.set_running(false);
                hw.stop_all();
                sink.emit(&AppEvent::Ack(Ack::Stop));
            }
            Command::Ping => {}
            Command::SetRate(rate) => {
                if rate > 0.0 && rate <= self.max_rate_hz {
                    self.state.rate_hz = rate;
                    info!("Telemetry rate set to {:.4} Hz", rate);
                    sink.emit(&AppEvent::Ack(Ack::SetRate(rate)));
                } else {
                    warn!(
                        "Rejected rate {} Hz (accepted: (0, {}])",
                        rate, self.max_rate_hz
                    );
                    sink.emit(&AppEvent::Error(ProtocolError::InvalidRate));
                }
            }
            Command::SetPwm { channel, value } => {
                match channel {
                    HEATER_CHANNEL => hw.set_heater(value),
                    COOLER_CHANNEL => hw.set_cooler(value),
                    other => debug!("PWM channel {} has no actuator, ignoring {}", other, value),
                }
                sink.emit(&AppEvent::Ack(Ack::SetPwm));
            }
            Command::SetFilter(enabled) => {
                self.state.filter_enabled = enabled;
                info!("ADC filter {}", if enabled { "enabled" } else { "disabled" });
                sink.emit(&AppEvent::Ack(Ack::SetFilter));
            }
        }
    }

    /// Run the watchdog.  Returns `true` if it forced a stop.
    pub fn check_safety_timeout(
        &mut self,
        now_ms: u64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let tripped = self.watchdog.check(&mut self.state, now_ms, hw);
        if tripped {
            info!("STATE | {:?} -> {:?} (watchdog)", RunState::Active, RunState::Idle);
            if self.report_safety_timeout {
                sink.emit(&AppEvent::Error(ProtocolError::SafetyTimeout));
            }
        }
        tripped
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn rate_hz(&self) -> f32 {
        self.state.rate_hz
    }

    pub fn filter_enabled(&self) -> bool {
        self.state.filter_enabled
    }

    pub fn watchdog(&self) -> &SafetyWatchdog {
        &self.watchdog
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_running(&mut self, running: bool) {
        let prev = self.state.run_state();
        self.state.running = running;
        let next = self.state.run_state();
        if prev != next {
            info!("STATE | {:?} -> {:?}", prev, next);
        }
    }
}
