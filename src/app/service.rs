//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the dispatcher, the sensor hub and the telemetry
//! scheduler.  It exposes one hardware-agnostic control-loop iteration,
//! [`AppService::tick`].  All I/O flows through port traits injected at
//! call sites, so the whole service runs against mock adapters in tests.
//!
//! ```text
//!     LinePort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                  │          AppService           │
//! ActuatorPort ◀── │ Dispatcher · Watchdog · Hub   │
//!                  └──────────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::config::{SystemConfig, UnknownCommandPolicy};
use crate::protocol::command::{self, Command};
use crate::scheduler::TelemetryScheduler;
use crate::sensors::SensorHub;

use super::dispatcher::Dispatcher;
use super::events::{AppEvent, ProtocolError};
use super::ports::{ActuatorPort, EventSink, LinePort};
use super::state::RunState;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService<D: DelayNs> {
    dispatcher: Dispatcher,
    sensors: SensorHub<D>,
    scheduler: TelemetryScheduler,
    device_name: String,
    unknown_policy: UnknownCommandPolicy,
    tick_count: u64,
    lines_received: u64,
    frames_sent: u64,
}

impl<D: DelayNs> AppService<D> {
    /// Construct the service.  Does **not** announce itself; call
    /// [`start`](Self::start) once the link is up.
    pub fn new(config: &SystemConfig, sensors: SensorHub<D>) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
            sensors,
            scheduler: TelemetryScheduler::new(),
            device_name: config.device_name.clone(),
            unknown_policy: config.unknown_command_policy,
            tick_count: 0,
            lines_received: 0,
            frames_sent: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Emit the hello message.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        let caps = self.sensors.capabilities(&self.device_name);
        info!(
            "{} up: bme={} dallas={} adc={} tmp={}",
            caps.device, caps.bme, caps.dallas, caps.adc, caps.tmp
        );
        sink.emit(&AppEvent::Hello(caps));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control-loop iteration: command intake → watchdog →
    /// telemetry.
    ///
    /// The `link` parameter satisfies **both** [`LinePort`] and
    /// [`EventSink`], which avoids a double mutable borrow of the one
    /// serial link.
    pub fn tick(
        &mut self,
        now_ms: u64,
        link: &mut (impl LinePort + EventSink),
        hw: &mut impl ActuatorPort,
    ) {
        self.tick_count += 1;

        // 1. At most one recognised command
        if let Some(cmd) = self.next_command(link) {
            self.dispatcher.apply(cmd, now_ms, hw, link);
        }

        // 2. Safety evaluation
        self.dispatcher.check_safety_timeout(now_ms, hw, link);

        // 3. Telemetry, if running and due
        if self.dispatcher.is_running() && self.scheduler.due(now_ms, self.dispatcher.rate_hz()) {
            let frame = self
                .sensors
                .sample(now_ms, self.dispatcher.filter_enabled());
            link.emit(&AppEvent::Telemetry(frame));
            self.frames_sent += 1;
        }
    }

    /// Drive every actuator to its safe state (host shutdown path).
    pub fn shutdown(&mut self, hw: &mut impl ActuatorPort) {
        info!(
            "Shutting down after {} ticks, {} frames",
            self.tick_count, self.frames_sent
        );
        hw.stop_all();
    }

    /// Drain lines until one parses to a real command.  Unrecognised lines
    /// are consumed here so a burst of noise cannot stall valid input
    /// behind it.
    fn next_command(&mut self, link: &mut (impl LinePort + EventSink)) -> Option<Command> {
        while let Some(line) = link.poll_line() {
            self.lines_received += 1;
            debug!("RX | {}", line);
            let cmd = command::parse_deferred(&line);
            if cmd.is_recognized() {
                return Some(cmd);
            }
            match self.unknown_policy {
                UnknownCommandPolicy::Silent => debug!("Ignoring unrecognised line"),
                UnknownCommandPolicy::Report => {
                    link.emit(&AppEvent::Error(ProtocolError::UnknownCommand));
                }
            }
        }
        None
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn run_state(&self) -> RunState {
        self.dispatcher.run_state()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Non-empty lines taken off the link, recognised or not.
    pub fn lines_received(&self) -> u64 {
        self.lines_received
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}
