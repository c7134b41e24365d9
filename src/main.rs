//! Temp-Lab host runner, main entry point.
//!
//! Runs the control core against simulated sensors, with the command
//! link on stdin/stdout.  Usage: `templab [config.json]`.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SerialLink<StdioTransport>  LoggingActuators  MonotonicClock  │
//! │  (LinePort + EventSink)      (ActuatorPort)    (ClockPort)     │
//! │  SimTemperatureBus / SimAdcChannel → SensorHub<SpinDelay>      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Dispatcher · Watchdog · Scheduler                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use templab::adapters::config_file::JsonConfigFile;
use templab::adapters::console_log::ConsoleLogger;
use templab::adapters::delay::SpinDelay;
use templab::adapters::hardware::LoggingActuators;
use templab::adapters::serial_link::SerialLink;
use templab::adapters::simulated::{SimAdcChannel, SimTemperatureBus};
use templab::adapters::stdio::StdioTransport;
use templab::adapters::time::MonotonicClock;
use templab::app::ports::{ClockPort, ConfigError, ConfigPort};
use templab::app::service::AppService;
use templab::config::SystemConfig;
use templab::sensors::{AdcChannelId, SensorHub};

// ── Config ────────────────────────────────────────────────────

fn load_config(path: Option<String>) -> Result<SystemConfig> {
    let Some(path) = path else {
        info!("No config file given, using defaults");
        return Ok(SystemConfig::default());
    };
    match JsonConfigFile::new(&path).load() {
        Ok(cfg) => Ok(cfg),
        Err(ConfigError::NotFound) => {
            warn!("Config file {} not found, using defaults", path);
            Ok(SystemConfig::default())
        }
        Err(e) => Err(templab::error::Error::from(e)).with_context(|| format!("loading {path}")),
    }
}

// ── Simulated sensors ─────────────────────────────────────────

fn build_sensors(config: &SystemConfig) -> SensorHub<SpinDelay> {
    SensorHub::new(SpinDelay)
        .with_bme(SimTemperatureBus::new(1, 22.5, 1))
        .with_tmp(SimTemperatureBus::new(1, 22.8, 2))
        .with_dallas(SimTemperatureBus::new(
            usize::from(config.dallas_probes),
            21.0,
            3,
        ))
        .with_adc(AdcChannelId::AdsResistor, SimAdcChannel::new(1650, 10))
        .with_adc(AdcChannelId::AdsNtc, SimAdcChannel::new(1480, 11))
        .with_adc(AdcChannelId::EspResistor, SimAdcChannel::new(1640, 12))
        .with_adc(AdcChannelId::EspNtc, SimAdcChannel::new(1475, 13))
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    let level = ConsoleLogger::init().context("installing logger")?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Temp-Lab node v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!("Log level: {}", level);

    let config = load_config(std::env::args().nth(1))?;
    info!(
        "Config: device={} rate={} Hz (max {}) watchdog={} ms unknown={:?}",
        config.device_name,
        config.default_rate_hz,
        config.max_rate_hz(),
        config.safety_timeout_ms,
        config.unknown_command_policy
    );

    let clock = MonotonicClock::new();
    let mut actuators = LoggingActuators::new();
    let mut link = SerialLink::new(StdioTransport::spawn().context("starting stdin reader")?);
    let mut service = AppService::new(&config, build_sensors(&config));
    let idle = Duration::from_millis(u64::from(config.loop_idle_ms));

    service.start(&mut link);

    while link.is_open() {
        service.tick(clock.now_ms(), &mut link, &mut actuators);
        thread::sleep(idle);
    }

    info!(
        "Input closed: {} lines, {} overflows, {} send failures",
        service.lines_received(),
        link.overflow_count(),
        link.send_failures()
    );
    service.shutdown(&mut actuators);
    Ok(())
}
