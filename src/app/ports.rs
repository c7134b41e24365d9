//! Port traits at the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Dispatcher / AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, the serial link, clocks, config
//! sources) implement these traits.  The domain consumes them via generics
//! or trait objects, so it never touches hardware directly.

use crate::config::SystemConfig;
use crate::protocol::line::Line;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// An indexed group of scalar sensors (a one-wire bus, or a single chip
/// reporting `count() == 1`).
pub trait SensorPort {
    /// Number of sensors discovered on this source.
    fn count(&self) -> usize;

    /// Read sensor `index`.  Returns `f32::NAN` on failure or for an
    /// index past `count()`; the caller never retries.
    fn read_at(&mut self, index: usize) -> f32;
}

/// Raw ADC channel feeding the noise filter.
pub trait SampleSource {
    /// One conversion, in integer millivolts.  Always returns a value.
    fn sample(&mut self) -> i32;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Heater setpoint (PWM channel 0).
    fn set_heater(&mut self, value: f32);

    /// Cooler setpoint (PWM channel 1).
    fn set_cooler(&mut self, value: f32);

    /// Drive every actuator to its safe (off) state.
    fn stop_all(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Link ports (driven adapter: domain ↔ host)
// ───────────────────────────────────────────────────────────────

/// Inbound side of the host link: complete, trimmed command lines.
pub trait LinePort {
    /// Next complete line, or `None` once pending input is exhausted.
    /// Never blocks.
    fn poll_line(&mut self) -> Option<Line>;
}

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (JSON lines on the
/// serial link, a test recorder, the log).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations MUST run [`SystemConfig::validate`] before returning,
/// so the dispatcher never starts with a rate outside the profile.
pub trait ConfigPort {
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config source found (first boot, no file given).
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the backing store.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::NotFound => Self::Config("not found"),
            ConfigError::Corrupted => Self::Config("corrupted"),
            ConfigError::IoError => Self::Config("I/O error"),
        }
    }
}
