//! Outbound application events.
//!
//! The [`Dispatcher`](super::dispatcher::Dispatcher) and
//! [`AppService`](super::service::AppService) emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: the serial link encodes them as JSON
//! lines, tests record them.

use core::fmt;

use heapless::{String, Vec};

use crate::config::MAX_DALLAS_PROBES;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Sent once at startup.
    Hello(Capabilities),

    /// A command was accepted and applied.
    Ack(Ack),

    /// A command was rejected, or a policy-driven diagnostic.
    Error(ProtocolError),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryFrame),
}

/// Acknowledgment correlated to an applied command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ack {
    Start,
    Stop,
    /// Carries the rate that was actually stored.
    SetRate(f32),
    SetPwm,
    SetFilter,
}

impl Ack {
    /// Wire name used in the `cmd` field.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::SetRate(_) => "set_rate",
            Self::SetPwm => "set_pwm",
            Self::SetFilter => "set_filter",
        }
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetRate(rate) => write!(f, "set_rate({rate:.4})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Error messages the core can put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// `SET RATE` outside `(0, max]` for the active profile.
    InvalidRate,
    /// Non-empty line that parsed to nothing (report policy only).
    UnknownCommand,
    /// The watchdog forced a stop (when reporting is enabled).
    SafetyTimeout,
}

impl ProtocolError {
    /// Wire text used in the `msg` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRate => "invalid_rate",
            Self::UnknownCommand => "unknown_command",
            Self::SafetyTimeout => "safety_timeout",
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensor inventory announced in the hello message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub device: std::string::String,
    pub bme: bool,
    pub dallas: u8,
    pub adc: bool,
    pub tmp: bool,
}

// ───────────────────────────────────────────────────────────────
// Telemetry frame
// ───────────────────────────────────────────────────────────────

/// Fixed fields (BME, four ADC channels, TMP) plus one per one-wire probe.
pub const MAX_TELEMETRY_FIELDS: usize = 6 + MAX_DALLAS_PROBES as usize;

/// Telemetry key, e.g. `T_BME` or `V_ADS_NTC`.
pub type FieldName = String<12>;

/// One named reading.  `value == None` marks a failed or absent sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryField {
    pub name: FieldName,
    pub value: Option<f32>,
    /// Decimal places on the wire.
    pub decimals: u8,
}

/// A point-in-time telemetry snapshot, fields in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    pub t_ms: u64,
    fields: Vec<TelemetryField, MAX_TELEMETRY_FIELDS>,
}

impl TelemetryFrame {
    pub fn new(t_ms: u64) -> Self {
        Self {
            t_ms,
            fields: Vec::new(),
        }
    }

    /// Append a reading.  Non-finite values (the sensor NaN sentinel) are
    /// stored as `None`.  Returns `false` if the frame is full or the
    /// name does not fit.
    pub fn push(&mut self, name: &str, reading: f32, decimals: u8) -> bool {
        let Ok(name) = FieldName::try_from(name) else {
            return false;
        };
        let value = reading.is_finite().then_some(reading);
        self.fields
            .push(TelemetryField {
                name,
                value,
                decimals,
            })
            .is_ok()
    }

    pub fn fields(&self) -> &[TelemetryField] {
        &self.fields
    }

    /// Look up a reading by name.  `Some(None)` means present but failed.
    pub fn get(&self, name: &str) -> Option<Option<f32>> {
        self.fields
            .iter()
            .find(|f| f.name.as_str() == name)
            .map(|f| f.value)
    }
}
