//! System configuration parameters
//!
//! All tunable parameters for a Temp-Lab node.
//! Values can be overridden from a JSON file through a
//! [`ConfigPort`](crate::app::ports::ConfigPort) adapter; missing fields
//! fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Upper bound on one-wire temperature probes reported in telemetry.
pub const MAX_DALLAS_PROBES: u8 = 4;

/// Deployment profile that fixes the accepted telemetry-rate ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateProfile {
    /// Filtered ADC sampling: every channel read costs ~30 ms, so four
    /// channels cap the loop at roughly 10 Hz.
    Filtered,
    /// Raw single-shot sampling.
    Unfiltered,
}

impl RateProfile {
    /// Highest `SET RATE` value accepted under this profile (inclusive).
    pub const fn max_rate_hz(self) -> f32 {
        match self {
            Self::Filtered => 10.0,
            Self::Unfiltered => 1000.0,
        }
    }
}

/// What to do with a non-empty line that is not a recognised command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCommandPolicy {
    /// Drop the line; the host notices the missing ack.
    Silent,
    /// Answer with `{"type":"error","msg":"unknown_command"}`.
    Report,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Identity ---
    /// Device name announced in the hello message
    pub device_name: String,

    // --- Telemetry ---
    /// Telemetry rate after boot (Hz)
    pub default_rate_hz: f32,
    /// Rate ceiling profile for `SET RATE`
    pub rate_profile: RateProfile,
    /// ADC noise filter state after boot
    pub filter_enabled_at_boot: bool,

    // --- Safety ---
    /// Command silence (ms) tolerated while running
    pub safety_timeout_ms: u32,
    /// Emit a `safety_timeout` error on the wire when the watchdog trips
    pub report_safety_timeout: bool,

    // --- Protocol ---
    /// Handling of unrecognised lines
    pub unknown_command_policy: UnknownCommandPolicy,

    // --- Host runner ---
    /// Sleep between control loop iterations (ms)
    pub loop_idle_ms: u32,
    /// Number of simulated one-wire probes
    pub dallas_probes: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            device_name: String::from("temp-lab-v2"),

            default_rate_hz: 2.0,
            rate_profile: RateProfile::Filtered,
            filter_enabled_at_boot: false,

            safety_timeout_ms: 3000,
            report_safety_timeout: false,

            unknown_command_policy: UnknownCommandPolicy::Silent,

            loop_idle_ms: 1,
            dallas_probes: 2,
        }
    }
}

impl SystemConfig {
    /// Accepted `SET RATE` ceiling for this deployment.
    pub fn max_rate_hz(&self) -> f32 {
        self.rate_profile.max_rate_hz()
    }

    /// Reject values that would break a runtime invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.default_rate_hz;
        if rate.is_nan() || rate <= 0.0 || rate > self.max_rate_hz() {
            return Err(ConfigError::ValidationFailed(
                "default_rate_hz must be in (0, max rate of the profile]",
            ));
        }
        if self.safety_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "safety_timeout_ms must be non-zero",
            ));
        }
        if self.dallas_probes > MAX_DALLAS_PROBES {
            return Err(ConfigError::ValidationFailed(
                "dallas_probes exceeds the one-wire bus limit",
            ));
        }
        Ok(())
    }
}
