//! Actuator adapter for the host runner.
//!
//! There is no PWM hardware on the host, so [`LoggingActuators`] records
//! the last heater and cooler setpoints and logs every change.  A board
//! build would put the real PWM drivers behind the same [`ActuatorPort`].

use log::{info, warn};

use crate::app::ports::ActuatorPort;

/// Setpoint-tracking actuator stand-in.
#[derive(Debug, Default)]
pub struct LoggingActuators {
    heater: f32,
    cooler: f32,
    stop_count: u32,
}

impl LoggingActuators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heater(&self) -> f32 {
        self.heater
    }

    pub fn cooler(&self) -> f32 {
        self.cooler
    }

    /// Number of `stop_all` calls, including forced stops.
    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for LoggingActuators {
    fn set_heater(&mut self, value: f32) {
        if !value.is_finite() {
            warn!("HEATER | ignoring non-finite setpoint");
            return;
        }
        self.heater = value;
        info!("HEATER | {:.3}", value);
    }

    fn set_cooler(&mut self, value: f32) {
        if !value.is_finite() {
            warn!("COOLER | ignoring non-finite setpoint");
            return;
        }
        self.cooler = value;
        info!("COOLER | {:.3}", value);
    }

    fn stop_all(&mut self) {
        self.heater = 0.0;
        self.cooler = 0.0;
        self.stop_count = self.stop_count.saturating_add(1);
        info!("ACTUATORS | all stopped");
    }
}
