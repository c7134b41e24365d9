//! Sensor subsystem: the trimmed-mean filter and the aggregating [`SensorHub`].
//!
//! The hub is the single owner of every sensor collaborator.  The service
//! asks it for one [`TelemetryFrame`] per telemetry tick and for the
//! capability flags announced at startup; nothing else touches a sensor.
//!
//! Missing hardware is modelled, not special-cased: an unattached source
//! reports `count() == 0` and its fields serialize as `null`.

pub mod filter;

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::events::{Capabilities, FieldName, TelemetryFrame};
use crate::app::ports::{SampleSource, SensorPort};
use crate::config::MAX_DALLAS_PROBES;

/// Decimal places for temperature fields.
pub const TEMP_DECIMALS: u8 = 4;
/// Decimal places for millivolt fields.
pub const VOLT_DECIMALS: u8 = 2;

/// The four ADC inputs, in telemetry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChannelId {
    /// External ADC, reference resistor divider.
    AdsResistor,
    /// External ADC, NTC divider.
    AdsNtc,
    /// On-chip ADC, reference resistor divider.
    EspResistor,
    /// On-chip ADC, NTC divider.
    EspNtc,
}

impl AdcChannelId {
    pub const ALL: [Self; 4] = [
        Self::AdsResistor,
        Self::AdsNtc,
        Self::EspResistor,
        Self::EspNtc,
    ];

    pub const fn field_name(self) -> &'static str {
        match self {
            Self::AdsResistor => "V_ADS_R",
            Self::AdsNtc => "V_ADS_NTC",
            Self::EspResistor => "V_ESP_R",
            Self::EspNtc => "V_ESP_NTC",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Placeholder for a sensor that was not found at boot.
pub struct Absent;

impl SensorPort for Absent {
    fn count(&self) -> usize {
        0
    }

    fn read_at(&mut self, _index: usize) -> f32 {
        f32::NAN
    }
}

/// Owns every sensor and the delay used by the ADC filter.
pub struct SensorHub<D: DelayNs> {
    bme: Box<dyn SensorPort>,
    tmp: Box<dyn SensorPort>,
    dallas: Box<dyn SensorPort>,
    adc: [Option<Box<dyn SampleSource>>; 4],
    delay: D,
}

impl<D: DelayNs> SensorHub<D> {
    /// An empty hub: every sensor absent.
    pub fn new(delay: D) -> Self {
        Self {
            bme: Box::new(Absent),
            tmp: Box::new(Absent),
            dallas: Box::new(Absent),
            adc: [None, None, None, None],
            delay,
        }
    }

    pub fn with_bme(mut self, sensor: impl SensorPort + 'static) -> Self {
        self.bme = Box::new(sensor);
        self
    }

    pub fn with_tmp(mut self, sensor: impl SensorPort + 'static) -> Self {
        self.tmp = Box::new(sensor);
        self
    }

    /// Attach the one-wire bus.  Only the first
    /// [`MAX_DALLAS_PROBES`] probes are reported.
    pub fn with_dallas(mut self, bus: impl SensorPort + 'static) -> Self {
        self.dallas = Box::new(bus);
        self
    }

    pub fn with_adc(mut self, id: AdcChannelId, source: impl SampleSource + 'static) -> Self {
        self.adc[id.index()] = Some(Box::new(source));
        self
    }

    /// Probes on the one-wire bus that make it into telemetry.
    pub fn dallas_count(&self) -> u8 {
        let capped = self.dallas.count().min(usize::from(MAX_DALLAS_PROBES));
        u8::try_from(capped).unwrap_or(MAX_DALLAS_PROBES)
    }

    /// Flags for the hello message.
    pub fn capabilities(&self, device: &str) -> Capabilities {
        Capabilities {
            device: device.to_owned(),
            bme: self.bme.count() > 0,
            dallas: self.dallas_count(),
            adc: self.adc.iter().any(Option::is_some),
            tmp: self.tmp.count() > 0,
        }
    }

    /// Read every sensor once.  With `filter_enabled` each ADC channel
    /// costs one full trimmed-mean window.
    pub fn sample(&mut self, t_ms: u64, filter_enabled: bool) -> TelemetryFrame {
        let mut frame = TelemetryFrame::new(t_ms);

        frame.push("T_BME", read_first(self.bme.as_mut()), TEMP_DECIMALS);

        for id in AdcChannelId::ALL {
            let mv = match self.adc[id.index()].as_mut() {
                Some(source) => {
                    filter::read_millivolts(source.as_mut(), &mut self.delay, filter_enabled)
                }
                None => f32::NAN,
            };
            frame.push(id.field_name(), mv, VOLT_DECIMALS);
        }

        frame.push("T_TMP", read_first(self.tmp.as_mut()), TEMP_DECIMALS);

        for i in 0..usize::from(self.dallas_count()) {
            let mut name = FieldName::new();
            if write!(name, "T_DS{i}").is_err() {
                continue;
            }
            let reading = self.dallas.read_at(i);
            frame.push(&name, reading, TEMP_DECIMALS);
        }

        debug!("Sampled {} fields at t={} ms", frame.fields().len(), t_ms);
        frame
    }
}

fn read_first(sensor: &mut dyn SensorPort) -> f32 {
    if sensor.count() == 0 {
        f32::NAN
    } else {
        sensor.read_at(0)
    }
}
