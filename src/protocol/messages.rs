//! Outbound JSON line encoding.
//!
//! One JSON object per line:
//! ```text
//! {"type":"hello","device":"temp-lab-v2","bme":true,"dallas":2,"adc":true,"tmp":true}
//! {"type":"ack","cmd":"set_rate","rate_hz":5.0000}
//! {"type":"error","msg":"invalid_rate"}
//! {"type":"data","t_ms":1500,"T_BME":21.5000,"V_ADS_R":1650.25,...,"T_DS0":null}
//! ```
//!
//! Numbers are written with a fixed number of decimals (4 for temperatures
//! and rates, 2 for millivolts) so host-side parsers see a stable format.
//! Failed readings are written as `null`, never as a sentinel number.

use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::value::RawValue;

use crate::app::events::{Ack, AppEvent, TelemetryFrame};

/// Decimal places for the `rate_hz` field of a set-rate ack.
const RATE_DECIMALS: u8 = 4;

/// Encode `event` as one JSON line (terminator included) appended to `out`.
pub fn encode_line(event: &AppEvent, out: &mut Vec<u8>) -> Result<(), serde_json::Error> {
    match event {
        AppEvent::Hello(caps) => serde_json::to_writer(
            &mut *out,
            &Message::Hello {
                device: &caps.device,
                bme: caps.bme,
                dallas: caps.dallas,
                adc: caps.adc,
                tmp: caps.tmp,
            },
        )?,
        AppEvent::Ack(ack) => serde_json::to_writer(
            &mut *out,
            &Message::Ack {
                cmd: ack.name(),
                rate_hz: match ack {
                    Ack::SetRate(rate) => Some(Fixed::new(*rate, RATE_DECIMALS)),
                    _ => None,
                },
            },
        )?,
        AppEvent::Error(err) => {
            serde_json::to_writer(&mut *out, &Message::Error { msg: err.as_str() })?;
        }
        AppEvent::Telemetry(frame) => serde_json::to_writer(&mut *out, &DataMessage(frame))?,
    }
    out.push(b'\n');
    Ok(())
}

/// Convenience wrapper returning the encoded line as a `String`.
pub fn to_line(event: &AppEvent) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    encode_line(event, &mut out)?;
    // serde_json only ever produces UTF-8.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Message<'a> {
    Hello {
        device: &'a str,
        bme: bool,
        dallas: u8,
        adc: bool,
        tmp: bool,
    },
    Ack {
        cmd: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        rate_hz: Option<Fixed>,
    },
    Error {
        msg: &'static str,
    },
}

/// `{"type":"data","t_ms":..., <fields in frame order>}`
struct DataMessage<'a>(&'a TelemetryFrame);

impl Serialize for DataMessage<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let frame = self.0;
        let mut map = serializer.serialize_map(Some(frame.fields().len() + 2))?;
        map.serialize_entry("type", "data")?;
        map.serialize_entry("t_ms", &frame.t_ms)?;
        for field in frame.fields() {
            let value = field.value.map(|v| Fixed::new(v, field.decimals));
            map.serialize_entry(field.name.as_str(), &value)?;
        }
        map.end()
    }
}

/// A float written with a fixed number of decimals; non-finite → `null`.
struct Fixed {
    value: f32,
    decimals: u8,
}

impl Fixed {
    fn new(value: f32, decimals: u8) -> Self {
        Self { value, decimals }
    }
}

impl Serialize for Fixed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.value.is_finite() {
            return serializer.serialize_none();
        }
        let text = format!("{:.*}", usize::from(self.decimals), self.value);
        RawValue::from_string(text)
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}
