//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements           | Connects to                 |
//! |----------------|----------------------|-----------------------------|
//! | `serial_link`  | LinePort, EventSink  | any `Transport`             |
//! | `stdio`        | Transport            | process stdin / stdout      |
//! | `hardware`     | ActuatorPort         | logged heater/cooler setpoints |
//! | `simulated`    | SensorPort           | simulated BME/TMP/one-wire  |
//! |                | SampleSource         | simulated noisy ADC inputs  |
//! | `time`         | ClockPort            | `std::time::Instant`        |
//! | `delay`        | embedded-hal DelayNs | busy-wait on `Instant`      |
//! | `config_file`  | ConfigPort           | JSON file on disk           |
//! | `console_log`  | log::Log             | stderr                      |

pub mod config_file;
pub mod console_log;
pub mod delay;
pub mod hardware;
pub mod serial_link;
pub mod simulated;
pub mod stdio;
pub mod time;
