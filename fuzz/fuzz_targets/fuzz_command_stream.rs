//! Fuzz target: byte-stream intake
//!
//! Drives arbitrary bytes through line framing, both parsers and the
//! dispatcher.  Asserts that nothing panics, the line buffer stays within
//! its cap and the telemetry rate never leaves the accepted range.
//!
//! cargo fuzz run fuzz_command_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use templab::app::dispatcher::Dispatcher;
use templab::app::events::AppEvent;
use templab::app::ports::{ActuatorPort, EventSink};
use templab::config::SystemConfig;
use templab::protocol::command::{parse, parse_deferred};
use templab::protocol::line::{LineAccumulator, MAX_LINE_LEN};

struct Sink;

impl ActuatorPort for Sink {
    fn set_heater(&mut self, _value: f32) {}
    fn set_cooler(&mut self, _value: f32) {}
    fn stop_all(&mut self) {}
}

impl EventSink for Sink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig::default();
    let mut acc = LineAccumulator::new();
    let mut dispatcher = Dispatcher::new(&config);

    for (t, &byte) in data.iter().enumerate() {
        if let Some(line) = acc.feed(byte) {
            assert!(line.len() <= MAX_LINE_LEN);
            let _ = parse(&line);
            dispatcher.apply(parse_deferred(&line), t as u64, &mut Sink, &mut Sink);
            let rate = dispatcher.rate_hz();
            assert!(rate > 0.0 && rate <= config.max_rate_hz());
        }
        assert!(acc.pending() <= MAX_LINE_LEN);
        dispatcher.check_safety_timeout(t as u64 * 100, &mut Sink, &mut Sink);
    }
});
