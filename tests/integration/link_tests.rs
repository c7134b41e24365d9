//! End-to-end tests over a real `SerialLink`: raw bytes in, JSON lines out.

use std::collections::VecDeque;

use templab::adapters::serial_link::SerialLink;
use templab::app::service::AppService;
use templab::config::SystemConfig;
use templab::protocol::line::MAX_LINE_LEN;
use templab::protocol::transport::Transport;
use templab::sensors::{AdcChannelId, SensorHub};

use super::mock_hw::{FixedTemps, MockHardware, NoDelay, ScriptedAdc};

/// In-memory pipe: the test writes host bytes, the node writes lines.
#[derive(Default)]
struct Pipe {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
}

impl Transport for Pipe {
    type Error = core::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(self.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.outbound.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct Node {
    app: AppService<NoDelay>,
    link: SerialLink<Pipe>,
    hw: MockHardware,
}

impl Node {
    fn boot() -> Self {
        let hub = SensorHub::new(NoDelay::default())
            .with_bme(FixedTemps(vec![21.5]))
            .with_dallas(FixedTemps(vec![f32::NAN]))
            .with_adc(AdcChannelId::AdsResistor, ScriptedAdc::constant(1650))
            .with_adc(AdcChannelId::AdsNtc, ScriptedAdc::constant(1480))
            .with_adc(AdcChannelId::EspResistor, ScriptedAdc::constant(1640))
            .with_adc(AdcChannelId::EspNtc, ScriptedAdc::constant(1475));
        let mut app = AppService::new(&SystemConfig::default(), hub);
        let mut link = SerialLink::new(Pipe::default());
        app.start(&mut link);
        Self {
            app,
            link,
            hw: MockHardware::new(),
        }
    }

    fn host_sends(&mut self, bytes: &[u8]) {
        self.link.transport_mut().inbound.extend(bytes.iter().copied());
    }

    fn tick(&mut self, now_ms: u64) {
        self.app.tick(now_ms, &mut self.link, &mut self.hw);
    }

    /// Drain everything the node has written, one string per line.
    fn take_lines(&mut self) -> Vec<String> {
        let out = std::mem::take(&mut self.link.transport_mut().outbound);
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

#[test]
fn hello_is_first_line() {
    let mut node = Node::boot();
    assert_eq!(
        node.take_lines(),
        [r#"{"type":"hello","device":"temp-lab-v2","bme":true,"dallas":1,"adc":true,"tmp":false}"#]
    );
}

#[test]
fn session_over_the_wire() {
    let mut node = Node::boot();
    node.take_lines();

    node.host_sends(b"START\r\nSET RATE 5\n");
    node.tick(0);
    node.tick(1);

    assert_eq!(
        node.take_lines(),
        [
            r#"{"type":"ack","cmd":"start"}"#,
            concat!(
                r#"{"type":"data","t_ms":0,"T_BME":21.5000,"V_ADS_R":1650.00,"V_ADS_NTC":1480.00,"#,
                r#""V_ESP_R":1640.00,"V_ESP_NTC":1475.00,"T_TMP":null,"T_DS0":null}"#
            ),
            r#"{"type":"ack","cmd":"set_rate","rate_hz":5.0000}"#,
        ]
    );
}

#[test]
fn negative_rate_answers_invalid_rate() {
    let mut node = Node::boot();
    node.take_lines();
    node.host_sends(b"SET RATE -1\n");
    node.tick(0);
    assert_eq!(
        node.take_lines(),
        [r#"{"type":"error","msg":"invalid_rate"}"#]
    );
    assert!((node.app.dispatcher().rate_hz() - 2.0).abs() < f32::EPSILON);
}

#[test]
fn byte_at_a_time_delivery() {
    let mut node = Node::boot();
    node.take_lines();
    for (t, &b) in b"SET PWM 1 0.3\n".iter().enumerate() {
        node.host_sends(&[b]);
        node.tick(t as u64);
    }
    assert_eq!(node.take_lines(), [r#"{"type":"ack","cmd":"set_pwm"}"#]);
}

#[test]
fn overlong_line_is_discarded_whole() {
    let mut node = Node::boot();
    node.take_lines();

    let mut flood = vec![b'A'; MAX_LINE_LEN + 10];
    flood.extend_from_slice(b"START\n");
    node.host_sends(&flood);
    node.tick(0);
    assert!(node.take_lines().is_empty());
    assert_eq!(node.link.overflow_count(), 1);

    node.host_sends(b"START\n");
    node.tick(1);
    assert_eq!(node.take_lines()[0], r#"{"type":"ack","cmd":"start"}"#);
}
