//! Integration tests for the AppService control loop: link intake →
//! dispatcher → watchdog → telemetry.

use templab::app::events::{Ack, AppEvent, ProtocolError};
use templab::app::service::AppService;
use templab::app::state::RunState;
use templab::config::{SystemConfig, UnknownCommandPolicy};
use templab::sensors::{AdcChannelId, SensorHub};

use super::mock_hw::{ActuatorCall, FixedTemps, MockHardware, MockLink, NoDelay, ScriptedAdc};

fn hub() -> SensorHub<NoDelay> {
    SensorHub::new(NoDelay::default())
        .with_bme(FixedTemps(vec![23.25]))
        .with_dallas(FixedTemps(vec![20.5, f32::NAN]))
        .with_adc(AdcChannelId::AdsNtc, ScriptedAdc::constant(1500))
}

fn make_app(config: &SystemConfig) -> (AppService<NoDelay>, MockLink, MockHardware) {
    let mut app = AppService::new(config, hub());
    let mut link = MockLink::new();
    app.start(&mut link);
    (app, link, MockHardware::new())
}

#[test]
fn hello_announces_capabilities() {
    let (_app, link, _hw) = make_app(&SystemConfig::default());
    let AppEvent::Hello(caps) = &link.events[0] else {
        panic!("first event must be hello, got {:?}", link.events[0]);
    };
    assert_eq!(caps.device, "temp-lab-v2");
    assert!(caps.bme);
    assert!(caps.adc);
    assert!(!caps.tmp);
    assert_eq!(caps.dallas, 2);
}

#[test]
fn start_then_set_rate() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.clear();

    link.send("START\n");
    app.tick(0, &mut link, &mut hw);
    link.send("SET RATE 5\n");
    app.tick(1, &mut link, &mut hw);

    assert_eq!(app.run_state(), RunState::Active);
    assert!((app.dispatcher().rate_hz() - 5.0).abs() < f32::EPSILON);
    assert_eq!(link.acks(), [Ack::Start, Ack::SetRate(5.0)]);
    assert_eq!(Ack::SetRate(5.0).to_string(), "set_rate(5.0000)");
}

#[test]
fn one_command_per_tick() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.send("START\nSET FILTER 1\n");

    app.tick(0, &mut link, &mut hw);
    assert_eq!(link.pending_lines(), 1);
    assert!(!app.dispatcher().filter_enabled());

    app.tick(1, &mut link, &mut hw);
    assert!(app.dispatcher().filter_enabled());
}

#[test]
fn invalid_rate_leaves_state_alone() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.send("START\n");
    app.tick(0, &mut link, &mut hw);
    link.send("SET RATE -1\n");
    app.tick(10, &mut link, &mut hw);

    assert_eq!(link.errors(), [ProtocolError::InvalidRate]);
    assert!((app.dispatcher().rate_hz() - 2.0).abs() < f32::EPSILON);
    assert_eq!(app.run_state(), RunState::Active);
}

#[test]
fn watchdog_trips_after_silence() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.send("START\n");
    app.tick(0, &mut link, &mut hw);

    app.tick(3000, &mut link, &mut hw);
    assert_eq!(app.run_state(), RunState::Active);
    assert_eq!(hw.stop_count(), 0);

    app.tick(3001, &mut link, &mut hw);
    assert_eq!(app.run_state(), RunState::Idle);
    assert_eq!(hw.stop_count(), 1);

    app.tick(10_000, &mut link, &mut hw);
    assert_eq!(hw.stop_count(), 1, "a trip stops actuators exactly once");
}

#[test]
fn ping_resets_deadline() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.send("START\n");
    app.tick(0, &mut link, &mut hw);
    link.send("PING\n");
    app.tick(2999, &mut link, &mut hw);

    app.tick(5000, &mut link, &mut hw);
    assert_eq!(app.run_state(), RunState::Active);
    app.tick(5999, &mut link, &mut hw);
    assert_eq!(app.run_state(), RunState::Active);
    app.tick(6000, &mut link, &mut hw);
    assert_eq!(app.run_state(), RunState::Idle);
}

#[test]
fn unrecognised_lines_do_not_feed_watchdog() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.send("START\n");
    app.tick(0, &mut link, &mut hw);
    link.send("PONG\n");
    app.tick(2000, &mut link, &mut hw);
    app.tick(3001, &mut link, &mut hw);
    assert_eq!(app.run_state(), RunState::Idle);
}

#[test]
fn pwm_routes_to_actuators() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    for (t, line) in ["SET PWM 0 0.5\n", "SET PWM 1 0.5\n", "SET PWM 7 0.5\n"]
        .into_iter()
        .enumerate()
    {
        link.send(line);
        app.tick(t as u64, &mut link, &mut hw);
    }
    assert_eq!(
        hw.calls,
        [ActuatorCall::SetHeater(0.5), ActuatorCall::SetCooler(0.5)]
    );
    assert_eq!(link.acks(), [Ack::SetPwm, Ack::SetPwm, Ack::SetPwm]);
}

#[test]
fn unknown_command_silent_by_default() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.clear();
    link.send("FOO\nSET RATE abc\n");
    app.tick(0, &mut link, &mut hw);
    assert!(link.events.is_empty());
    assert_eq!(app.lines_received(), 2);
}

#[test]
fn unknown_command_reported_when_configured() {
    let config = SystemConfig {
        unknown_command_policy: UnknownCommandPolicy::Report,
        ..SystemConfig::default()
    };
    let (mut app, mut link, mut hw) = make_app(&config);
    link.clear();
    link.send("FOO\nSTART\n");
    app.tick(0, &mut link, &mut hw);
    assert_eq!(
        link.events[..2],
        [
            AppEvent::Error(ProtocolError::UnknownCommand),
            AppEvent::Ack(Ack::Start)
        ]
    );
    // START made the node active, so the first frame follows in the same tick.
    assert_eq!(link.frames().len(), 1);
}

#[test]
fn set_lines_with_trailing_text_are_acted_on() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.clear();
    link.send("SET RATE 2 Hz\n");
    app.tick(0, &mut link, &mut hw);
    link.send("SET PWM 0 0.5 extra\n");
    app.tick(2500, &mut link, &mut hw);
    link.send("START now\n");
    app.tick(4000, &mut link, &mut hw);

    assert_eq!(link.acks(), [Ack::SetRate(2.0), Ack::SetPwm]);
    assert_eq!(hw.calls, [ActuatorCall::SetHeater(0.5)]);
    assert_eq!(app.dispatcher().rate_hz(), 2.0);
    assert_eq!(app.run_state(), RunState::Idle);
}

#[test]
fn telemetry_follows_rate() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.send("START\n");
    for t in (0..=2000).step_by(50) {
        if t % 1000 == 0 {
            link.send("PING\n");
        }
        app.tick(t, &mut link, &mut hw);
    }
    // 2 Hz over [0, 2000] ms: t = 0, 500, 1000, 1500, 2000
    assert_eq!(link.frames().len(), 5);
    assert_eq!(app.frames_sent(), 5);

    let frame = link.frames()[0];
    assert_eq!(frame.t_ms, 0);
    assert_eq!(frame.get("T_BME"), Some(Some(23.25)));
    assert_eq!(frame.get("V_ADS_NTC"), Some(Some(1500.0)));
    assert_eq!(frame.get("V_ADS_R"), Some(None));
    assert_eq!(frame.get("T_DS1"), Some(None));
}

#[test]
fn no_telemetry_while_idle() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    for t in 0..2000 {
        app.tick(t, &mut link, &mut hw);
    }
    assert!(link.frames().is_empty());
}

#[test]
fn stop_halts_telemetry_and_actuators() {
    let (mut app, mut link, mut hw) = make_app(&SystemConfig::default());
    link.send("START\n");
    app.tick(0, &mut link, &mut hw);
    link.send("STOP\n");
    app.tick(100, &mut link, &mut hw);
    let sent = link.frames().len();

    app.tick(1000, &mut link, &mut hw);
    assert_eq!(link.frames().len(), sent);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::StopAll));
    assert_eq!(link.acks(), [Ack::Start, Ack::Stop]);
}
