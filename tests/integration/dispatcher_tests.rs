//! Integration tests for parser → dispatcher, driven through the public
//! API with recording mocks.

use templab::app::dispatcher::Dispatcher;
use templab::app::events::{Ack, AppEvent, ProtocolError};
use templab::app::state::RunState;
use templab::config::{RateProfile, SystemConfig};
use templab::protocol::command::{Command, parse, parse_deferred};

use super::mock_hw::{ActuatorCall, MockHardware, MockLink};

fn run(d: &mut Dispatcher, lines: &[(&str, u64)], hw: &mut MockHardware, sink: &mut MockLink) {
    for &(line, now) in lines {
        d.apply(parse(line), now, hw, sink);
    }
}

#[test]
fn full_session() {
    let mut d = Dispatcher::new(&SystemConfig::default());
    let (mut hw, mut sink) = (MockHardware::new(), MockLink::new());

    run(
        &mut d,
        &[
            ("start", 0),
            ("set rate 2.5", 10),
            ("Set Pwm 0 0.8", 20),
            ("SET FILTER 1", 30),
            ("PING", 40),
            ("STOP", 50),
        ],
        &mut hw,
        &mut sink,
    );

    assert_eq!(d.run_state(), RunState::Idle);
    assert!((d.rate_hz() - 2.5).abs() < f32::EPSILON);
    assert!(d.filter_enabled());
    assert_eq!(d.state().last_command_ms, 50);
    assert_eq!(
        hw.calls,
        [ActuatorCall::SetHeater(0.8), ActuatorCall::StopAll]
    );
    assert_eq!(
        sink.acks(),
        [
            Ack::Start,
            Ack::SetRate(2.5),
            Ack::SetPwm,
            Ack::SetFilter,
            Ack::Stop
        ]
    );
}

#[test]
fn rate_bounds_per_profile() {
    let mut filtered = Dispatcher::new(&SystemConfig::default());
    let mut unfiltered = Dispatcher::new(&SystemConfig {
        rate_profile: RateProfile::Unfiltered,
        ..SystemConfig::default()
    });
    let (mut hw, mut sink) = (MockHardware::new(), MockLink::new());

    for rate in ["0", "-1", "10.01", "1000"] {
        filtered.apply(parse_deferred(&format!("SET RATE {rate}")), 0, &mut hw, &mut sink);
    }
    assert_eq!(sink.errors().len(), 4);
    assert!((filtered.rate_hz() - 2.0).abs() < f32::EPSILON);

    sink.clear();
    unfiltered.apply(Command::SetRate(1000.0), 0, &mut hw, &mut sink);
    unfiltered.apply(Command::SetRate(1000.5), 0, &mut hw, &mut sink);
    assert!((unfiltered.rate_hz() - 1000.0).abs() < f32::EPSILON);
    assert_eq!(
        sink.events,
        [
            AppEvent::Ack(Ack::SetRate(1000.0)),
            AppEvent::Error(ProtocolError::InvalidRate)
        ]
    );
}

#[test]
fn malformed_lines_change_nothing() {
    let mut d = Dispatcher::new(&SystemConfig::default());
    let (mut hw, mut sink) = (MockHardware::new(), MockLink::new());
    let before = d.state().clone();

    run(
        &mut d,
        &[
            ("STARTX", 5),
            ("SET", 6),
            ("SET PWM 0", 7),
            ("SET PWM x 0.5", 8),
            ("SET RATE nan", 9),
            ("SET FILTER", 10),
            ("START NOW", 11),
        ],
        &mut hw,
        &mut sink,
    );

    assert_eq!(d.state(), &before);
    assert!(hw.calls.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn unmapped_pwm_channels_are_acked_without_actuation() {
    let mut d = Dispatcher::new(&SystemConfig::default());
    let (mut hw, mut sink) = (MockHardware::new(), MockLink::new());

    for (line, now) in [("SET PWM -1 0.5", 100), ("SET PWM 300 0.5", 200)] {
        d.apply(parse_deferred(line), now, &mut hw, &mut sink);
    }

    assert!(hw.calls.is_empty());
    assert_eq!(sink.acks(), [Ack::SetPwm, Ack::SetPwm]);
    assert_eq!(d.state().last_command_ms, 200);
}

#[test]
fn set_filter_non_one_disables() {
    let mut d = Dispatcher::new(&SystemConfig {
        filter_enabled_at_boot: true,
        ..SystemConfig::default()
    });
    let (mut hw, mut sink) = (MockHardware::new(), MockLink::new());
    assert!(d.filter_enabled());
    d.apply(parse("SET FILTER 2"), 0, &mut hw, &mut sink);
    assert!(!d.filter_enabled());
    assert_eq!(sink.acks(), [Ack::SetFilter]);
}

#[test]
fn watchdog_trip_while_idle_is_a_no_op() {
    let mut d = Dispatcher::new(&SystemConfig::default());
    let (mut hw, mut sink) = (MockHardware::new(), MockLink::new());
    assert!(!d.check_safety_timeout(1_000_000, &mut hw, &mut sink));
    assert!(hw.calls.is_empty());
    assert_eq!(d.watchdog().trip_count(), 0);
}
