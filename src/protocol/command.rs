//! Command grammar.
//!
//! ```text
//! START | STOP | PING
//! SET RATE   <float>
//! SET PWM    <channel:int> <float>
//! SET FILTER <0|1>
//! ```
//!
//! Keywords are case-insensitive; numeric tokens are parsed from the line
//! exactly as received.  Bare keywords must stand alone on the line, while
//! the `SET` forms ignore anything after their numeric arguments (`SET RATE
//! 5 Hz`).  Anything that does not match, including a recognised keyword
//! with a malformed or missing number, parses to
//! [`Command::None`].  The caller learns *that* no command was produced,
//! not why.

/// A parsed command line.  Exactly one variant per line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// No actionable command.
    None,
    Start,
    Stop,
    /// Watchdog keep-alive; never acknowledged.
    Ping,
    /// Requested telemetry rate in Hz; `> 0` unless produced by [`parse_deferred`].
    SetRate(f32),
    /// Actuator setpoint for a PWM channel.
    SetPwm { channel: i32, value: f32 },
    SetFilter(bool),
}

impl Command {
    /// `true` for every variant except [`Command::None`].
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Parse one trimmed line.
pub fn parse(line: &str) -> Command {
    parse_with(line, RateCheck::Positive)
}

/// Like [`parse`], but a finite non-positive `SET RATE` value still yields
/// [`Command::SetRate`], leaving the range check to the dispatcher so the
/// host gets an `invalid_rate` error instead of silence.
pub fn parse_deferred(line: &str) -> Command {
    parse_with(line, RateCheck::Deferred)
}

#[derive(Clone, Copy)]
enum RateCheck {
    Positive,
    Deferred,
}

fn parse_with(line: &str, rate_check: RateCheck) -> Command {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Command::None;
    };

    if keyword.eq_ignore_ascii_case("SET") {
        return parse_set(&mut tokens, rate_check).unwrap_or(Command::None);
    }

    let bare = if keyword.eq_ignore_ascii_case("START") {
        Command::Start
    } else if keyword.eq_ignore_ascii_case("STOP") {
        Command::Stop
    } else if keyword.eq_ignore_ascii_case("PING") {
        Command::Ping
    } else {
        return Command::None;
    };

    // Bare keywords match the whole line only.
    if tokens.next().is_none() { bare } else { Command::None }
}

fn parse_set<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    rate_check: RateCheck,
) -> Option<Command> {
    let target = tokens.next()?;

    if target.eq_ignore_ascii_case("RATE") {
        let rate = parse_finite(tokens.next()?)?;
        match rate_check {
            RateCheck::Positive => (rate > 0.0).then_some(Command::SetRate(rate)),
            RateCheck::Deferred => Some(Command::SetRate(rate)),
        }
    } else if target.eq_ignore_ascii_case("PWM") {
        let channel = tokens.next()?.parse::<i32>().ok()?;
        let value = parse_finite(tokens.next()?)?;
        Some(Command::SetPwm { channel, value })
    } else if target.eq_ignore_ascii_case("FILTER") {
        let flag = tokens.next()?.parse::<i32>().ok()?;
        Some(Command::SetFilter(flag == 1))
    } else {
        None
    }
}

fn parse_finite(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}
