//! Console logger backend.
//!
//! A minimal [`log::Log`] implementation for the host runner.  Records go
//! to stderr as `[  12.345s INFO  templab::safety] message`, keeping stdout
//! free for protocol lines.  The level comes from `TEMPLAB_LOG`
//! (`error`, `warn`, `info`, `debug`, `trace`, `off`; default `info`).

use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "TEMPLAB_LOG";

/// Stderr logger with a process-relative timestamp.
pub struct ConsoleLogger {
    level: LevelFilter,
    start: Instant,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            start: Instant::now(),
        }
    }

    /// Install a logger configured from [`LOG_ENV`].
    pub fn init() -> Result<LevelFilter, SetLoggerError> {
        let level = level_from(std::env::var(LOG_ENV).ok().as_deref());
        log::set_boxed_logger(Box::new(Self::new(level)))?;
        log::set_max_level(level);
        Ok(level)
    }
}

/// Parse a level name, falling back to `Info`.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.start.elapsed();
        let mut err = std::io::stderr().lock();
        // Nowhere left to report a failed log write.
        let _ = writeln!(
            err,
            "[{:>4}.{:03}s {:<5} {}] {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
