//! Newline-framed line accumulator.
//!
//! Wire format:
//! ```text
//! ┌─────────────────────────────┬────┐
//! │ ASCII command (≤ 256 bytes) │ \n │     \r anywhere is ignored
//! └─────────────────────────────┴────┘
//! ```
//!
//! The accumulator is fed one byte at a time and yields a trimmed line
//! whenever a terminator arrives.  A single transport read may carry part
//! of a line, exactly one line, or several lines concatenated; the result
//! is the same regardless of how the stream is chunked.
//!
//! Memory is bounded by [`MAX_LINE_LEN`].  When a line grows past the cap
//! the partial content is thrown away and everything up to the next `\n`
//! is discarded too, so no tail fragment of an overlong line can ever be
//! interpreted as a command.

use heapless::{String, Vec};
use log::debug;

/// Hard cap on command length in bytes (terminator excluded).
pub const MAX_LINE_LEN: usize = 256;

/// A complete, trimmed, non-empty command line.
pub type Line = String<MAX_LINE_LEN>;

/// Streaming line reassembler.
pub struct LineAccumulator {
    buf: Vec<u8, MAX_LINE_LEN>,
    /// Set after an overflow until the next terminator.
    discarding: bool,
    overflows: u32,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            discarding: false,
            overflows: 0,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some(line)` when `byte` completes a non-empty line.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' => None,
            b'\n' => {
                let line = if self.discarding {
                    None
                } else {
                    candidate(&self.buf)
                };
                self.buf.clear();
                self.discarding = false;
                line
            }
            _ if self.discarding => None,
            _ => {
                if self.buf.push(byte).is_err() {
                    self.buf.clear();
                    self.discarding = true;
                    self.overflows = self.overflows.saturating_add(1);
                    debug!("line exceeds {} bytes, discarding", MAX_LINE_LEN);
                }
                None
            }
        }
    }

    /// Feed a chunk, yielding every line it completes.
    pub fn feed_bytes<'a>(&'a mut self, data: &'a [u8]) -> impl Iterator<Item = Line> + 'a {
        data.iter().filter_map(move |&b| self.feed(b))
    }

    /// Drop any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }

    /// Bytes currently buffered for the in-progress line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Number of overlong lines discarded since construction.
    pub fn overflow_count(&self) -> u32 {
        self.overflows
    }
}

impl Default for LineAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate(bytes: &[u8]) -> Option<Line> {
    let Ok(text) = core::str::from_utf8(bytes) else {
        debug!("dropping non-UTF-8 line ({} bytes)", bytes.len());
        return None;
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Line::try_from(trimmed).ok()
}
