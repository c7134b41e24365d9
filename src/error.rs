//! Unified error types for the Temp-Lab control core.
//!
//! Only the *outer* ring can fail: encoding an outbound message or pushing
//! it through a transport.  The command path never returns errors; malformed
//! input degrades to `Command::None` and out-of-range parameters become
//! protocol `error` messages.  All variants are `Copy` so they can be logged
//! and dropped without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link could not deliver an outbound message.
    Comms(CommsError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The message could not be serialised to JSON.
    EncodeFailed,
    /// The transport reported a write error.
    WriteFailed,
    /// The transport accepted fewer bytes than the encoded line.
    ShortWrite { written: usize, expected: usize },
    /// The transport reported a flush error.
    FlushFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodeFailed => write!(f, "message encode failed"),
            Self::WriteFailed => write!(f, "transport write failed"),
            Self::ShortWrite { written, expected } => {
                write!(f, "short write ({written}/{expected} bytes)")
            }
            Self::FlushFailed => write!(f, "transport flush failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
