//! Byte-stream transport port.
//!
//! Concrete implementations:
//! - stdio pipe on the host runner ([`StdioTransport`](crate::adapters::stdio::StdioTransport))
//! - UART / USB CDC on a real node (out of scope for this crate)
//!
//! The serial link is generic over `Transport`, so swapping the physical
//! channel requires no change to line framing or message encoding.  The
//! stream is half-duplex safe: reads and writes never wait on each other.

/// Non-blocking, byte-oriented channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 when no data is pending; never blocks.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data`, returning the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// `false` once the peer has closed its side and no more input will
    /// arrive.  Always-on links keep the default.
    fn is_open(&self) -> bool {
        true
    }
}

/// A transport that discards all writes and never reads.
/// Useful when no host is attached.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
