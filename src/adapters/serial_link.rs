//! Serial link adapter.
//!
//! Bridges a byte [`Transport`] to the domain: inbound bytes are framed
//! into lines by a [`LineAccumulator`] and handed out through
//! [`LinePort`]; outbound [`AppEvent`]s are encoded as JSON lines and
//! written back through the same transport.
//!
//! Reads are pulled lazily.  The transport is only asked for more bytes
//! once every byte already received has been framed, so a single tick
//! never consumes more input than it needs to find one command.

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, LinePort};
use crate::error::{CommsError, Result};
use crate::protocol::line::{Line, LineAccumulator};
use crate::protocol::messages;
use crate::protocol::transport::Transport;

const READ_BUF_SIZE: usize = 64;

/// Line-oriented view of a byte transport.
pub struct SerialLink<T: Transport> {
    transport: T,
    accumulator: LineAccumulator,
    rx: [u8; READ_BUF_SIZE],
    rx_len: usize,
    rx_pos: usize,
    tx: Vec<u8>,
    send_failures: u32,
}

impl<T: Transport> SerialLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            accumulator: LineAccumulator::new(),
            rx: [0; READ_BUF_SIZE],
            rx_len: 0,
            rx_pos: 0,
            tx: Vec::with_capacity(256),
            send_failures: 0,
        }
    }

    /// Encode `event` and write it as one line.
    pub fn send(&mut self, event: &AppEvent) -> Result<()> {
        self.tx.clear();
        messages::encode_line(event, &mut self.tx).map_err(|_| CommsError::EncodeFailed)?;

        let written = self
            .transport
            .write(&self.tx)
            .map_err(|_| CommsError::WriteFailed)?;
        if written != self.tx.len() {
            return Err(CommsError::ShortWrite {
                written,
                expected: self.tx.len(),
            }
            .into());
        }
        self.transport
            .flush()
            .map_err(|_| CommsError::FlushFailed)?;
        Ok(())
    }

    /// `false` once the transport reports end of input.
    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Lines dropped for exceeding the accumulator capacity.
    pub fn overflow_count(&self) -> u32 {
        self.accumulator.overflow_count()
    }

    /// Outbound messages that failed to send.
    pub fn send_failures(&self) -> u32 {
        self.send_failures
    }

    fn refill(&mut self) -> bool {
        match self.transport.read(&mut self.rx) {
            Ok(0) => false,
            Ok(n) => {
                self.rx_len = n.min(READ_BUF_SIZE);
                self.rx_pos = 0;
                true
            }
            Err(e) => {
                warn!("Serial read failed: {:?}", e);
                false
            }
        }
    }
}

impl<T: Transport> LinePort for SerialLink<T> {
    fn poll_line(&mut self) -> Option<Line> {
        loop {
            while self.rx_pos < self.rx_len {
                let byte = self.rx[self.rx_pos];
                self.rx_pos += 1;
                if let Some(line) = self.accumulator.feed(byte) {
                    return Some(line);
                }
            }
            if !self.refill() {
                return None;
            }
        }
    }
}

impl<T: Transport> EventSink for SerialLink<T> {
    fn emit(&mut self, event: &AppEvent) {
        if let Err(e) = self.send(event) {
            self.send_failures = self.send_failures.saturating_add(1);
            warn!("Dropped outbound message: {}", e);
        }
    }
}
