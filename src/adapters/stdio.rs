//! Standard-I/O transport for the host runner.
//!
//! Stdin is blocking, so a reader thread drains it into a channel and
//! [`Transport::read`] only ever does a `try_recv`.  Stdout is written
//! directly; it carries protocol lines and nothing else (logs go to
//! stderr).
//!
//! ```text
//!  stdin ──▶ reader thread ──▶ mpsc ──▶ StdioTransport::read
//!  StdioTransport::write ──────────────▶ stdout
//! ```

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use log::{debug, warn};

use crate::protocol::transport::Transport;

const CHUNK: usize = 256;

/// Non-blocking stdin/stdout pair.
pub struct StdioTransport {
    rx: Receiver<Vec<u8>>,
    pending: Vec<u8>,
    eof: bool,
    stdout: io::Stdout,
}

impl StdioTransport {
    /// Spawn the stdin reader thread.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                let mut stdin = io::stdin().lock();
                let mut buf = [0u8; CHUNK];
                loop {
                    match stdin.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            if tx.send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(e) => {
                            warn!("stdin read failed: {}", e);
                            break;
                        }
                    }
                }
                debug!("stdin closed");
            })?;

        Ok(Self {
            rx,
            pending: Vec::new(),
            eof: false,
            stdout: io::stdout(),
        })
    }
}

impl Transport for StdioTransport {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.pending.is_empty() {
            match self.rx.try_recv() {
                Ok(chunk) => self.pending = chunk,
                Err(TryRecvError::Empty) => return Ok(0),
                Err(TryRecvError::Disconnected) => {
                    self.eof = true;
                    return Ok(0);
                }
            }
        }
        let n = self.pending.len().min(buf.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.stdout.lock().write_all(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stdout.lock().flush()
    }

    fn is_open(&self) -> bool {
        !self.eof || !self.pending.is_empty()
    }
}
