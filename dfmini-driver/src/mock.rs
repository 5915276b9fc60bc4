//! Mock channel and delay for driver tests
//!
//! [`MockUart`] records every `write_blocking` call and replays scripted
//! incoming bytes one at a time. [`MockDelay`] only accumulates the time
//! it was asked to wait.

use std::collections::VecDeque;

use dfmini_hal::{ErrorType, UartRx, UartTx};
use dfmini_protocol::{Frame, FrameBuffer};
use embedded_hal::delay::DelayNs;

/// Faults the mock can inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLinkError {
    Framing,
    Disconnected,
}

#[derive(Debug, Default)]
pub struct MockUart {
    /// One entry per `write_blocking` call, in call order
    pub writes: Vec<Vec<u8>>,
    pub flushes: usize,
    incoming: VecDeque<u8>,
    /// Fail every write with this error
    pub write_fault: Option<MockLinkError>,
    /// Fail the read after this many bytes have been delivered
    pub read_fault_after: Option<(usize, MockLinkError)>,
    delivered: usize,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue raw bytes from the player
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.incoming.extend(bytes.iter().copied());
    }

    /// Queue a well-formed frame from the player
    pub fn push_reply(&mut self, command: u8, arg: u16) {
        self.push_bytes(&Frame::new(command, false, arg).to_bytes());
    }

    /// Writes that were complete frames
    pub fn frames(&self) -> Vec<FrameBuffer> {
        self.writes
            .iter()
            .filter_map(|w| FrameBuffer::try_from(w.as_slice()).ok())
            .collect()
    }

    /// Opcodes of all written frames, in order
    pub fn opcodes(&self) -> Vec<u8> {
        self.frames().iter().map(|f| f[3]).collect()
    }

    pub fn pending(&self) -> usize {
        self.incoming.len()
    }
}

impl ErrorType for MockUart {
    type Error = MockLinkError;
}

impl UartTx for MockUart {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), MockLinkError> {
        if let Some(fault) = self.write_fault {
            return Err(fault);
        }
        self.writes.push(data.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MockLinkError> {
        self.flushes += 1;
        Ok(())
    }
}

impl UartRx for MockUart {
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, MockLinkError> {
        let mut n = 0;
        while n < buf.len() {
            match self.try_read_byte()? {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, MockLinkError> {
        if let Some((after, fault)) = self.read_fault_after {
            if self.delivered >= after {
                return Err(fault);
            }
        }
        let byte = self.incoming.pop_front();
        if byte.is_some() {
            self.delivered += 1;
        }
        Ok(byte)
    }
}

/// Delay that records how long it was asked to wait
#[derive(Debug, Default)]
pub struct MockDelay {
    pub elapsed_ns: u64,
}

impl MockDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += ns as u64;
    }
}
