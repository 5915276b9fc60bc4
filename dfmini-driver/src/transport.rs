//! Frame transport over a blocking UART
//!
//! The transport owns the channel, a delay provider for receive timeouts,
//! and two fixed frame buffers that are reused for every exchange. Each
//! call finishes its bus traffic before returning.

use dfmini_hal::{Uart, UartRx, UartTx};
use dfmini_protocol::{build, Command, Frame, FrameBuffer, FrameParser, FRAME_LEN};
use embedded_hal::delay::DelayNs;

use crate::config::PlayerConfig;
use crate::error::DriverError;

/// Blocking frame transport
pub struct Transport<U, D> {
    uart: U,
    delay: D,
    reply_timeout_us: u32,
    poll_step_us: u32,
    send_buf: FrameBuffer,
    recv_buf: FrameBuffer,
    /// Bytes of `recv_buf` filled by the last read
    recv_len: usize,
}

impl<U: Uart, D: DelayNs> Transport<U, D> {
    /// Take ownership of an open channel
    pub fn new(uart: U, delay: D, config: &PlayerConfig) -> Self {
        Self {
            uart,
            delay,
            reply_timeout_us: config.reply_timeout_us(),
            poll_step_us: config.poll_step_us(),
            send_buf: [0u8; FRAME_LEN],
            recv_buf: [0u8; FRAME_LEN],
            recv_len: 0,
        }
    }

    /// Build `command` into the send buffer and write it out
    ///
    /// Returns once the channel has accepted all ten bytes.
    pub fn send(&mut self, command: Command, ack: bool) -> Result<(), DriverError<U::Error>> {
        build(command, ack, &mut self.send_buf);
        trace!("dfplayer tx {:x}", self.send_buf);

        self.uart
            .write_blocking(&self.send_buf)
            .map_err(DriverError::Link)?;
        self.uart.flush().map_err(DriverError::Link)
    }

    /// Send `command`, then read back exactly one frame
    ///
    /// The returned bytes are not validated; hand them to
    /// [`dfmini_protocol::parse`].
    pub fn send_and_receive(
        &mut self,
        command: Command,
        ack: bool,
    ) -> Result<FrameBuffer, DriverError<U::Error>> {
        self.send(command, ack)?;
        self.receive()
    }

    /// Read exactly one frame's worth of bytes
    ///
    /// Fails with [`DriverError::Timeout`] if fewer than ten bytes arrive
    /// within the reply timeout. Bytes already read stay buffered for a
    /// following [`resync`](Self::resync).
    pub fn receive(&mut self) -> Result<FrameBuffer, DriverError<U::Error>> {
        let mut waited_us = 0u32;
        self.recv_len = 0;

        while self.recv_len < FRAME_LEN {
            match self.uart.try_read_byte().map_err(DriverError::Link)? {
                Some(byte) => {
                    self.recv_buf[self.recv_len] = byte;
                    self.recv_len += 1;
                }
                None => {
                    let progress = self.recv_len;
                    self.wait_for_byte(&mut waited_us, progress)?;
                }
            }
        }

        trace!("dfplayer rx {:x}", self.recv_buf);
        Ok(self.recv_buf)
    }

    /// Discard bytes until a valid frame has been reassembled
    ///
    /// Realigns on the start marker after noise or a truncated read. The
    /// search starts with whatever the last read left unconsumed, then
    /// continues on the channel. Frames that fail validation are skipped;
    /// the whole search shares one reply timeout.
    pub fn resync(&mut self) -> Result<Frame, DriverError<U::Error>> {
        let mut parser = FrameParser::new();
        let mut waited_us = 0u32;
        let mut consumed = 0usize;

        // Fewer than FRAME_LEN bytes: these can only prime the parser
        for &byte in self.unconsumed() {
            let _ = parser.feed(byte);
        }
        self.recv_len = 0;

        loop {
            match self.uart.try_read_byte().map_err(DriverError::Link)? {
                Some(byte) => {
                    consumed += 1;
                    if let Ok(Some(frame)) = parser.feed(byte) {
                        debug!("dfplayer resync read {} bytes", consumed);
                        frame.encode(&mut self.recv_buf);
                        return Ok(frame);
                    }
                }
                None => self.wait_for_byte(&mut waited_us, consumed)?,
            }
        }
    }

    /// Block for the given number of milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// The most recently built outbound frame
    pub fn last_sent(&self) -> &FrameBuffer {
        &self.send_buf
    }

    /// The most recently received inbound bytes
    pub fn last_received(&self) -> &FrameBuffer {
        &self.recv_buf
    }

    /// Give back the channel and delay provider
    pub fn release(self) -> (U, D) {
        (self.uart, self.delay)
    }

    /// Buffered bytes that have not been handed out as a valid frame
    ///
    /// After a full read that failed validation its first byte is known
    /// not to start a frame, so only the rest is kept.
    fn unconsumed(&self) -> &[u8] {
        let held = &self.recv_buf[..self.recv_len];
        if self.recv_len < FRAME_LEN {
            held
        } else if Frame::decode(held).is_ok() {
            &[]
        } else {
            &held[1..]
        }
    }

    fn wait_for_byte(
        &mut self,
        waited_us: &mut u32,
        progress: usize,
    ) -> Result<(), DriverError<U::Error>> {
        if *waited_us >= self.reply_timeout_us {
            warn!(
                "dfplayer reply timeout after {} us ({} bytes)",
                *waited_us, progress
            );
            return Err(DriverError::Timeout);
        }
        self.delay.delay_us(self.poll_step_us);
        *waited_us = waited_us.saturating_add(self.poll_step_us);
        Ok(())
    }
}
