//! Frame encoding and decoding for the DFPlayer protocol.
//!
//! Frame format (10 bytes, fixed):
//! - START (1 byte): 0x7E
//! - VERSION (1 byte): 0xFF
//! - LENGTH (1 byte): 0x06, bytes from VERSION through ARG
//! - COMMAND (1 byte): opcode or reply code
//! - ACK (1 byte): 1 to request an acknowledgement frame
//! - ARG (2 bytes): big-endian parameter, zero when unused
//! - CHECKSUM (2 bytes): big-endian, `0 - sum(VERSION..=ARG_LO)`
//! - END (1 byte): 0xEF

use heapless::Vec;

use crate::commands::Command;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Frame terminator byte
pub const FRAME_END: u8 = 0xEF;

/// Protocol version byte
pub const PROTOCOL_VERSION: u8 = 0xFF;

/// Value of the LENGTH byte (VERSION through ARG_LO)
pub const BODY_LEN: u8 = 0x06;

/// Complete frame size
pub const FRAME_LEN: usize = 10;

/// Byte range covered by the checksum
const CHECKSUM_BODY: core::ops::Range<usize> = 1..7;

/// Raw frame storage
pub type FrameBuffer = [u8; FRAME_LEN];

/// Reasons a received frame is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Input is not exactly [`FRAME_LEN`] bytes
    BadLength,
    /// First byte is not [`FRAME_START`]
    BadStartMarker,
    /// Last byte is not [`FRAME_END`]
    BadEndMarker,
    /// Stored checksum does not match the body
    ChecksumMismatch,
}

/// Compute the checksum over a frame body
///
/// Wrapping 16-bit negation of the byte sum; a valid frame satisfies
/// `sum(body) + checksum == 0 (mod 0x10000)`.
pub fn checksum(body: &[u8]) -> u16 {
    let sum = body
        .iter()
        .fold(0u16, |acc, &byte| acc.wrapping_add(byte as u16));
    0u16.wrapping_sub(sum)
}

/// The variable fields of a frame
///
/// START, VERSION, LENGTH and END are constants and are not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command opcode (outbound) or reply code (inbound)
    pub command: u8,
    /// Acknowledgement request flag
    pub ack: bool,
    /// 16-bit parameter
    pub arg: u16,
}

impl Frame {
    /// Create a frame from its variable fields
    pub const fn new(command: u8, ack: bool, arg: u16) -> Self {
        Self { command, ack, arg }
    }

    /// Create the frame for a command
    pub fn from_command(command: Command, ack: bool) -> Self {
        Self::new(command.opcode().code(), ack, command.arg())
    }

    /// Encode this frame into a buffer, overwriting all of it
    pub fn encode(&self, buffer: &mut FrameBuffer) {
        let [arg_hi, arg_lo] = self.arg.to_be_bytes();

        buffer[0] = FRAME_START;
        buffer[1] = PROTOCOL_VERSION;
        buffer[2] = BODY_LEN;
        buffer[3] = self.command;
        buffer[4] = self.ack as u8;
        buffer[5] = arg_hi;
        buffer[6] = arg_lo;

        let [cks_hi, cks_lo] = checksum(&buffer[CHECKSUM_BODY]).to_be_bytes();
        buffer[7] = cks_hi;
        buffer[8] = cks_lo;
        buffer[9] = FRAME_END;
    }

    /// Encode this frame into a fresh array
    pub fn to_bytes(&self) -> FrameBuffer {
        let mut buffer = [0u8; FRAME_LEN];
        self.encode(&mut buffer);
        buffer
    }

    /// Validate and decode a raw frame
    ///
    /// Checks run in order: length, start marker, end marker, checksum.
    /// The first failing check decides the error.
    pub fn decode(raw: &[u8]) -> Result<Self, ProtocolError> {
        if raw.len() != FRAME_LEN {
            return Err(ProtocolError::BadLength);
        }
        if raw[0] != FRAME_START {
            return Err(ProtocolError::BadStartMarker);
        }
        if raw[FRAME_LEN - 1] != FRAME_END {
            return Err(ProtocolError::BadEndMarker);
        }

        let stored = u16::from_be_bytes([raw[7], raw[8]]);
        if checksum(&raw[CHECKSUM_BODY]) != stored {
            return Err(ProtocolError::ChecksumMismatch);
        }

        Ok(Self {
            command: raw[3],
            ack: raw[4] != 0,
            arg: u16::from_be_bytes([raw[5], raw[6]]),
        })
    }
}

/// Build the frame for `command` into `out`
///
/// Total function: argument ranges are checked before a [`Command`] is
/// ever constructed, and track indices are passed through unchanged.
pub fn build(command: Command, ack: bool, out: &mut FrameBuffer) {
    Frame::from_command(command, ack).encode(out);
}

/// Byte-at-a-time frame reassembly for an unframed stream
///
/// Skips bytes until [`FRAME_START`], then collects a full frame and
/// validates it. Used to regain frame alignment after line noise.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, FRAME_LEN>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for START byte
    WaitingForStart,
    /// Collecting the remaining frame bytes
    ReadingFrame,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when the collected
    /// frame fails validation. After an error the parser carries on from
    /// the next start byte inside the rejected candidate, so a real frame
    /// that began within it is not lost.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, ProtocolError> {
        match self.state {
            ParseState::WaitingForStart => {
                if byte == FRAME_START {
                    // Cannot fail: buffer is empty in this state
                    let _ = self.buffer.push(byte);
                    self.state = ParseState::ReadingFrame;
                }
                Ok(None)
            }
            ParseState::ReadingFrame => {
                // Cannot fail: the buffer is drained whenever it fills
                let _ = self.buffer.push(byte);
                if self.buffer.len() < FRAME_LEN {
                    return Ok(None);
                }

                match Frame::decode(&self.buffer) {
                    Ok(frame) => {
                        self.reset();
                        Ok(Some(frame))
                    }
                    Err(e) => {
                        self.realign();
                        Err(e)
                    }
                }
            }
        }
    }

    /// Drop a rejected candidate up to the next start byte it contains
    fn realign(&mut self) {
        let next_start = self.buffer[1..]
            .iter()
            .position(|&byte| byte == FRAME_START);

        match next_start {
            Some(offset) => {
                let start = offset + 1;
                self.buffer.rotate_left(start);
                self.buffer.truncate(FRAME_LEN - start);
            }
            None => self.reset(),
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, ProtocolError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
