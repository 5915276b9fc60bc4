//! DFPlayer Mini Serial Protocol
//!
//! This crate defines the UART protocol between a host MCU and a DFPlayer
//! Mini (or compatible) MP3 module. It performs no I/O: frames are built
//! into caller-owned buffers and replies are decoded from byte slices, so
//! everything here can be tested against hand-built arrays.
//!
//! # Protocol Overview
//!
//! Every message, in both directions, is one fixed 10-byte frame:
//! ```text
//! ┌───────┬─────────┬────────┬─────────┬─────┬────────┬──────────┬─────┐
//! │ START │ VERSION │ LENGTH │ COMMAND │ ACK │ ARG    │ CHECKSUM │ END │
//! │ 0x7E  │ 0xFF    │ 0x06   │ 1B      │ 1B  │ 2B BE  │ 2B BE    │ 0xEF│
//! └───────┴─────────┴────────┴─────────┴─────┴────────┴──────────┴─────┘
//! ```
//!
//! The checksum is the 16-bit two's-complement negation of the sum of
//! VERSION through the low ARG byte.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod commands;
pub mod frame;
pub mod replies;

pub use commands::{opcode, ArgumentError, Command, Device, EqPreset, MediaSource, Opcode, Volume};
pub use frame::{
    build, checksum, Frame, FrameBuffer, FrameParser, ProtocolError, FRAME_END, FRAME_LEN,
    FRAME_START,
};
pub use replies::{parse, MediaSet, PeripheralError, PlayState, PlaybackStatus, Reply};
