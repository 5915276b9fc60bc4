//! dfmini Hardware Abstraction Layer
//!
//! This crate defines the serial channel traits the DFPlayer driver talks
//! through. Chip HALs either implement them directly or hand over any
//! `embedded-io` port wrapped in [`io::IoUart`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (playback state machine)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dfmini-driver (DfPlayer, Transport)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dfmini-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ chip UART impl│       │ embedded-io   │
//! │               │       │ port (IoUart) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`uart::ErrorType`] - Error type shared by both halves

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod io;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use io::IoUart;
pub use uart::{DataBits, ErrorType, Parity, StopBits, Uart, UartConfig, UartRx, UartTx};
