//! Blocking DFPlayer Mini driver
//!
//! This crate drives a DFPlayer Mini over any channel implementing the
//! `dfmini-hal` UART traits:
//!
//! - [`Transport`] - owns the channel and the two frame buffers, sends
//!   frames and reads fixed-length replies with a timeout
//! - [`DfPlayer`] - one method per player action, with argument checks
//!   and reply correlation
//! - [`PlayerConfig`] - timeouts and link settings
//!
//! Every operation takes `&mut self` and completes its bus exchange before
//! returning, so commands reach the player in the order they are issued.
//! Sharing a player between contexts needs a lock around the whole instance.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible in the other modules
#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod player;
pub mod transport;

#[cfg(test)]
mod mock;

pub use config::PlayerConfig;
pub use error::DriverError;
pub use player::DfPlayer;
pub use transport::Transport;

pub use dfmini_protocol as protocol;
