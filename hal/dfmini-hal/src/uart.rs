//! UART serial communication abstractions
//!
//! Provides blocking traits for a byte-oriented duplex channel. Baud rate
//! and framing are set up by whoever opens the port; these traits only
//! move bytes.

use core::fmt::Debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error type shared by the transmit and receive halves
///
/// Errors are hardware faults (framing, parity, overrun, disconnect).
/// A receive that simply has nothing pending is not an error.
pub trait ErrorType {
    /// Error reported by the underlying channel
    type Error: Debug;
}

impl<T: ErrorType + ?Sized> ErrorType for &mut T {
    type Error = T::Error;
}

/// UART transmitter
pub trait UartTx: ErrorType {
    /// Write data to the UART
    ///
    /// Blocks until all data has been accepted by the channel or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx: ErrorType {
    /// Read data from the UART
    ///
    /// Blocks until the buffer is filled or an error occurs. Returns the
    /// number of bytes placed in `buf`.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the UART, blocking until one arrives
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        while self.read_blocking(&mut buf)? == 0 {}
        Ok(buf[0])
    }

    /// Read a single byte if one is already pending
    ///
    /// Returns `Ok(None)` immediately when the receive FIFO is empty.
    /// Timeouts are built on top of this by polling.
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

impl<T: UartTx + ?Sized> UartTx for &mut T {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_blocking(self, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

impl<T: UartRx + ?Sized> UartRx for &mut T {
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_blocking(self, buf)
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        T::try_read_byte(self)
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// UART configuration
///
/// The DFPlayer Mini only speaks 9600 baud 8N1, which is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedRx {
        bytes: &'static [u8],
        pos: usize,
    }

    impl ErrorType for ScriptedRx {
        type Error = ();
    }

    impl UartRx for ScriptedRx {
        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = buf.len().min(self.bytes.len() - self.pos);
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }

        fn try_read_byte(&mut self) -> Result<Option<u8>, ()> {
            let mut buf = [0u8; 1];
            Ok((self.read_blocking(&mut buf)? == 1).then_some(buf[0]))
        }
    }

    #[test]
    fn test_default_config_is_9600_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }

    #[test]
    fn test_read_byte_default_method() {
        let mut rx = ScriptedRx {
            bytes: &[0x7E, 0xEF],
            pos: 0,
        };
        assert_eq!(rx.read_byte(), Ok(0x7E));
        assert_eq!(rx.read_byte(), Ok(0xEF));
        assert_eq!(rx.try_read_byte(), Ok(None));
    }

    fn pull<R: UartRx>(mut rx: R) -> Result<Option<u8>, R::Error> {
        rx.try_read_byte()
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut rx = ScriptedRx {
            bytes: &[1, 2, 3],
            pos: 0,
        };
        assert_eq!(pull(&mut rx), Ok(Some(1)));
        assert_eq!(pull(&mut rx), Ok(Some(2)));
        assert_eq!(rx.pos, 2);
    }
}
