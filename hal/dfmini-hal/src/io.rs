//! Bridge from `embedded-io` ports to the UART traits
//!
//! Most chip HALs expose their serial peripherals through `embedded-io`.
//! Wrapping one in [`IoUart`] is enough to drive a DFPlayer from it.

use embedded_io::{Read, ReadReady, Write};

use crate::uart::{ErrorType, UartRx, UartTx};

/// Adapter from an `embedded-io` port to [`UartTx`] + [`UartRx`]
pub struct IoUart<T> {
    inner: T,
}

impl<T> IoUart<T> {
    /// Wrap a port
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get access to the wrapped port
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Get mutable access to the wrapped port
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the port
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: embedded_io::ErrorType> ErrorType for IoUart<T> {
    type Error = T::Error;
}

impl<T: Write> UartTx for IoUart<T> {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

impl<T: Read + ReadReady> UartRx for IoUart<T> {
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.inner.read(&mut buf[filled..])?;
            if n == 0 {
                // EOF on the underlying port
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        let n = self.inner.read(&mut byte)?;
        Ok((n == 1).then_some(byte[0]))
    }
}
