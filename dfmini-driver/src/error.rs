//! Driver error type

use dfmini_protocol::{ArgumentError, PeripheralError, ProtocolError, Reply};

/// Errors returned by [`crate::DfPlayer`] and [`crate::Transport`]
///
/// `E` is the channel's error type. Nothing here is retried or swallowed
/// inside the driver; the caller decides whether to retry, resync or give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// Caller input out of range; nothing was transmitted
    InvalidArgument(ArgumentError),
    /// Channel hardware fault
    Link(E),
    /// Reply frame incomplete when the timeout elapsed
    Timeout,
    /// Reply frame failed validation
    Protocol(ProtocolError),
    /// Player answered with an error frame
    Rejected(PeripheralError),
    /// Valid frame that does not answer the command that was sent
    UnexpectedReply(Reply),
}

impl<E> DriverError<E> {
    /// Returns true if the failure came from the link rather than the caller
    ///
    /// These are the errors a caller may reasonably retry.
    pub fn is_link_related(&self) -> bool {
        matches!(
            self,
            DriverError::Link(_) | DriverError::Timeout | DriverError::Protocol(_)
        )
    }
}

impl<E> From<ArgumentError> for DriverError<E> {
    fn from(e: ArgumentError) -> Self {
        DriverError::InvalidArgument(e)
    }
}

impl<E> From<ProtocolError> for DriverError<E> {
    fn from(e: ProtocolError) -> Self {
        DriverError::Protocol(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_volume(level: u8) -> Result<u8, DriverError<()>> {
        let volume = dfmini_protocol::Volume::new(level)?;
        Ok(volume.get())
    }

    #[test]
    fn test_argument_error_converts() {
        assert_eq!(check_volume(12), Ok(12));
        assert_eq!(
            check_volume(40),
            Err(DriverError::InvalidArgument(ArgumentError::VolumeOutOfRange(40)))
        );
    }

    #[test]
    fn test_link_related() {
        assert!(DriverError::<()>::Timeout.is_link_related());
        assert!(DriverError::Link(()).is_link_related());
        assert!(DriverError::<()>::Protocol(ProtocolError::BadEndMarker).is_link_related());
        assert!(!DriverError::<()>::Rejected(PeripheralError::Busy).is_link_related());
        assert!(
            !DriverError::<()>::InvalidArgument(ArgumentError::DeviceOutOfRange(9))
                .is_link_related()
        );
    }
}
