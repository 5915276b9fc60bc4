//! Reply interpretation
//!
//! Every valid frame from the player decodes into a [`Reply`]; the COMMAND
//! byte selects the variant. Codes this crate does not model come back as
//! [`Reply::Other`].

use crate::commands::{opcode, EqPreset, MediaSource, MAX_VOLUME};
use crate::frame::{Frame, ProtocolError};

/// Playback state reported by the state query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayState {
    Stopped,
    Playing,
    Paused,
    Unknown(u8),
}

impl PlayState {
    fn from_byte(byte: u8) -> Self {
        match byte {
            0 => PlayState::Stopped,
            1 => PlayState::Playing,
            2 => PlayState::Paused,
            other => PlayState::Unknown(other),
        }
    }
}

/// Answer to the state query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackStatus {
    /// Active device code (high ARG byte), as reported
    pub device_code: u8,
    /// Playback state (low ARG byte)
    pub state: PlayState,
}

/// Bitmask of storage media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MediaSet(pub u8);

impl MediaSet {
    const USB: u8 = 0x01;
    const SD: u8 = 0x02;
    const PC: u8 = 0x04;
    const FLASH: u8 = 0x08;

    pub fn usb(&self) -> bool {
        self.0 & Self::USB != 0
    }

    pub fn sd(&self) -> bool {
        self.0 & Self::SD != 0
    }

    pub fn pc(&self) -> bool {
        self.0 & Self::PC != 0
    }

    pub fn flash(&self) -> bool {
        self.0 & Self::FLASH != 0
    }

    /// Check whether a track-bearing medium is in the set
    pub fn contains(&self, source: MediaSource) -> bool {
        match source {
            MediaSource::Usb => self.usb(),
            MediaSource::Sd => self.sd(),
            MediaSource::Flash => self.flash(),
        }
    }
}

/// Error codes the player reports in an error frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralError {
    /// Module still initializing
    Busy,
    /// Module is in sleep mode
    Sleeping,
    /// Frame not received completely
    SerialError,
    /// Player computed a different checksum
    ChecksumError,
    /// Track index beyond the number of files
    TrackOutOfScope,
    /// Track index not found
    TrackNotFound,
    /// Media insertion error
    InsertionError,
    /// SD card read failed
    SdReadFailed,
    /// Module entered sleep
    EnteredSleep,
    /// Unlisted code, kept as sent
    Unknown(u16),
}

impl PeripheralError {
    /// Decode the ARG of an error frame
    pub fn from_code(code: u16) -> Self {
        match code {
            0x01 => PeripheralError::Busy,
            0x02 => PeripheralError::Sleeping,
            0x03 => PeripheralError::SerialError,
            0x04 => PeripheralError::ChecksumError,
            0x05 => PeripheralError::TrackOutOfScope,
            0x06 => PeripheralError::TrackNotFound,
            0x07 => PeripheralError::InsertionError,
            0x08 => PeripheralError::SdReadFailed,
            0x0A => PeripheralError::EnteredSleep,
            other => PeripheralError::Unknown(other),
        }
    }
}

/// A decoded player-to-host frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Command accepted (sent when the ACK flag was set)
    Ack,
    /// Player refused a command or hit a fault
    Error(PeripheralError),
    Status(PlaybackStatus),
    /// Current volume, 0..=30
    Volume(u8),
    Equalizer(EqPreset),
    Version(u16),
    /// Media present after power-up
    MediaOnline(MediaSet),
    MediaInserted(MediaSet),
    MediaRemoved(MediaSet),
    TrackCount { source: MediaSource, count: u16 },
    CurrentTrack { source: MediaSource, track: u16 },
    /// Playback of `track` reached its end
    TrackFinished { source: MediaSource, track: u16 },
    /// Valid frame with a code not modelled above
    Other { command: u8, arg: u16 },
}

impl Reply {
    /// Decode a validated frame
    pub fn from_frame(frame: &Frame) -> Self {
        let arg = frame.arg;
        let low = arg as u8;

        match frame.command {
            opcode::ACK => Reply::Ack,
            opcode::ERROR => Reply::Error(PeripheralError::from_code(arg)),
            opcode::QUERY_STATE => Reply::Status(PlaybackStatus {
                device_code: (arg >> 8) as u8,
                state: PlayState::from_byte(low),
            }),
            opcode::QUERY_VOLUME if arg <= MAX_VOLUME as u16 => Reply::Volume(low),
            opcode::QUERY_EQUALIZER => match EqPreset::try_from(low) {
                Ok(preset) if arg <= u8::MAX as u16 => Reply::Equalizer(preset),
                _ => Reply::Other {
                    command: frame.command,
                    arg,
                },
            },
            opcode::QUERY_VERSION => Reply::Version(arg),
            opcode::MEDIA_ONLINE => Reply::MediaOnline(MediaSet(low)),
            opcode::MEDIA_INSERTED => Reply::MediaInserted(MediaSet(low)),
            opcode::MEDIA_REMOVED => Reply::MediaRemoved(MediaSet(low)),
            opcode::QUERY_USB_TRACK_COUNT => Reply::TrackCount {
                source: MediaSource::Usb,
                count: arg,
            },
            opcode::QUERY_SD_TRACK_COUNT => Reply::TrackCount {
                source: MediaSource::Sd,
                count: arg,
            },
            opcode::QUERY_FLASH_TRACK_COUNT => Reply::TrackCount {
                source: MediaSource::Flash,
                count: arg,
            },
            opcode::QUERY_USB_CURRENT_TRACK => Reply::CurrentTrack {
                source: MediaSource::Usb,
                track: arg,
            },
            opcode::QUERY_SD_CURRENT_TRACK => Reply::CurrentTrack {
                source: MediaSource::Sd,
                track: arg,
            },
            opcode::QUERY_FLASH_CURRENT_TRACK => Reply::CurrentTrack {
                source: MediaSource::Flash,
                track: arg,
            },
            opcode::USB_TRACK_FINISHED => Reply::TrackFinished {
                source: MediaSource::Usb,
                track: arg,
            },
            opcode::SD_TRACK_FINISHED => Reply::TrackFinished {
                source: MediaSource::Sd,
                track: arg,
            },
            opcode::FLASH_TRACK_FINISHED => Reply::TrackFinished {
                source: MediaSource::Flash,
                track: arg,
            },
            command => Reply::Other { command, arg },
        }
    }
}

/// Validate and decode a raw reply frame
pub fn parse(raw: &[u8]) -> Result<Reply, ProtocolError> {
    Frame::decode(raw).map(|frame| Reply::from_frame(&frame))
}
