//! Command set for the DFPlayer protocol
//!
//! Commands are a closed set of tagged variants: an opcode alone, or an
//! opcode with a 16-bit argument. Both are turned into bytes by the single
//! builder in [`crate::frame`].
//!
//! Typed arguments ([`Volume`], [`EqPreset`], [`Device`]) carry their range
//! checks, so a [`Command`] built from them is always in range.

/// Opcode and reply code values
pub mod opcode {
    // Host → player: playback control
    pub const NEXT: u8 = 0x01;
    pub const PREVIOUS: u8 = 0x02;
    pub const PLAY_PHYSICAL: u8 = 0x03;
    pub const VOLUME_UP: u8 = 0x04;
    pub const VOLUME_DOWN: u8 = 0x05;
    pub const SET_VOLUME: u8 = 0x06;
    pub const SET_EQUALIZER: u8 = 0x07;
    pub const SET_DEVICE: u8 = 0x09;
    pub const SLEEP: u8 = 0x0A;
    pub const RESET: u8 = 0x0C;
    pub const PLAY: u8 = 0x0D;
    pub const PAUSE: u8 = 0x0E;
    pub const PLAY_FOLDER: u8 = 0x0F;
    pub const PLAY_TRACK: u8 = 0x12;
    pub const STOP: u8 = 0x16;
    pub const RANDOM_PLAY: u8 = 0x18;
    pub const SINGLE_LOOP: u8 = 0x19;
    pub const DAC: u8 = 0x1A;

    // Player → host: notifications
    pub const MEDIA_INSERTED: u8 = 0x3A;
    pub const MEDIA_REMOVED: u8 = 0x3B;
    pub const USB_TRACK_FINISHED: u8 = 0x3C;
    pub const SD_TRACK_FINISHED: u8 = 0x3D;
    pub const FLASH_TRACK_FINISHED: u8 = 0x3E;
    pub const MEDIA_ONLINE: u8 = 0x3F;
    pub const ERROR: u8 = 0x40;
    pub const ACK: u8 = 0x41;

    // Queries; the answer frame carries the same code
    pub const QUERY_STATE: u8 = 0x42;
    pub const QUERY_VOLUME: u8 = 0x43;
    pub const QUERY_EQUALIZER: u8 = 0x44;
    pub const QUERY_VERSION: u8 = 0x46;
    pub const QUERY_USB_TRACK_COUNT: u8 = 0x47;
    pub const QUERY_SD_TRACK_COUNT: u8 = 0x48;
    pub const QUERY_FLASH_TRACK_COUNT: u8 = 0x49;
    pub const QUERY_USB_CURRENT_TRACK: u8 = 0x4B;
    pub const QUERY_SD_CURRENT_TRACK: u8 = 0x4C;
    pub const QUERY_FLASH_CURRENT_TRACK: u8 = 0x4D;
}

/// Host-to-player opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    Next = opcode::NEXT,
    Previous = opcode::PREVIOUS,
    /// Play by physical (filesystem order) index
    PlayPhysical = opcode::PLAY_PHYSICAL,
    VolumeUp = opcode::VOLUME_UP,
    VolumeDown = opcode::VOLUME_DOWN,
    SetVolume = opcode::SET_VOLUME,
    SetEqualizer = opcode::SET_EQUALIZER,
    SetDevice = opcode::SET_DEVICE,
    Sleep = opcode::SLEEP,
    Reset = opcode::RESET,
    Play = opcode::PLAY,
    Pause = opcode::PAUSE,
    /// Play track in a numbered folder (arg: folder << 8 | track)
    PlayFolder = opcode::PLAY_FOLDER,
    /// Play `/MP3/NNNN*.mp3` by index
    PlayTrack = opcode::PLAY_TRACK,
    Stop = opcode::STOP,
    RandomPlay = opcode::RANDOM_PLAY,
    SingleLoop = opcode::SINGLE_LOOP,
    Dac = opcode::DAC,
    QueryState = opcode::QUERY_STATE,
    QueryVolume = opcode::QUERY_VOLUME,
    QueryEqualizer = opcode::QUERY_EQUALIZER,
    QueryVersion = opcode::QUERY_VERSION,
    QueryUsbTrackCount = opcode::QUERY_USB_TRACK_COUNT,
    QuerySdTrackCount = opcode::QUERY_SD_TRACK_COUNT,
    QueryFlashTrackCount = opcode::QUERY_FLASH_TRACK_COUNT,
    QueryUsbCurrentTrack = opcode::QUERY_USB_CURRENT_TRACK,
    QuerySdCurrentTrack = opcode::QUERY_SD_CURRENT_TRACK,
    QueryFlashCurrentTrack = opcode::QUERY_FLASH_CURRENT_TRACK,
}

impl Opcode {
    /// Wire value
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true if the player answers this opcode with a data frame
    pub const fn is_query(self) -> bool {
        (self as u8) >= opcode::QUERY_STATE
    }
}

/// A command ready to be framed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Opcode with no parameter; ARG is sent as zero
    Argumentless(Opcode),
    /// Opcode with a 16-bit parameter
    WithArg(Opcode, u16),
}

impl Command {
    /// The command's opcode
    pub const fn opcode(&self) -> Opcode {
        match *self {
            Command::Argumentless(op) | Command::WithArg(op, _) => op,
        }
    }

    /// The ARG field value
    pub const fn arg(&self) -> u16 {
        match *self {
            Command::Argumentless(_) => 0,
            Command::WithArg(_, arg) => arg,
        }
    }

    /// Set the output volume
    pub const fn set_volume(volume: Volume) -> Self {
        Command::WithArg(Opcode::SetVolume, volume.get() as u16)
    }

    /// Select an equalizer preset
    pub const fn set_equalizer(preset: EqPreset) -> Self {
        Command::WithArg(Opcode::SetEqualizer, preset as u16)
    }

    /// Select the playback device
    pub const fn set_device(device: Device) -> Self {
        Command::WithArg(Opcode::SetDevice, device as u16)
    }

    /// Enable or disable repeat of the current track
    ///
    /// The player treats 0 as "loop on".
    pub const fn single_loop(enabled: bool) -> Self {
        Command::WithArg(Opcode::SingleLoop, !enabled as u16)
    }

    /// Enable or disable the DAC output
    ///
    /// The player treats 0 as "DAC on".
    pub const fn dac(enabled: bool) -> Self {
        Command::WithArg(Opcode::Dac, !enabled as u16)
    }

    /// Play a track in a numbered folder
    pub fn play_folder(folder: u8, track: u8) -> Result<Self, ArgumentError> {
        if !(1..=MAX_FOLDER).contains(&folder) {
            return Err(ArgumentError::FolderOutOfRange(folder));
        }
        if track == 0 {
            return Err(ArgumentError::FolderTrackOutOfRange(track));
        }
        Ok(Command::WithArg(
            Opcode::PlayFolder,
            u16::from_be_bytes([folder, track]),
        ))
    }
}

/// Caller input rejected before any frame is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgumentError {
    /// Volume above [`MAX_VOLUME`]
    VolumeOutOfRange(u8),
    /// Equalizer id not in [`EqPreset`]
    EqualizerOutOfRange(u8),
    /// Device id not in [`Device`]
    DeviceOutOfRange(u8),
    /// Folder outside 1..=99
    FolderOutOfRange(u8),
    /// Folder track index of zero
    FolderTrackOutOfRange(u8),
}

/// Highest volume level the player accepts
pub const MAX_VOLUME: u8 = 30;

/// Highest numbered folder for [`Opcode::PlayFolder`]
pub const MAX_FOLDER: u8 = 99;

/// Volume level, 0..=30
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Volume(u8);

impl Volume {
    /// Check and wrap a volume level
    pub const fn new(level: u8) -> Result<Self, ArgumentError> {
        if level > MAX_VOLUME {
            Err(ArgumentError::VolumeOutOfRange(level))
        } else {
            Ok(Self(level))
        }
    }

    /// The raw level
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Volume {
    type Error = ArgumentError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

/// Equalizer presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum EqPreset {
    #[default]
    Normal = 0,
    Pop = 1,
    Rock = 2,
    Jazz = 3,
    Classic = 4,
    Bass = 5,
}

impl TryFrom<u8> for EqPreset {
    type Error = ArgumentError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(EqPreset::Normal),
            1 => Ok(EqPreset::Pop),
            2 => Ok(EqPreset::Rock),
            3 => Ok(EqPreset::Jazz),
            4 => Ok(EqPreset::Classic),
            5 => Ok(EqPreset::Bass),
            _ => Err(ArgumentError::EqualizerOutOfRange(id)),
        }
    }
}

/// Playback device selection for [`Opcode::SetDevice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Device {
    Usb = 1,
    Sd = 2,
    Aux = 3,
    Sleep = 4,
    Flash = 5,
}

impl TryFrom<u8> for Device {
    type Error = ArgumentError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Device::Usb),
            2 => Ok(Device::Sd),
            3 => Ok(Device::Aux),
            4 => Ok(Device::Sleep),
            5 => Ok(Device::Flash),
            _ => Err(ArgumentError::DeviceOutOfRange(id)),
        }
    }
}

/// Storage media that hold tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MediaSource {
    Usb,
    Sd,
    Flash,
}

impl MediaSource {
    /// Query for the number of tracks on this medium
    pub const fn track_count_query(self) -> Opcode {
        match self {
            MediaSource::Usb => Opcode::QueryUsbTrackCount,
            MediaSource::Sd => Opcode::QuerySdTrackCount,
            MediaSource::Flash => Opcode::QueryFlashTrackCount,
        }
    }

    /// Query for the track currently selected on this medium
    pub const fn current_track_query(self) -> Opcode {
        match self {
            MediaSource::Usb => Opcode::QueryUsbCurrentTrack,
            MediaSource::Sd => Opcode::QuerySdCurrentTrack,
            MediaSource::Flash => Opcode::QueryFlashCurrentTrack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_bounds() {
        assert_eq!(Volume::new(0).map(Volume::get), Ok(0));
        assert_eq!(Volume::new(30).map(Volume::get), Ok(30));
        assert_eq!(Volume::new(31), Err(ArgumentError::VolumeOutOfRange(31)));
        assert_eq!(
            Volume::try_from(255),
            Err(ArgumentError::VolumeOutOfRange(255))
        );
    }

    #[test]
    fn test_eq_preset_ids() {
        assert_eq!(EqPreset::try_from(5), Ok(EqPreset::Bass));
        assert_eq!(
            EqPreset::try_from(6),
            Err(ArgumentError::EqualizerOutOfRange(6))
        );
        assert_eq!(Command::set_equalizer(EqPreset::Rock).arg(), 2);
    }

    #[test]
    fn test_device_ids() {
        assert_eq!(Device::try_from(2), Ok(Device::Sd));
        assert_eq!(Device::try_from(0), Err(ArgumentError::DeviceOutOfRange(0)));
        assert_eq!(Device::try_from(6), Err(ArgumentError::DeviceOutOfRange(6)));
        assert_eq!(Command::set_device(Device::Flash).arg(), 5);
    }

    #[test]
    fn test_inverted_toggles() {
        assert_eq!(
            Command::single_loop(true),
            Command::WithArg(Opcode::SingleLoop, 0)
        );
        assert_eq!(
            Command::single_loop(false),
            Command::WithArg(Opcode::SingleLoop, 1)
        );
        assert_eq!(Command::dac(true), Command::WithArg(Opcode::Dac, 0));
        assert_eq!(Command::dac(false), Command::WithArg(Opcode::Dac, 1));
    }

    #[test]
    fn test_play_folder_packing() {
        assert_eq!(
            Command::play_folder(2, 15),
            Ok(Command::WithArg(Opcode::PlayFolder, 0x020F))
        );
        assert_eq!(
            Command::play_folder(0, 1),
            Err(ArgumentError::FolderOutOfRange(0))
        );
        assert_eq!(
            Command::play_folder(100, 1),
            Err(ArgumentError::FolderOutOfRange(100))
        );
        assert_eq!(
            Command::play_folder(1, 0),
            Err(ArgumentError::FolderTrackOutOfRange(0))
        );
    }

    #[test]
    fn test_query_classification() {
        assert!(Opcode::QueryState.is_query());
        assert!(Opcode::QueryFlashCurrentTrack.is_query());
        assert!(!Opcode::Dac.is_query());
        assert!(!Opcode::Play.is_query());
    }

    #[test]
    fn test_media_source_queries() {
        assert_eq!(MediaSource::Usb.track_count_query().code(), 0x47);
        assert_eq!(MediaSource::Sd.track_count_query().code(), 0x48);
        assert_eq!(MediaSource::Flash.track_count_query().code(), 0x49);
        assert_eq!(MediaSource::Usb.current_track_query().code(), 0x4B);
        assert_eq!(MediaSource::Sd.current_track_query().code(), 0x4C);
        assert_eq!(MediaSource::Flash.current_track_query().code(), 0x4D);
    }
}
