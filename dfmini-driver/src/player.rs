//! DFPlayer Mini command surface
//!
//! One method per player action. Arguments are checked here, before any
//! frame is built; an out-of-range value returns
//! [`DriverError::InvalidArgument`] and nothing is transmitted.
//!
//! # Reply mode
//!
//! With reply mode off (the default) control commands are fire-and-forget.
//! With it on, each control command sets the ACK flag and waits for the
//! player's acknowledgement frame. Queries never set the ACK flag: the
//! answer frame is the reply.
//!
//! Track indices are passed to the player unchanged. The player is the only
//! judge of whether an index exists, and in reply mode its error frame is
//! surfaced as [`DriverError::Rejected`].

use dfmini_hal::Uart;
use dfmini_protocol::{
    opcode, parse, Command, Device, EqPreset, Frame, MediaSource, Opcode, PlaybackStatus, Reply,
    Volume,
};
use embedded_hal::delay::DelayNs;

use crate::config::PlayerConfig;
use crate::error::DriverError;
use crate::transport::Transport;

/// DFPlayer Mini driver
pub struct DfPlayer<U, D> {
    transport: Transport<U, D>,
    config: PlayerConfig,
    reply_mode: bool,
}

impl<U: Uart, D: DelayNs> DfPlayer<U, D> {
    /// Create a driver on an already configured channel
    ///
    /// Reply mode starts disabled.
    pub fn new(uart: U, delay: D, config: PlayerConfig) -> Self {
        Self {
            transport: Transport::new(uart, delay, &config),
            config,
            reply_mode: false,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Get access to the underlying transport
    pub fn transport(&self) -> &Transport<U, D> {
        &self.transport
    }

    /// Give back the channel and delay provider
    pub fn release(self) -> (U, D) {
        self.transport.release()
    }

    /// Request (or stop requesting) acknowledgements for control commands
    ///
    /// Only changes local state; nothing is sent.
    pub fn set_reply_mode(&mut self, enabled: bool) {
        self.reply_mode = enabled;
    }

    /// Whether control commands wait for an acknowledgement
    pub fn is_reply_mode(&self) -> bool {
        self.reply_mode
    }

    // Playback

    /// Resume or start playback
    pub fn play(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::Play))
    }

    /// Play `/MP3/NNNN*.mp3` by index
    pub fn play_track(&mut self, index: u16) -> Result<(), DriverError<U::Error>> {
        self.command(Command::WithArg(Opcode::PlayTrack, index))
    }

    /// Play by filesystem order on the current device
    pub fn play_physical(&mut self, index: u16) -> Result<(), DriverError<U::Error>> {
        self.command(Command::WithArg(Opcode::PlayPhysical, index))
    }

    /// Play `/FF/TTT*.mp3` (folder 1..=99, track 1..=255)
    pub fn play_folder(&mut self, folder: u8, track: u8) -> Result<(), DriverError<U::Error>> {
        let command = Command::play_folder(folder, track)?;
        self.command(command)
    }

    pub fn next(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::Next))
    }

    pub fn previous(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::Previous))
    }

    pub fn pause(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::Pause))
    }

    pub fn stop(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::Stop))
    }

    /// Play all tracks on the device in random order
    pub fn random_play(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::RandomPlay))
    }

    /// Repeat the current track
    pub fn single_loop(&mut self, enabled: bool) -> Result<(), DriverError<U::Error>> {
        self.command(Command::single_loop(enabled))
    }

    /// Play a track and keep repeating it
    ///
    /// Sends play-track, waits `single_play_settle_ms`, then enables
    /// single loop.
    pub fn single_play(&mut self, index: u16) -> Result<(), DriverError<U::Error>> {
        self.play_track(index)?;
        self.transport.delay_ms(self.config.single_play_settle_ms);
        self.single_loop(true)
    }

    // Output

    /// Set the volume (0..=30)
    pub fn set_volume(&mut self, level: u8) -> Result<(), DriverError<U::Error>> {
        let volume = Volume::new(level)?;
        self.command(Command::set_volume(volume))
    }

    pub fn volume_up(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::VolumeUp))
    }

    pub fn volume_down(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::VolumeDown))
    }

    /// Select an equalizer preset
    ///
    /// Raw ids convert with `EqPreset::try_from`, which rejects values
    /// above 5.
    pub fn set_equalizer(&mut self, preset: EqPreset) -> Result<(), DriverError<U::Error>> {
        self.command(Command::set_equalizer(preset))
    }

    /// Select the playback device
    pub fn set_device(&mut self, device: Device) -> Result<(), DriverError<U::Error>> {
        self.command(Command::set_device(device))
    }

    /// Enable or disable the DAC output
    pub fn set_dac(&mut self, enabled: bool) -> Result<(), DriverError<U::Error>> {
        self.command(Command::dac(enabled))
    }

    // Power

    pub fn sleep(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::Sleep))
    }

    /// Soft-reset the module
    pub fn reset(&mut self) -> Result<(), DriverError<U::Error>> {
        self.command(Command::Argumentless(Opcode::Reset))
    }

    // Queries

    /// Current device and playback state
    pub fn get_state(&mut self) -> Result<PlaybackStatus, DriverError<U::Error>> {
        match self.query(Opcode::QueryState)? {
            Reply::Status(status) => Ok(status),
            other => Err(DriverError::UnexpectedReply(other)),
        }
    }

    pub fn get_volume(&mut self) -> Result<u8, DriverError<U::Error>> {
        match self.query(Opcode::QueryVolume)? {
            Reply::Volume(level) => Ok(level),
            other => Err(DriverError::UnexpectedReply(other)),
        }
    }

    pub fn get_equalizer(&mut self) -> Result<EqPreset, DriverError<U::Error>> {
        match self.query(Opcode::QueryEqualizer)? {
            Reply::Equalizer(preset) => Ok(preset),
            other => Err(DriverError::UnexpectedReply(other)),
        }
    }

    /// Firmware version reported by the module
    pub fn get_version(&mut self) -> Result<u16, DriverError<U::Error>> {
        match self.query(Opcode::QueryVersion)? {
            Reply::Version(version) => Ok(version),
            other => Err(DriverError::UnexpectedReply(other)),
        }
    }

    /// Number of tracks on a medium
    pub fn get_track_count(&mut self, source: MediaSource) -> Result<u16, DriverError<U::Error>> {
        match self.query(source.track_count_query())? {
            Reply::TrackCount { count, .. } => Ok(count),
            other => Err(DriverError::UnexpectedReply(other)),
        }
    }

    pub fn get_usb_track_count(&mut self) -> Result<u16, DriverError<U::Error>> {
        self.get_track_count(MediaSource::Usb)
    }

    pub fn get_sd_track_count(&mut self) -> Result<u16, DriverError<U::Error>> {
        self.get_track_count(MediaSource::Sd)
    }

    pub fn get_flash_track_count(&mut self) -> Result<u16, DriverError<U::Error>> {
        self.get_track_count(MediaSource::Flash)
    }

    /// Track currently selected on a medium
    pub fn get_current_track(&mut self, source: MediaSource) -> Result<u16, DriverError<U::Error>> {
        match self.query(source.current_track_query())? {
            Reply::CurrentTrack { track, .. } => Ok(track),
            other => Err(DriverError::UnexpectedReply(other)),
        }
    }

    // Notifications

    /// Wait for the next frame the player sends on its own
    ///
    /// Track-finished and media events arrive this way. Gives up after the
    /// reply timeout.
    pub fn read_reply(&mut self) -> Result<Reply, DriverError<U::Error>> {
        let raw = self.transport.receive()?;
        Ok(parse(&raw)?)
    }

    /// Skip to the next valid frame after a protocol error
    pub fn resync(&mut self) -> Result<Reply, DriverError<U::Error>> {
        let frame = self.transport.resync()?;
        Ok(Reply::from_frame(&frame))
    }

    /// Send a control command, waiting for the ACK when in reply mode
    fn command(&mut self, command: Command) -> Result<(), DriverError<U::Error>> {
        if !self.reply_mode {
            return self.transport.send(command, false);
        }

        let raw = self.transport.send_and_receive(command, true)?;
        match parse(&raw)? {
            Reply::Ack => Ok(()),
            Reply::Error(e) => Err(DriverError::Rejected(e)),
            other => Err(DriverError::UnexpectedReply(other)),
        }
    }

    /// Send a query and return the answer decoded
    ///
    /// The answer must carry the query's own code; an error frame is
    /// reported as [`DriverError::Rejected`].
    fn query(&mut self, query: Opcode) -> Result<Reply, DriverError<U::Error>> {
        let raw = self
            .transport
            .send_and_receive(Command::Argumentless(query), false)?;
        let frame = Frame::decode(&raw)?;
        let reply = Reply::from_frame(&frame);

        match frame.command {
            opcode::ERROR => match reply {
                Reply::Error(e) => Err(DriverError::Rejected(e)),
                other => Err(DriverError::UnexpectedReply(other)),
            },
            code if code == query.code() => Ok(reply),
            _ => Err(DriverError::UnexpectedReply(reply)),
        }
    }
}
