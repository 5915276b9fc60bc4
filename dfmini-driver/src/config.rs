//! Driver configuration

use dfmini_hal::UartConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// DFPlayer driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerConfig {
    /// How long to wait for a complete reply frame (ms)
    pub reply_timeout_ms: u32,
    /// Receive poll interval while waiting for reply bytes (µs)
    pub poll_interval_us: u32,
    /// Pause between the play and loop commands of a single-play (ms)
    pub single_play_settle_ms: u32,
    /// Serial settings for whoever opens the port
    ///
    /// The driver never reconfigures the channel.
    pub uart: UartConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: 500,
            poll_interval_us: 1000,
            single_play_settle_ms: 10,
            uart: UartConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Reply timeout in microseconds
    pub fn reply_timeout_us(&self) -> u32 {
        self.reply_timeout_ms.saturating_mul(1000)
    }

    /// Poll interval in microseconds, never zero
    pub fn poll_step_us(&self) -> u32 {
        self.poll_interval_us.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.reply_timeout_us(), 500_000);
        assert_eq!(config.uart.baudrate, 9600);
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = PlayerConfig {
            poll_interval_us: 0,
            ..PlayerConfig::default()
        };
        assert_eq!(config.poll_step_us(), 1);
    }

    #[test]
    fn test_timeout_saturates() {
        let config = PlayerConfig {
            reply_timeout_ms: u32::MAX,
            ..PlayerConfig::default()
        };
        assert_eq!(config.reply_timeout_us(), u32::MAX);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_toml() {
        let config: PlayerConfig = toml::from_str(
            r#"
            reply_timeout_ms = 250

            [uart]
            baudrate = 9600
            parity = "None"
            "#,
        )
        .unwrap();

        assert_eq!(config.reply_timeout_ms, 250);
        assert_eq!(config.poll_interval_us, 1000);
        assert_eq!(config.uart, UartConfig::default());
    }
}
