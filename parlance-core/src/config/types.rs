//! Configuration type definitions

use parlance_protocol::{Level, Voice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default 7-bit I2C address of the module
pub const DEFAULT_I2C_ADDRESS: u8 = 0x40;

/// Largest I2C write the module accepts in one transaction
pub const DEFAULT_I2C_CHUNK_LEN: usize = 28;

/// Bus geometry and link timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// 7-bit I2C address
    pub i2c_address: u8,
    /// Payload bytes per I2C write
    pub i2c_chunk_len: usize,
    /// Time the module needs before a UART status byte can be read
    pub uart_ack_delay_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            i2c_address: DEFAULT_I2C_ADDRESS,
            i2c_chunk_len: DEFAULT_I2C_CHUNK_LEN,
            uart_ack_delay_ms: 10,
        }
    }
}

/// Playback handshake timing
///
/// Deadlines are `None` by default, which waits forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandshakeConfig {
    /// Pause between the accept ACK and the first status query
    pub settle_ms: u32,
    /// Pause between accept polls
    pub accept_poll_ms: u32,
    /// Pause between status queries
    pub complete_poll_ms: u32,
    /// Give up waiting for the accept ACK after this long
    pub accept_timeout_ms: Option<u32>,
    /// Give up waiting for playback to finish after this long
    pub complete_timeout_ms: Option<u32>,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            settle_ms: 100,
            accept_poll_ms: 1,
            complete_poll_ms: 20,
            accept_timeout_ms: None,
            complete_timeout_ms: None,
        }
    }
}

/// Wake-up probing in [`Synthesizer::begin`](crate::synth::Synthesizer::begin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InitConfig {
    /// Number of wake attempts before giving up
    pub wake_attempts: u8,
    /// Pause after each wake byte
    pub wake_delay_ms: u32,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            wake_attempts: 40,
            wake_delay_ms: 50,
        }
    }
}

/// Voice parameters applied once the module is awake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoiceDefaults {
    /// Volume set on every start
    pub volume: Level,
    /// Speed; left at the module's own default when `None`
    pub speed: Option<Level>,
    /// Tone; left at the module's own default when `None`
    pub tone: Option<Level>,
    /// Speaker voice; left at the module's own default when `None`
    pub voice: Option<Voice>,
}

impl Default for VoiceDefaults {
    fn default() -> Self {
        Self {
            volume: Level::new(1),
            speed: None,
            tone: None,
            voice: None,
        }
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SynthConfig {
    /// Bus geometry and link timing
    pub device: DeviceConfig,
    /// Playback handshake timing
    pub handshake: HandshakeConfig,
    /// Wake-up probing
    pub init: InitConfig,
    /// Voice parameters applied by `begin`
    pub voice: VoiceDefaults,
}

impl SynthConfig {
    /// Defaults for a module on I2C (startup volume 1)
    pub fn i2c() -> Self {
        Self::default()
    }

    /// Defaults for a module on UART (startup volume 5)
    ///
    /// A UART module is awake as soon as it is powered, so no wake bytes
    /// are sent.
    pub fn uart() -> Self {
        Self {
            init: InitConfig {
                wake_attempts: 0,
                ..InitConfig::default()
            },
            voice: VoiceDefaults {
                volume: Level::new(5),
                ..VoiceDefaults::default()
            },
            ..Self::default()
        }
    }
}
