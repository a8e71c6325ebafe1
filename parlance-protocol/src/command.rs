//! Command codes, text encodings and acknowledgement bytes

/// Byte sent repeatedly while waking the module over I2C
pub const WAKE_BYTE: u8 = 0xAA;

/// Status byte: frame received and accepted for synthesis
pub const ACK_ACCEPTED: u8 = 0x41;

/// Status byte: module idle, previous playback finished
pub const ACK_COMPLETE: u8 = 0x4F;

/// Host-to-module command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Start synthesising the attached text
    Speak = 0x01,
    /// Abort the current synthesis
    Stop = 0x02,
    /// Pause the current synthesis
    Pause = 0x03,
    /// Resume a paused synthesis
    Resume = 0x04,
    /// Query module status (answered with an [`Ack`] byte)
    Query = 0x21,
    /// Enter power-saving mode
    Sleep = 0x88,
    /// Leave power-saving mode
    Wake = 0xFF,
}

impl Command {
    /// Get the command as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Text encoding selector, the fifth header byte of a speak frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Encoding {
    /// 7-bit ASCII, one byte per character
    Ascii = 0x00,
    /// Unicode scalars, little-endian: two bytes per character below
    /// U+10000, three above
    Unicode = 0x03,
    /// 7-bit ASCII sent as one unsegmented buffer (control strings)
    RawAscii = 0x04,
}

impl Encoding {
    /// Get the encoding as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Interpreted status byte from the module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    /// Frame accepted (0x41)
    Accepted,
    /// Playback complete (0x4F)
    Complete,
    /// Anything else, including no byte at all: "not yet"
    Pending,
}

impl Ack {
    /// Classify a raw status byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ACK_ACCEPTED => Ack::Accepted,
            ACK_COMPLETE => Ack::Complete,
            _ => Ack::Pending,
        }
    }

    /// Classify an optional status byte (`None` when nothing was received)
    pub fn from_read(byte: Option<u8>) -> Self {
        byte.map_or(Ack::Pending, Self::from_byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_classification() {
        assert_eq!(Ack::from_byte(0x41), Ack::Accepted);
        assert_eq!(Ack::from_byte(0x4F), Ack::Complete);
        assert_eq!(Ack::from_byte(0x00), Ack::Pending);
        assert_eq!(Ack::from_byte(0xFF), Ack::Pending);
        assert_eq!(Ack::from_read(None), Ack::Pending);
        assert_eq!(Ack::from_read(Some(b'O')), Ack::Complete);
    }

    #[test]
    fn test_encoding_bytes() {
        assert_eq!(Encoding::Ascii.as_u8(), 0x00);
        assert_eq!(Encoding::Unicode.as_u8(), 0x03);
        assert_eq!(Encoding::RawAscii.as_u8(), 0x04);
    }

    #[test]
    fn test_command_bytes() {
        assert_eq!(Command::Speak.as_u8(), 0x01);
        assert_eq!(Command::Query.as_u8(), 0x21);
        assert_eq!(Command::Sleep.as_u8(), 0x88);
    }
}
