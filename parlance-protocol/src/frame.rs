//! Frame header encoding for the synthesis module protocol.
//!
//! Speak frame header:
//! - MARKER (1 byte): 0xFD
//! - LENGTH (2 bytes, big-endian): payload length + 2
//! - COMMAND (1 byte): always [`Command::Speak`]
//! - ENCODING (1 byte): how the payload bytes are to be read
//!
//! Control frames are the first four bytes of the same layout with a length
//! of 1 and no encoding byte.

use crate::command::{Command, Encoding};

/// Frame synchronization byte
pub const FRAME_MARKER: u8 = 0xFD;

/// Speak frame header size in bytes
pub const HEADER_LEN: usize = 5;

/// Control frame size in bytes
pub const CONTROL_FRAME_LEN: usize = 4;

/// Bytes the LENGTH field counts on top of the payload
const LENGTH_OVERHEAD: usize = 2;

/// Largest payload whose length still fits the 16-bit LENGTH field
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize - LENGTH_OVERHEAD;

/// Status query, sent while waiting for playback to finish
pub const STATUS_QUERY: [u8; CONTROL_FRAME_LEN] = control_frame(Command::Query);

/// Errors that can occur during frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::PayloadTooLarge => write!(f, "payload too large for one frame"),
        }
    }
}

/// Header of a speak frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeakHeader {
    /// How the payload is encoded
    pub encoding: Encoding,
    /// Payload size in bytes (not the LENGTH field value)
    pub payload_len: u16,
}

impl SpeakHeader {
    /// Create a header for a payload of `payload_len` bytes
    pub fn new(encoding: Encoding, payload_len: usize) -> Result<Self, FrameError> {
        if payload_len > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLarge);
        }

        Ok(Self {
            encoding,
            payload_len: payload_len as u16,
        })
    }

    /// Value carried in the LENGTH field
    pub fn length_field(&self) -> u16 {
        self.payload_len + LENGTH_OVERHEAD as u16
    }

    /// Encode this header into its wire form
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let [len_hi, len_lo] = self.length_field().to_be_bytes();
        [
            FRAME_MARKER,
            len_hi,
            len_lo,
            Command::Speak.as_u8(),
            self.encoding.as_u8(),
        ]
    }
}

/// Build the wire form of a payload-less control command
pub const fn control_frame(command: Command) -> [u8; CONTROL_FRAME_LEN] {
    [FRAME_MARKER, 0x00, 0x01, command as u8]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_chinese_header() {
        let header = SpeakHeader::new(Encoding::Unicode, 2).unwrap();
        assert_eq!(header.encode(), [0xFD, 0x00, 0x04, 0x01, 0x03]);
    }

    #[test]
    fn test_ascii_header() {
        let header = SpeakHeader::new(Encoding::Ascii, 2).unwrap();
        assert_eq!(header.encode(), [0xFD, 0x00, 0x04, 0x01, 0x00]);
    }

    #[test]
    fn test_length_field_is_big_endian() {
        let header = SpeakHeader::new(Encoding::RawAscii, 0x0123).unwrap();
        let bytes = header.encode();
        assert_eq!(bytes[1], 0x01);
        assert_eq!(bytes[2], 0x25);
    }

    #[test]
    fn test_status_query() {
        assert_eq!(STATUS_QUERY, [0xFD, 0x00, 0x01, 0x21]);
    }

    #[test]
    fn test_control_frames() {
        assert_eq!(control_frame(Command::Stop), [0xFD, 0x00, 0x01, 0x02]);
        assert_eq!(control_frame(Command::Pause), [0xFD, 0x00, 0x01, 0x03]);
        assert_eq!(control_frame(Command::Resume), [0xFD, 0x00, 0x01, 0x04]);
        assert_eq!(control_frame(Command::Sleep), [0xFD, 0x00, 0x01, 0x88]);
        assert_eq!(control_frame(Command::Wake), [0xFD, 0x00, 0x01, 0xFF]);
    }

    #[test]
    fn test_payload_too_large() {
        assert_eq!(
            SpeakHeader::new(Encoding::Ascii, MAX_PAYLOAD_LEN + 1),
            Err(FrameError::PayloadTooLarge)
        );
        assert!(SpeakHeader::new(Encoding::Ascii, MAX_PAYLOAD_LEN).is_ok());
    }

    proptest! {
        #[test]
        fn length_field_counts_overhead(len in 0usize..=MAX_PAYLOAD_LEN) {
            let header = SpeakHeader::new(Encoding::Ascii, len).unwrap();
            let bytes = header.encode();
            prop_assert_eq!(header.length_field() as usize, len + 2);
            prop_assert_eq!(u16::from_be_bytes([bytes[1], bytes[2]]) as usize, len + 2);
        }
    }
}
