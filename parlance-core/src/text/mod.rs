//! Text scanning: UTF-8 decoding, script classification and segmentation
//!
//! The synthesis module reads English as 7-bit ASCII and everything else as
//! little-endian Unicode scalars, and it cannot mix the two in one frame.
//! This module splits caller text into runs of a single [`Script`] and
//! converts each code point into the module's native bytes.

pub mod decoder;
pub mod segmenter;
pub mod source;

pub use decoder::{decode_at, native_len, DecodeError};
pub use segmenter::{Segment, Segmenter};
pub use source::{Text, TextSource};

/// Largest native encoding of a single code point
pub const MAX_NATIVE_LEN: usize = 3;

/// Script class of a code point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Script {
    /// Single-byte code point, read as English
    Ascii,
    /// Multi-byte code point, read as Chinese
    MultiByte,
}

/// One decoded code point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodePoint {
    /// Decoded scalar value (ASCII already masked to 7 bits)
    pub scalar: u32,
    /// Number of source bytes consumed
    pub width: u8,
}

impl CodePoint {
    /// Script class, decided by the source width alone
    pub fn script(&self) -> Script {
        if self.width == 1 {
            Script::Ascii
        } else {
            Script::MultiByte
        }
    }

    /// Number of bytes in the native encoding
    pub fn native_len(&self) -> usize {
        native_width(self.width as usize)
    }

    /// Write the native encoding into `out`, returning the used prefix
    ///
    /// ASCII becomes one 7-bit byte; multi-byte scalars become their low
    /// bytes in little-endian order.
    pub fn encode_native<'o>(&self, out: &'o mut [u8; MAX_NATIVE_LEN]) -> &'o [u8] {
        let len = self.native_len();
        if len == 1 {
            out[0] = (self.scalar & 0x7F) as u8;
        } else {
            let bytes = self.scalar.to_le_bytes();
            out[..len].copy_from_slice(&bytes[..len]);
        }
        &out[..len]
    }
}

/// Native payload bytes produced by a code point of `width` source bytes
pub(crate) const fn native_width(width: usize) -> usize {
    match width {
        1 => 1,
        2 | 3 => 2,
        _ => 3,
    }
}
