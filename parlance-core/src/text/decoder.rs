//! UTF-8 lead-byte decoder
//!
//! Classification uses only range tests on the lead byte:
//!
//! | Lead byte   | Width | Native bytes |
//! |-------------|-------|--------------|
//! | `>= 0xFC`   | 6     | unsupported  |
//! | `0xF8-0xFB` | 5     | 3            |
//! | `0xF0-0xF7` | 4     | 3            |
//! | `0xE0-0xEF` | 3     | 2            |
//! | `0xC0-0xDF` | 2     | 2            |
//! | `< 0xC0`    | 1     | 1            |
//!
//! Continuation bytes are not checked for their `10xxxxxx` tag; only their
//! low six bits are used. Malformed input therefore decodes to wrong scalars
//! rather than failing, except for the two cases that would otherwise read
//! past the text or produce no payload at all.

use super::{native_width, CodePoint, Text};

/// Errors that stop decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Six-byte lead (`>= 0xFC`): no native encoding exists
    Unsupported {
        /// Offset of the lead byte
        offset: usize,
    },
    /// Multi-byte sequence cut off by the end of the text
    Truncated {
        /// Offset of the lead byte
        offset: usize,
    },
}

impl DecodeError {
    /// Offset of the offending lead byte
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::Unsupported { offset } | DecodeError::Truncated { offset } => offset,
        }
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Unsupported { offset } => {
                write!(f, "unsupported 6-byte sequence at offset {}", offset)
            }
            DecodeError::Truncated { offset } => {
                write!(f, "truncated sequence at offset {}", offset)
            }
        }
    }
}

/// Sequence width and lead-byte payload mask for a lead byte
const fn lead_info(lead: u8) -> (usize, u8) {
    if lead >= 0xFC {
        (6, 0x01)
    } else if lead >= 0xF8 {
        (5, 0x03)
    } else if lead >= 0xF0 {
        (4, 0x07)
    } else if lead >= 0xE0 {
        (3, 0x0F)
    } else if lead >= 0xC0 {
        (2, 0x1F)
    } else {
        // ASCII, and stray continuation bytes read as ASCII
        (1, 0x7F)
    }
}

/// Number of source bytes in the sequence starting with `lead`
pub const fn sequence_width(lead: u8) -> usize {
    lead_info(lead).0
}

/// Width of the sequence at `offset` after bounds and support checks
fn checked_width(text: &Text<'_>, offset: usize, lead: u8) -> Result<usize, DecodeError> {
    let width = sequence_width(lead);
    if width == 6 {
        return Err(DecodeError::Unsupported { offset });
    }
    if offset + width > text.len() {
        return Err(DecodeError::Truncated { offset });
    }
    Ok(width)
}

/// Decode the code point starting at `offset`
///
/// `offset` must be below `text.len()`.
pub fn decode_at(text: &Text<'_>, offset: usize) -> Result<CodePoint, DecodeError> {
    let lead = text.byte(offset).ok_or(DecodeError::Truncated { offset })?;
    let width = checked_width(text, offset, lead)?;

    let mut scalar = (lead & lead_info(lead).1) as u32;
    for i in 1..width {
        let next = text
            .byte(offset + i)
            .ok_or(DecodeError::Truncated { offset })?;
        scalar = (scalar << 6) | (next & 0x3F) as u32;
    }

    Ok(CodePoint {
        scalar,
        width: width as u8,
    })
}

/// Length of the native encoding of the whole text
///
/// This pass only looks at lead bytes, so it is cheap enough to run before
/// anything is sent. It fails on exactly the inputs [`decode_at`] fails on.
pub fn native_len(text: &Text<'_>) -> Result<usize, DecodeError> {
    let mut offset = 0;
    let mut total = 0;
    while let Some(lead) = text.byte(offset) {
        let width = checked_width(text, offset, lead)?;
        total += native_width(width);
        offset += width;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{Script, TextSource};
    use proptest::prelude::*;

    fn text(bytes: &[u8]) -> Text<'_> {
        Text::new(TextSource::counted(bytes))
    }

    #[test]
    fn test_ascii() {
        let t = text(b"A");
        let cp = decode_at(&t, 0).unwrap();
        assert_eq!(cp.scalar, 0x41);
        assert_eq!(cp.width, 1);
        assert_eq!(cp.script(), Script::Ascii);
    }

    #[test]
    fn test_two_byte() {
        // U+00E9 LATIN SMALL LETTER E WITH ACUTE
        let t = text(&[0xC3, 0xA9]);
        let cp = decode_at(&t, 0).unwrap();
        assert_eq!(cp.scalar, 0xE9);
        assert_eq!(cp.width, 2);
        assert_eq!(cp.native_len(), 2);
    }

    #[test]
    fn test_three_byte_cjk() {
        // U+4E2D
        let t = text(&[0xE4, 0xB8, 0xAD]);
        let cp = decode_at(&t, 0).unwrap();
        assert_eq!(cp.scalar, 0x4E2D);
        assert_eq!(cp.width, 3);
    }

    #[test]
    fn test_four_byte() {
        // U+1F600
        let t = text(&[0xF0, 0x9F, 0x98, 0x80]);
        let cp = decode_at(&t, 0).unwrap();
        assert_eq!(cp.scalar, 0x1F600);
        assert_eq!(cp.native_len(), 3);
    }

    #[test]
    fn test_high_bit_ascii_is_masked() {
        let t = text(&[0x80]);
        let cp = decode_at(&t, 0).unwrap();
        assert_eq!(cp.scalar, 0x00);
        assert_eq!(cp.width, 1);
    }

    #[test]
    fn test_six_byte_lead_is_unsupported() {
        let t = text(&[0x41, 0xFC, 0x80, 0x80, 0x80, 0x80, 0x80]);
        assert_eq!(
            decode_at(&t, 1),
            Err(DecodeError::Unsupported { offset: 1 })
        );
        assert_eq!(native_len(&t), Err(DecodeError::Unsupported { offset: 1 }));
    }

    #[test]
    fn test_truncated_sequence() {
        let t = text(&[0x41, 0xE4, 0xB8]);
        assert_eq!(decode_at(&t, 1), Err(DecodeError::Truncated { offset: 1 }));
        assert_eq!(native_len(&t), Err(DecodeError::Truncated { offset: 1 }));
    }

    #[test]
    fn test_native_len_mixed() {
        // "a中b" = 1 + 2 + 1
        let t = text("a中b".as_bytes());
        assert_eq!(native_len(&t), Ok(4));
    }

    #[test]
    fn test_native_len_empty() {
        assert_eq!(native_len(&text(b"")), Ok(0));
    }

    proptest! {
        #[test]
        fn decodes_valid_bmp_scalars(c in prop::char::range('\u{80}', '\u{FFFF}')) {
            let mut buf = [0u8; 4];
            let encoded = c.encode_utf8(&mut buf);
            let t = text(encoded.as_bytes());
            let cp = decode_at(&t, 0).unwrap();
            prop_assert_eq!(cp.scalar, c as u32);
            prop_assert_eq!(cp.width as usize, encoded.len());

            let mut out = [0u8; crate::text::MAX_NATIVE_LEN];
            let native = cp.encode_native(&mut out);
            prop_assert_eq!(native, &[(c as u32 & 0xFF) as u8, (c as u32 >> 8) as u8][..]);
        }

        #[test]
        fn never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let t = text(&bytes);
            let _ = native_len(&t);
            let mut offset = 0;
            while offset < t.len() {
                match decode_at(&t, offset) {
                    Ok(cp) => offset += cp.width as usize,
                    Err(_) => break,
                }
            }
        }
    }
}
