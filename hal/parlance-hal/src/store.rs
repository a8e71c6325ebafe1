//! Read-only text storage
//!
//! Text that lives in program flash or another memory that is addressable
//! but not necessarily mapped as a plain slice. The driver reads it one byte
//! at a time and finds its end by scanning for a zero terminator.

/// Byte-addressable read-only storage
pub trait TextStore {
    /// Read the byte at `offset`
    ///
    /// Returns `None` past the end of the storage region. A region that ends
    /// without a zero terminator is treated as terminated at its end.
    fn byte_at(&self, offset: usize) -> Option<u8>;

    /// Number of bytes before the first zero terminator
    fn terminated_len(&self) -> usize {
        let mut len = 0;
        while let Some(byte) = self.byte_at(len) {
            if byte == 0 {
                break;
            }
            len += 1;
        }
        len
    }
}

impl TextStore for [u8] {
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }
}

impl<const N: usize> TextStore for [u8; N] {
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }
}
