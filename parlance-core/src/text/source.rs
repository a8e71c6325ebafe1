//! Where speak text comes from
//!
//! Text is either a counted in-memory slice or a read-only storage region
//! whose end is found by scanning for a zero terminator. Both collapse into
//! a [`Text`] with a fixed length before any decoding starts.

use parlance_hal::TextStore;

/// Caller-supplied text
#[derive(Clone, Copy)]
pub enum TextSource<'a> {
    /// In-memory bytes with a known length
    Counted(&'a [u8]),
    /// Read-only storage ending at the first zero byte
    Terminated(&'a dyn TextStore),
}

impl<'a> TextSource<'a> {
    /// Text of exactly these bytes
    pub fn counted(bytes: &'a [u8]) -> Self {
        TextSource::Counted(bytes)
    }

    /// In-memory text ending at the first zero byte (or the end of the slice)
    pub fn null_terminated(bytes: &'a [u8]) -> Self {
        TextSource::Counted(&bytes[..bytes.terminated_len()])
    }

    /// Text held in storage that is read a byte at a time
    pub fn stored(store: &'a dyn TextStore) -> Self {
        TextSource::Terminated(store)
    }
}

impl<'a> From<&'a str> for TextSource<'a> {
    fn from(text: &'a str) -> Self {
        TextSource::Counted(text.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for TextSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        TextSource::Counted(bytes)
    }
}

/// A text source with its length resolved
#[derive(Clone, Copy)]
pub struct Text<'a> {
    source: TextSource<'a>,
    len: usize,
}

impl<'a> Text<'a> {
    /// Resolve the length of `source`
    pub fn new(source: TextSource<'a>) -> Self {
        let len = match source {
            TextSource::Counted(bytes) => bytes.len(),
            TextSource::Terminated(store) => store.terminated_len(),
        };
        Self { source, len }
    }

    /// Length in source bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if there is nothing to speak
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte at `offset`, or `None` at or past the end
    pub fn byte(&self, offset: usize) -> Option<u8> {
        if offset >= self.len {
            return None;
        }
        match self.source {
            TextSource::Counted(bytes) => bytes.get(offset).copied(),
            TextSource::Terminated(store) => store.byte_at(offset),
        }
    }

    /// Check if the text lives in byte-addressed storage
    ///
    /// Stored text cannot be borrowed as a slice, so it is streamed to the
    /// module code point by code point instead of being buffered.
    pub fn is_stored(&self) -> bool {
        matches!(self.source, TextSource::Terminated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage that is only reachable through `byte_at`
    struct Flash([u8; 8]);

    impl TextStore for Flash {
        fn byte_at(&self, offset: usize) -> Option<u8> {
            self.0.get(offset).copied()
        }
    }

    #[test]
    fn test_counted_keeps_zero_bytes() {
        let text = Text::new(TextSource::counted(b"a\0b"));
        assert_eq!(text.len(), 3);
        assert_eq!(text.byte(1), Some(0));
    }

    #[test]
    fn test_null_terminated_slice() {
        let text = Text::new(TextSource::null_terminated(b"hi\0there"));
        assert_eq!(text.len(), 2);
        assert_eq!(text.byte(2), None);
        assert!(!text.is_stored());
    }

    #[test]
    fn test_stored_text_scans_for_terminator() {
        let flash = Flash(*b"ok\0junk!");
        let text = Text::new(TextSource::stored(&flash));
        assert_eq!(text.len(), 2);
        assert_eq!(text.byte(0), Some(b'o'));
        assert_eq!(text.byte(3), None);
        assert!(text.is_stored());
    }
}
