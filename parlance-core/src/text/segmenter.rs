//! Splitting text into single-script segments
//!
//! A segment is the longest run of code points that share a [`Script`],
//! cut short at natural pauses:
//!
//! - an ASCII run ends before a space (`0x20`) or comma (`0x2C`); the
//!   delimiter opens the next segment
//! - a multi-byte run ends before a full-width punctuation lead (`0xEF`,
//!   the block holding `，` and `。`)
//! - any script change ends the run before the first code point of the
//!   new script
//!
//! The cursor is the whole segmentation state; a fresh one is created for
//! every speak call.

use super::decoder::{decode_at, DecodeError};
use super::{Script, Text};

/// Word and clause delimiters that end an ASCII segment
const ASCII_DELIMITERS: [u8; 2] = [b' ', b','];

/// Lead byte of the full-width punctuation block
const FULLWIDTH_LEAD: u8 = 0xEF;

/// A run of code points sharing one script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    /// Script of every code point in the run
    pub script: Script,
    /// Offset of the first source byte
    pub start: usize,
    /// Number of source bytes
    pub source_len: usize,
    /// Number of native payload bytes
    pub native_len: usize,
    /// Number of code points
    pub code_points: usize,
}

impl Segment {
    /// Offset one past the last source byte
    pub fn end(&self) -> usize {
        self.start + self.source_len
    }
}

/// Per-call segmentation cursor
///
/// Yields segments in order. After an error the cursor is exhausted.
pub struct Segmenter<'t, 'a> {
    text: &'t Text<'a>,
    offset: usize,
    failed: bool,
}

impl<'t, 'a> Segmenter<'t, 'a> {
    /// Start segmenting at the beginning of `text`
    pub fn new(text: &'t Text<'a>) -> Self {
        Self {
            text,
            offset: 0,
            failed: false,
        }
    }

    /// Check whether the byte at `next` ends a segment of `script`
    fn is_pause(&self, script: Script, next: usize) -> bool {
        match (script, self.text.byte(next)) {
            (Script::Ascii, Some(byte)) => ASCII_DELIMITERS.contains(&byte),
            (Script::MultiByte, Some(byte)) => byte == FULLWIDTH_LEAD,
            (_, None) => false,
        }
    }

    fn next_segment(&mut self) -> Result<Option<Segment>, DecodeError> {
        if self.offset >= self.text.len() {
            return Ok(None);
        }

        let first = decode_at(self.text, self.offset)?;
        let script = first.script();
        let mut segment = Segment {
            script,
            start: self.offset,
            source_len: first.width as usize,
            native_len: first.native_len(),
            code_points: 1,
        };

        loop {
            let next = segment.end();
            if next >= self.text.len() || self.is_pause(script, next) {
                break;
            }

            let cp = decode_at(self.text, next)?;
            if cp.script() != script {
                // Language change: flush before the new script starts
                break;
            }

            segment.source_len += cp.width as usize;
            segment.native_len += cp.native_len();
            segment.code_points += 1;
        }

        self.offset = segment.end();
        Ok(Some(segment))
    }
}

impl Iterator for Segmenter<'_, '_> {
    type Item = Result<Segment, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_segment() {
            Ok(segment) => segment.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::decoder::native_len;
    use crate::text::TextSource;
    use proptest::prelude::*;

    fn segments(bytes: &[u8]) -> Vec<Segment> {
        let text = Text::new(TextSource::counted(bytes));
        Segmenter::new(&text).map(|s| s.unwrap()).collect()
    }

    #[test]
    fn test_comma_flushes_english() {
        let segs = segments(b"AB,");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].script, Script::Ascii);
        assert_eq!(segs[0].code_points, 2);
        assert_eq!(segs[0].native_len, 2);
        assert_eq!(segs[1].start, 2);
        assert_eq!(segs[1].code_points, 1);
    }

    #[test]
    fn test_space_opens_next_segment() {
        let segs = segments(b"hello world");
        assert_eq!(segs.len(), 2);
        assert_eq!((segs[0].start, segs[0].source_len), (0, 5));
        assert_eq!((segs[1].start, segs[1].source_len), (5, 6));
    }

    #[test]
    fn test_single_cjk_segment() {
        let segs = segments(&[0xE4, 0xB8, 0xAD]);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].script, Script::MultiByte);
        assert_eq!(segs[0].native_len, 2);
        assert_eq!(segs[0].code_points, 1);
    }

    #[test]
    fn test_language_change_flushes() {
        let segs = segments("ab中文cd".as_bytes());
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].script, Script::Ascii);
        assert_eq!(segs[1].script, Script::MultiByte);
        assert_eq!(segs[1].code_points, 2);
        assert_eq!(segs[1].native_len, 4);
        assert_eq!(segs[2].script, Script::Ascii);
        assert_eq!(segs[2].start, 8);
    }

    #[test]
    fn test_cjk_run_ignores_ascii_delimiters() {
        // Spaces are ASCII, so they split by script change only
        let segs = segments("中 文".as_bytes());
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1].script, Script::Ascii);
    }

    #[test]
    fn test_fullwidth_punctuation_flushes_cjk() {
        // "中文，好" - the full-width comma starts a new segment
        let segs = segments("中文，好".as_bytes());
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].code_points, 2);
        assert_eq!(segs[1].code_points, 2);
    }

    #[test]
    fn test_empty_text() {
        assert!(segments(b"").is_empty());
    }

    #[test]
    fn test_error_exhausts_cursor() {
        let bytes = [b'a', b' ', 0xE4];
        let text = Text::new(TextSource::counted(&bytes));
        let mut cursor = Segmenter::new(&text);
        assert!(cursor.next().unwrap().is_ok());
        assert_eq!(
            cursor.next(),
            Some(Err(DecodeError::Truncated { offset: 2 }))
        );
        assert_eq!(cursor.next(), None);
    }

    proptest! {
        #[test]
        fn ascii_segments_follow_delimiters(bytes in prop::collection::vec(0x01u8..0x7F, 1..64)) {
            let segs = segments(&bytes);

            // Segments tile the input
            let mut offset = 0;
            for seg in &segs {
                prop_assert_eq!(seg.start, offset);
                prop_assert_eq!(seg.script, Script::Ascii);
                prop_assert_eq!(seg.native_len, seg.source_len);
                offset = seg.end();
            }
            prop_assert_eq!(offset, bytes.len());

            // A segment starts exactly at offset 0 and at every delimiter
            let starts: Vec<usize> = segs.iter().map(|s| s.start).collect();
            let expected: Vec<usize> = (0..bytes.len())
                .filter(|&i| i == 0 || bytes[i] == b' ' || bytes[i] == b',')
                .collect();
            prop_assert_eq!(starts, expected);
        }

        #[test]
        fn segment_lengths_sum_to_native_len(s in "[a-z ,\u{4E00}-\u{4FFF}\u{00C0}-\u{00FF}]{0,40}") {
            let bytes = s.as_bytes();
            let text = Text::new(TextSource::counted(bytes));
            let total: usize = segments(bytes).iter().map(|seg| seg.native_len).sum();
            prop_assert_eq!(native_len(&text), Ok(total));
        }

        #[test]
        fn script_change_always_splits(s in "[a-z\u{4E00}-\u{4FFF}]{0,40}") {
            let bytes = s.as_bytes();
            for seg in segments(bytes) {
                let slice = &bytes[seg.start..seg.end()];
                let multibyte = slice.iter().filter(|&&b| b >= 0x80).count();
                match seg.script {
                    Script::Ascii => prop_assert_eq!(multibyte, 0),
                    Script::MultiByte => prop_assert_eq!(multibyte, slice.len()),
                }
            }
        }
    }
}
