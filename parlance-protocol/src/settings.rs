//! Voice settings expressed as in-band control strings
//!
//! The module has no dedicated commands for voice parameters. Instead it
//! recognises bracketed tags inside ASCII text, for example `[v5]` for
//! volume 5 or `[m51]` for the first male voice. The driver speaks these
//! strings as a raw ASCII frame and waits for the usual handshake.

use core::fmt::Write;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity of a rendered control string (longest tag is `[m55]`)
pub const CONTROL_STRING_LEN: usize = 8;

/// A 0-9 parameter level
///
/// Values above 9 are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Level(u8);

impl Level {
    /// Highest level the module accepts
    pub const MAX: u8 = 9;

    /// Create a level, clamping to [`Level::MAX`]
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Get the level value
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

/// Speaker voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Voice {
    #[default]
    Female1,
    Male1,
    Male2,
    Female2,
    DonaldDuck,
    Female3,
}

/// How English words are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnglishReading {
    /// Spell letter by letter
    Alphabet,
    /// Read as words
    Word,
}

/// How long digit sequences are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitReading {
    /// Digit by digit, like a telephone number
    Telephone,
    /// As a numeric value
    Numeric,
    /// Let the module decide
    Auto,
}

/// Pacing of synthesised speech
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeechStyle {
    /// Word by word
    Staccato,
    /// Fluent
    Smooth,
}

/// Language used for digits, units and symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NumberLanguage {
    Chinese,
    English,
    Auto,
}

/// Reading of "0" in digit sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZeroReading {
    /// "ling"
    Zero,
    /// "ou", as the letter O
    Ou,
}

/// Reading of "1" in digit sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OneReading {
    /// "yao"
    Yao,
    /// "yi"
    Yi,
}

/// Whether the first character of a name is read as a surname
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NameReading {
    /// Always apply surname pronunciation
    Surname,
    /// Let the module decide
    Auto,
}

/// One voice parameter change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    Volume(Level),
    Speed(Level),
    Tone(Level),
    Voice(Voice),
    English(EnglishReading),
    Digits(DigitReading),
    Style(SpeechStyle),
    Pinyin(bool),
    NumberLanguage(NumberLanguage),
    Zero(ZeroReading),
    One(OneReading),
    Name(NameReading),
    /// Chinese prosody marking (only affects Chinese text)
    Rhythm(bool),
    /// Restore every parameter to its factory default
    Reset,
}

impl Setting {
    /// Render the control string for this setting
    pub fn control_string(&self) -> String<CONTROL_STRING_LEN> {
        let mut out = String::new();
        // Every tag is at most five bytes, well inside the capacity
        let _ = match *self {
            Setting::Volume(level) => write!(out, "[v{}]", level.get()),
            Setting::Speed(level) => write!(out, "[s{}]", level.get()),
            Setting::Tone(level) => write!(out, "[t{}]", level.get()),
            Setting::Voice(voice) => out.write_str(match voice {
                Voice::Female1 => "[m3]",
                Voice::Male1 => "[m51]",
                Voice::Male2 => "[m52]",
                Voice::Female2 => "[m53]",
                Voice::DonaldDuck => "[m54]",
                Voice::Female3 => "[m55]",
            }),
            Setting::English(reading) => out.write_str(match reading {
                EnglishReading::Alphabet => "[h1]",
                EnglishReading::Word => "[h2]",
            }),
            Setting::Digits(reading) => out.write_str(match reading {
                DigitReading::Auto => "[n0]",
                DigitReading::Telephone => "[n1]",
                DigitReading::Numeric => "[n2]",
            }),
            Setting::Style(style) => out.write_str(match style {
                SpeechStyle::Staccato => "[f0]",
                SpeechStyle::Smooth => "[f1]",
            }),
            Setting::Pinyin(enabled) => write!(out, "[i{}]", u8::from(enabled)),
            Setting::NumberLanguage(language) => out.write_str(match language {
                NumberLanguage::Auto => "[g0]",
                NumberLanguage::Chinese => "[g1]",
                NumberLanguage::English => "[g2]",
            }),
            Setting::Zero(reading) => out.write_str(match reading {
                ZeroReading::Zero => "[o0]",
                ZeroReading::Ou => "[o1]",
            }),
            Setting::One(reading) => out.write_str(match reading {
                OneReading::Yao => "[y0]",
                OneReading::Yi => "[y1]",
            }),
            Setting::Name(reading) => out.write_str(match reading {
                NameReading::Auto => "[r0]",
                NameReading::Surname => "[r1]",
            }),
            Setting::Rhythm(enabled) => write!(out, "[z{}]", u8::from(enabled)),
            Setting::Reset => out.write_str("[d]"),
        };
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_clamps() {
        assert_eq!(Level::new(15).get(), 9);
        assert_eq!(Level::new(9).get(), 9);
        assert_eq!(Level::new(0).get(), 0);
        assert_eq!(Level::from(200).get(), 9);
    }

    #[test]
    fn test_volume_clamped_control_string() {
        assert_eq!(Setting::Volume(Level::new(15)).control_string().as_str(), "[v9]");
        assert_eq!(Setting::Volume(Level::new(3)).control_string().as_str(), "[v3]");
    }

    #[test]
    fn test_speed_and_tone() {
        assert_eq!(Setting::Speed(Level::new(5)).control_string().as_str(), "[s5]");
        assert_eq!(Setting::Tone(Level::new(0)).control_string().as_str(), "[t0]");
    }

    #[test]
    fn test_voices() {
        assert_eq!(Setting::Voice(Voice::Female1).control_string().as_str(), "[m3]");
        assert_eq!(Setting::Voice(Voice::Male1).control_string().as_str(), "[m51]");
        assert_eq!(Setting::Voice(Voice::Male2).control_string().as_str(), "[m52]");
        assert_eq!(Setting::Voice(Voice::Female2).control_string().as_str(), "[m53]");
        assert_eq!(Setting::Voice(Voice::DonaldDuck).control_string().as_str(), "[m54]");
        assert_eq!(Setting::Voice(Voice::Female3).control_string().as_str(), "[m55]");
    }

    #[test]
    fn test_boolean_switches() {
        assert_eq!(Setting::Pinyin(true).control_string().as_str(), "[i1]");
        assert_eq!(Setting::Pinyin(false).control_string().as_str(), "[i0]");
        assert_eq!(Setting::Rhythm(true).control_string().as_str(), "[z1]");
        assert_eq!(Setting::Rhythm(false).control_string().as_str(), "[z0]");
    }

    #[test]
    fn test_pronunciation_modes() {
        assert_eq!(Setting::English(EnglishReading::Word).control_string().as_str(), "[h2]");
        assert_eq!(Setting::Digits(DigitReading::Telephone).control_string().as_str(), "[n1]");
        assert_eq!(Setting::Digits(DigitReading::Auto).control_string().as_str(), "[n0]");
        assert_eq!(Setting::Style(SpeechStyle::Smooth).control_string().as_str(), "[f1]");
        assert_eq!(
            Setting::NumberLanguage(NumberLanguage::English).control_string().as_str(),
            "[g2]"
        );
        assert_eq!(Setting::Zero(ZeroReading::Ou).control_string().as_str(), "[o1]");
        assert_eq!(Setting::One(OneReading::Yao).control_string().as_str(), "[y0]");
        assert_eq!(Setting::Name(NameReading::Surname).control_string().as_str(), "[r1]");
        assert_eq!(Setting::Reset.control_string().as_str(), "[d]");
    }
}
