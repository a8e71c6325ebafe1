//! Minimal TOML reader for driver configuration
//!
//! Handles only the subset the configuration needs:
//! - `[section]` headers: `device`, `handshake`, `init`, `voice`
//! - `key = value` with integers (decimal or `0x` hex), quoted strings and
//!   booleans
//! - `#` comments, whole-line or trailing
//!
//! Keys that are absent keep the value they had before parsing.

use parlance_protocol::{Level, Voice};

use super::types::SynthConfig;

/// Parse failure with the 1-based line it happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    /// Line of the offending text, counting from 1
    pub line: usize,
    /// What was wrong with it
    pub kind: ParseErrorKind,
}

/// Reason a configuration line was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Malformed `[...]` header
    InvalidSection,
    /// Section name not recognised
    UnknownSection,
    /// Key not recognised in its section (or outside any section)
    UnknownKey,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let what = match self.kind {
            ParseErrorKind::InvalidSection => "malformed section header",
            ParseErrorKind::UnknownSection => "unknown section",
            ParseErrorKind::UnknownKey => "unknown key",
            ParseErrorKind::InvalidLine => "expected `key = value`",
            ParseErrorKind::InvalidValue => "invalid value",
        };
        write!(f, "line {}: {}", self.line, what)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Device,
    Handshake,
    Init,
    Voice,
}

/// Parse a configuration document on top of [`SynthConfig::default`]
pub fn parse_config(input: &str) -> Result<SynthConfig, ParseError> {
    let mut config = SynthConfig::default();
    parse_into(input, &mut config)?;
    Ok(config)
}

/// Apply a configuration document to an existing configuration
///
/// Use this to start from a transport preset such as [`SynthConfig::uart`].
pub fn parse_into(input: &str, config: &mut SynthConfig) -> Result<(), ParseError> {
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let fail = |kind| ParseError {
            line: line_no,
            kind,
        };

        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(fail(ParseErrorKind::InvalidSection))?;
            section = parse_section(name.trim()).map_err(fail)?;
            continue;
        }

        let (key, value) = split_key_value(line).ok_or(fail(ParseErrorKind::InvalidLine))?;
        apply_value(section, key, value, config).map_err(fail)?;
    }

    Ok(())
}

fn parse_section(name: &str) -> Result<Section, ParseErrorKind> {
    match name {
        "device" => Ok(Section::Device),
        "handshake" => Ok(Section::Handshake),
        "init" => Ok(Section::Init),
        "voice" => Ok(Section::Voice),
        "" => Err(ParseErrorKind::InvalidSection),
        _ => Err(ParseErrorKind::UnknownSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut SynthConfig,
) -> Result<(), ParseErrorKind> {
    match (section, key) {
        (Section::Device, "i2c_address") => {
            let address = parse_int(value)?;
            if address > 0x7F {
                return Err(ParseErrorKind::InvalidValue);
            }
            config.device.i2c_address = address as u8;
        }
        (Section::Device, "i2c_chunk_len") => {
            let len = parse_int(value)?;
            if len == 0 {
                return Err(ParseErrorKind::InvalidValue);
            }
            config.device.i2c_chunk_len = len as usize;
        }
        (Section::Device, "uart_ack_delay_ms") => config.device.uart_ack_delay_ms = parse_int(value)?,

        (Section::Handshake, "settle_ms") => config.handshake.settle_ms = parse_int(value)?,
        (Section::Handshake, "accept_poll_ms") => {
            config.handshake.accept_poll_ms = parse_int(value)?
        }
        (Section::Handshake, "complete_poll_ms") => {
            config.handshake.complete_poll_ms = parse_int(value)?
        }
        (Section::Handshake, "accept_timeout_ms") => {
            config.handshake.accept_timeout_ms = parse_deadline(value)?
        }
        (Section::Handshake, "complete_timeout_ms") => {
            config.handshake.complete_timeout_ms = parse_deadline(value)?
        }

        (Section::Init, "wake_attempts") => {
            let attempts = parse_int(value)?;
            config.init.wake_attempts =
                u8::try_from(attempts).map_err(|_| ParseErrorKind::InvalidValue)?;
        }
        (Section::Init, "wake_delay_ms") => config.init.wake_delay_ms = parse_int(value)?,

        (Section::Voice, "volume") => config.voice.volume = parse_level(value)?,
        (Section::Voice, "speed") => config.voice.speed = Some(parse_level(value)?),
        (Section::Voice, "tone") => config.voice.tone = Some(parse_level(value)?),
        (Section::Voice, "voice") => config.voice.voice = Some(parse_voice(value)?),

        _ => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing `#` comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a non-negative integer, decimal or `0x` hex, `_` separators allowed
fn parse_int(value: &str) -> Result<u32, ParseErrorKind> {
    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    let mut result: u32 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix).ok_or(ParseErrorKind::InvalidValue)?;
        result = result
            .checked_mul(radix)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ParseErrorKind::InvalidValue)?;
        seen_digit = true;
    }

    if seen_digit {
        Ok(result)
    } else {
        Err(ParseErrorKind::InvalidValue)
    }
}

fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

/// A deadline in ms, or `false` for none
fn parse_deadline(value: &str) -> Result<Option<u32>, ParseErrorKind> {
    match parse_bool(value) {
        Ok(false) => Ok(None),
        Ok(true) => Err(ParseErrorKind::InvalidValue),
        Err(_) => parse_int(value).map(Some),
    }
}

/// A 0-9 level; larger numbers are clamped like the setters do
fn parse_level(value: &str) -> Result<Level, ParseErrorKind> {
    let level = parse_int(value)?;
    Ok(Level::new(level.min(u8::MAX as u32) as u8))
}

fn parse_string(value: &str) -> Result<&str, ParseErrorKind> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseErrorKind::InvalidValue)
}

fn parse_voice(value: &str) -> Result<Voice, ParseErrorKind> {
    match parse_string(value)? {
        "female1" => Ok(Voice::Female1),
        "female2" => Ok(Voice::Female2),
        "female3" => Ok(Voice::Female3),
        "male1" => Ok(Voice::Male1),
        "male2" => Ok(Voice::Male2),
        "donald_duck" => Ok(Voice::DonaldDuck),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}
