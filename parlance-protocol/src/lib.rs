//! Speech Synthesis Module Protocol
//!
//! This crate defines the byte protocol spoken by serial text-to-speech
//! modules (the XFS5152 family and compatibles). The host sends frames; the
//! module answers with single status bytes.
//!
//! # Protocol Overview
//!
//! Every host message starts with a fixed header:
//! ```text
//! ┌────────┬─────────────┬─────────┬──────────┬──────────────┐
//! │ MARKER │ LENGTH      │ COMMAND │ ENCODING │ PAYLOAD      │
//! │ 0xFD   │ 2B big-end. │ 1B      │ 1B       │ LENGTH - 2 B │
//! └────────┴─────────────┴─────────┴──────────┴──────────────┘
//! ```
//!
//! Control commands carry no payload and no encoding byte; their length
//! field is always 1. The module replies with `0x41` once it has accepted a
//! frame and, when polled with the status query, `0x4F` once playback is
//! finished.
//!
//! Voice parameters are not separate commands: they are short bracketed
//! control strings (`[v5]`, `[m51]`, ...) spoken as ASCII text.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod frame;
pub mod settings;

pub use command::{Ack, Command, Encoding, ACK_ACCEPTED, ACK_COMPLETE, WAKE_BYTE};
pub use frame::{
    control_frame, FrameError, SpeakHeader, CONTROL_FRAME_LEN, FRAME_MARKER, HEADER_LEN,
    MAX_PAYLOAD_LEN, STATUS_QUERY,
};
pub use settings::{
    DigitReading, EnglishReading, Level, NameReading, NumberLanguage, OneReading, Setting,
    SpeechStyle, Voice, ZeroReading, CONTROL_STRING_LEN,
};
