//! Board-agnostic driver logic for serial speech synthesis modules
//!
//! This crate contains everything between caller text and the bus:
//!
//! - UTF-8 decoding and single-script segmentation
//! - Framing segments into speak frames
//! - The two-phase playback handshake
//! - The [`Synthesizer`] driver with voice settings and control commands
//! - Configuration types and a small TOML reader
//!
//! Buses are reached through the [`Transport`] trait; concrete I2C and UART
//! transports live in `parlance-drivers`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod framer;
pub mod handshake;
pub mod synth;
pub mod text;
pub mod transport;

#[cfg(test)]
mod testing;

pub use config::SynthConfig;
pub use error::Error;
pub use handshake::Phase;
pub use synth::{Synthesizer, DEFAULT_SCRATCH_LEN};
pub use text::{DecodeError, TextSource};
pub use transport::Transport;
