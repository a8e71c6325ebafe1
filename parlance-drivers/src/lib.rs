//! Bus transports for serial speech synthesis modules
//!
//! This crate provides concrete implementations of the
//! [`Transport`](parlance_core::Transport) trait defined in parlance-core:
//!
//! - I2C, with payloads split into short transactions
//! - UART, with stale input drained before every frame

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod transport;

pub use transport::{I2cTransport, UartTransport};
