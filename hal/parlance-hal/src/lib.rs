//! Parlance Hardware Abstraction Layer
//!
//! This crate defines the bus and storage traits the speech synthesis driver
//! talks through. Chip-specific HALs implement them directly, or wrap an
//! `embedded-hal` / `embedded-io` peripheral in one of the adapters.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  parlance-core (Synthesizer, framing)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  parlance-drivers (I2C / UART links)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  parlance-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  embedded-io  │
//! │     I2c       │       │  Read/Write   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C master writes and reads
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`store::TextStore`] - Byte-addressable read-only text storage

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod store;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use i2c::{EhI2c, I2cBus, I2cConfig};
pub use store::TextStore;
pub use uart::{EhSerial, Uart, UartConfig, UartRx, UartTx};
