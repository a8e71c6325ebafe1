//! Transport implementations

pub mod i2c;
pub mod uart;

pub use i2c::I2cTransport;
pub use uart::UartTransport;
