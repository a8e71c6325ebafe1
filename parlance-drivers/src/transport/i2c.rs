//! I2C link
//!
//! The module's I2C receive buffer is small: the frame header goes out as
//! one transaction and the payload follows in transactions of at most
//! `chunk_len` bytes. Every transaction must be acknowledged.

use parlance_core::config::DeviceConfig;
use parlance_core::Transport;
use parlance_hal::I2cBus;
use parlance_protocol::HEADER_LEN;

/// Synthesis module on an I2C bus
pub struct I2cTransport<B> {
    bus: B,
    address: u8,
    chunk_len: usize,
}

impl<B: I2cBus> I2cTransport<B> {
    /// Create a transport for the module at `address`
    ///
    /// A `chunk_len` of zero is treated as one.
    pub fn new(bus: B, address: u8, chunk_len: usize) -> Self {
        Self {
            bus,
            address,
            chunk_len: chunk_len.max(1),
        }
    }

    /// Create a transport from the device section of the configuration
    pub fn from_config(bus: B, config: &DeviceConfig) -> Self {
        Self::new(bus, config.i2c_address, config.i2c_chunk_len)
    }

    /// 7-bit address of the module
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    fn write(&mut self, data: &[u8]) -> Result<(), B::Error> {
        self.bus.write(self.address, data).inspect_err(|_| {
            #[cfg(feature = "defmt")]
            defmt::warn!("i2c write of {} bytes to {:#x} not acknowledged", data.len(), self.address);
        })
    }
}

impl<B: I2cBus> Transport for I2cTransport<B> {
    type Error = B::Error;

    fn send_frame(&mut self, header: &[u8; HEADER_LEN], payload: &[u8]) -> Result<(), B::Error> {
        self.write(header)?;
        for chunk in payload.chunks(self.chunk_len) {
            self.write(chunk)?;
        }
        Ok(())
    }

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), B::Error> {
        self.write(bytes)
    }

    /// A failed read counts as "no answer yet"; the handshake polls again
    fn read_ack(&mut self) -> Result<Option<u8>, B::Error> {
        let mut buf = [0u8; 1];
        match self.bus.read(self.address, &mut buf) {
            Ok(()) => Ok(Some(buf[0])),
            Err(_) => Ok(None),
        }
    }
}
