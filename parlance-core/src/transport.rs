//! Link to the synthesis module
//!
//! The driver only needs a few things from a bus: send a speak frame (whole,
//! or header first with the payload streamed after it), send a short
//! command, and read one status byte. I2C and UART implementations
//! live in `parlance-drivers`.

use parlance_protocol::HEADER_LEN;

/// Byte link to a synthesis module
pub trait Transport {
    /// Error type for bus operations
    type Error;

    /// Send a speak frame header followed by its payload
    ///
    /// Implementations may split the payload into several bus transactions.
    fn send_frame(&mut self, header: &[u8; HEADER_LEN], payload: &[u8])
        -> Result<(), Self::Error>;

    /// Send a speak frame header whose payload follows in separate writes
    ///
    /// This starts a new exchange just like [`send_frame`](Self::send_frame),
    /// so a link that buffers status bytes must discard stale ones here.
    /// The default sends the header as a plain command.
    fn begin_frame(&mut self, header: &[u8; HEADER_LEN]) -> Result<(), Self::Error> {
        self.send_command(header)
    }

    /// Send a short message as a single write
    ///
    /// Used for control frames, status queries, streamed payload pieces and
    /// the wake byte.
    fn send_command(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Read one status byte
    ///
    /// Returns `Ok(None)` when the module has nothing to say yet.
    fn read_ack(&mut self) -> Result<Option<u8>, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send_frame(
        &mut self,
        header: &[u8; HEADER_LEN],
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        (**self).send_frame(header, payload)
    }

    fn begin_frame(&mut self, header: &[u8; HEADER_LEN]) -> Result<(), Self::Error> {
        (**self).begin_frame(header)
    }

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).send_command(bytes)
    }

    fn read_ack(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_ack()
    }
}
