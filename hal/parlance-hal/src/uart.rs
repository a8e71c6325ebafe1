//! UART serial communication abstractions
//!
//! Provides blocking serial traits for the synthesis chip's UART link.
//! Acknowledgement reads are non-blocking: the driver asks whether a byte
//! is pending before reading it, so a silent device never stalls a read.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read data from the UART
    ///
    /// Returns the number of bytes placed in `buf`.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Check whether at least one received byte is waiting
    fn bytes_available(&mut self) -> Result<bool, Self::Error>;

    /// Read a single byte from the UART
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_blocking(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a byte only if one is already waiting
    fn try_read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if self.bytes_available()? {
            self.read_byte().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// Adapter exposing an `embedded-io` serial port as a [`Uart`]
pub struct EhSerial<T>(pub T);

impl<T> EhSerial<T> {
    /// Give back the wrapped port
    pub fn release(self) -> T {
        self.0
    }
}

impl<T> UartTx for EhSerial<T>
where
    T: embedded_io::Write,
{
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}

impl<T> UartRx for EhSerial<T>
where
    T: embedded_io::Read + embedded_io::ReadReady,
{
    type Error = T::Error;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.0.read(buf)
    }

    fn bytes_available(&mut self) -> Result<bool, Self::Error> {
        self.0.read_ready()
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200, // Factory default of the synthesis module
        }
    }
}
