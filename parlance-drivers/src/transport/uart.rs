//! UART link
//!
//! The module streams its status bytes unprompted, so anything left in the
//! receive buffer before a new frame belongs to an earlier exchange and is
//! discarded, whether the frame goes out whole or header first. A status
//! byte needs a few milliseconds to arrive after the request; reads wait
//! that long and then take a byte only if one is there.

use embedded_hal::delay::DelayNs;
use parlance_core::config::DeviceConfig;
use parlance_core::Transport;
use parlance_hal::{UartRx, UartTx};
use parlance_protocol::HEADER_LEN;

/// Upper bound on stale bytes discarded before a frame
const MAX_DRAIN: usize = 64;

/// Synthesis module on a serial port
pub struct UartTransport<S, D> {
    serial: S,
    delay: D,
    ack_delay_ms: u32,
}

impl<S, D> UartTransport<S, D>
where
    S: UartTx + UartRx<Error = <S as UartTx>::Error>,
    D: DelayNs,
{
    /// Create a transport that waits `ack_delay_ms` before each status read
    pub fn new(serial: S, delay: D, ack_delay_ms: u32) -> Self {
        Self {
            serial,
            delay,
            ack_delay_ms,
        }
    }

    /// Create a transport from the device section of the configuration
    pub fn from_config(serial: S, delay: D, config: &DeviceConfig) -> Self {
        Self::new(serial, delay, config.uart_ack_delay_ms)
    }

    /// Give back the serial port and delay
    pub fn release(self) -> (S, D) {
        (self.serial, self.delay)
    }

    /// Discard bytes received before this frame
    fn drain(&mut self) -> Result<(), <S as UartTx>::Error> {
        let mut dropped = 0usize;
        while dropped < MAX_DRAIN {
            match self.serial.try_read_byte()? {
                Some(_) => dropped += 1,
                None => break,
            }
        }

        #[cfg(feature = "defmt")]
        if dropped > 0 {
            defmt::trace!("dropped {} stale bytes", dropped);
        }
        Ok(())
    }
}

impl<S, D> Transport for UartTransport<S, D>
where
    S: UartTx + UartRx<Error = <S as UartTx>::Error>,
    D: DelayNs,
{
    type Error = <S as UartTx>::Error;

    fn send_frame(
        &mut self,
        header: &[u8; HEADER_LEN],
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        self.drain()?;
        self.serial.write_blocking(header)?;
        self.serial.write_blocking(payload)?;
        self.serial.flush()
    }

    fn begin_frame(&mut self, header: &[u8; HEADER_LEN]) -> Result<(), Self::Error> {
        self.drain()?;
        self.serial.write_blocking(header)?;
        self.serial.flush()
    }

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.serial.write_blocking(bytes)?;
        self.serial.flush()
    }

    fn read_ack(&mut self) -> Result<Option<u8>, Self::Error> {
        self.delay.delay_ms(self.ack_delay_ms);
        self.serial.try_read_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Overrun;

    #[derive(Default)]
    struct MockSerial {
        tx: Vec<u8>,
        rx: VecDeque<u8>,
        flushes: usize,
        broken: bool,
    }

    impl UartTx for MockSerial {
        type Error = Overrun;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Overrun> {
            if self.broken {
                return Err(Overrun);
            }
            self.tx.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Overrun> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl UartRx for MockSerial {
        type Error = Overrun;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Overrun> {
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }

        fn bytes_available(&mut self) -> Result<bool, Overrun> {
            Ok(!self.rx.is_empty())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ms: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
        }
    }

    fn link(serial: MockSerial) -> UartTransport<MockSerial, MockDelay> {
        UartTransport::from_config(serial, MockDelay::default(), &DeviceConfig::default())
    }

    #[test]
    fn test_frame_drains_stale_input() {
        let mut serial = MockSerial::default();
        serial.rx.extend([0x4F, 0x4F, 0x41]);
        let mut link = link(serial);

        link.send_frame(&[0xFD, 0x00, 0x04, 0x01, 0x00], b"hi").unwrap();

        let (serial, _) = link.release();
        assert!(serial.rx.is_empty());
        assert_eq!(serial.tx, [0xFD, 0x00, 0x04, 0x01, 0x00, b'h', b'i']);
        assert_eq!(serial.flushes, 1);
    }

    #[test]
    fn test_streamed_header_drains_stale_input() {
        let mut serial = MockSerial::default();
        serial.rx.extend([0x41, 0x4F]);
        let mut link = link(serial);

        link.begin_frame(&[0xFD, 0x00, 0x04, 0x01, 0x00]).unwrap();

        assert_eq!(link.read_ack(), Ok(None));
        let (serial, _) = link.release();
        assert_eq!(serial.tx, [0xFD, 0x00, 0x04, 0x01, 0x00]);
    }

    #[test]
    fn test_stale_acks_do_not_complete_stored_text() {
        use parlance_core::handshake::Phase;
        use parlance_core::{Error, SynthConfig, Synthesizer};

        let mut config = SynthConfig::uart();
        config.handshake.accept_timeout_ms = Some(50);
        config.handshake.complete_timeout_ms = Some(50);

        // Leftovers from an earlier exchange; the module itself stays silent
        let mut serial = MockSerial::default();
        serial.rx.extend([0x41, 0x4F]);
        let mut synth: Synthesizer<_, _, 16> =
            Synthesizer::new(link(serial), MockDelay::default(), config);

        assert_eq!(
            synth.speak_stored(b"hi\0"),
            Err(Error::Timeout(Phase::AwaitAccept))
        );

        let (link, _) = synth.release();
        let (serial, _) = link.release();
        assert_eq!(serial.tx, [0xFD, 0x00, 0x04, 0x01, 0x00, b'h', b'i']);
    }

    #[test]
    fn test_command_keeps_pending_input() {
        let mut serial = MockSerial::default();
        serial.rx.push_back(0x41);
        let mut link = link(serial);

        link.send_command(&[0xFD, 0x00, 0x01, 0x21]).unwrap();

        assert_eq!(link.read_ack(), Ok(Some(0x41)));
    }

    #[test]
    fn test_read_ack_waits_before_reading() {
        let mut link = link(MockSerial::default());

        assert_eq!(link.read_ack(), Ok(None));
        link.serial.rx.push_back(0x4F);
        assert_eq!(link.read_ack(), Ok(Some(0x4F)));

        let (_, delay) = link.release();
        assert_eq!(delay.total_ms, 20);
    }

    #[test]
    fn test_write_error_is_reported() {
        let serial = MockSerial {
            broken: true,
            ..MockSerial::default()
        };
        let mut link = link(serial);
        assert_eq!(link.send_frame(&[0xFD, 0x00, 0x02, 0x01, 0x00], &[]), Err(Overrun));
    }
}
