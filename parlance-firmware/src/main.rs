//! Parlance - speech synthesis module demo firmware
//!
//! Drives an XFS5152-family text-to-speech module from an RP2040. The
//! module sits on I2C0 (GPIO4 SDA, GPIO5 SCL) by default; build with the
//! `uart` feature to use UART0 (GPIO0 TX, GPIO1 RX) instead.
//!
//! Named for "parlance", a manner of speaking.

#![no_std]
#![no_main]

use core::fmt::Write as _;

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Timer};
use embedded_hal::delay::DelayNs;
use {defmt_rtt as _, panic_probe as _};

use parlance_core::config::{parse_into, SynthConfig};
use parlance_core::{Synthesizer, Transport};
use parlance_hal::TextStore;
use parlance_protocol::{DigitReading, EnglishReading};

/// Embedded configuration (compiled into firmware)
/// Edit voice.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../voice.toml");

/// Scratch buffer per speak call; one segment's payload must fit
const SCRATCH_LEN: usize = 256;

/// Seconds between announcements
const ANNOUNCE_INTERVAL_S: u64 = 10;

/// Zero-terminated phrase kept in flash and streamed from there
static GREETING: FlashText = FlashText("\u{4f60}\u{597d}, Parlance is ready.\0".as_bytes());

/// Text in the program image, read a byte at a time
struct FlashText(&'static [u8]);

impl TextStore for FlashText {
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.0.get(offset).copied()
    }
}

#[cfg(not(feature = "uart"))]
mod link {
    use embassy_rp::i2c::{self, I2c};
    use embassy_rp::peripherals::{I2C0, PIN_4, PIN_5};
    use embassy_rp::Peri;
    use parlance_core::config::DeviceConfig;
    use parlance_drivers::I2cTransport;
    use parlance_hal::{EhI2c, I2cConfig};

    pub type Link = I2cTransport<EhI2c<I2c<'static, I2C0, i2c::Blocking>>>;

    pub fn preset() -> parlance_core::SynthConfig {
        parlance_core::SynthConfig::i2c()
    }

    pub fn open(
        i2c0: Peri<'static, I2C0>,
        scl: Peri<'static, PIN_5>,
        sda: Peri<'static, PIN_4>,
        device: &DeviceConfig,
    ) -> Link {
        let mut config = i2c::Config::default();
        config.frequency = I2cConfig::STANDARD.frequency;
        let bus = I2c::new_blocking(i2c0, scl, sda, config);
        I2cTransport::from_config(EhI2c(bus), device)
    }
}

#[cfg(feature = "uart")]
mod link {
    use embassy_rp::bind_interrupts;
    use embassy_rp::peripherals::{PIN_0, PIN_1, UART0};
    use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart, Uart};
    use embassy_rp::Peri;
    use embassy_time::Delay;
    use parlance_core::config::DeviceConfig;
    use parlance_drivers::UartTransport;
    use parlance_hal::{EhSerial, UartConfig};
    use static_cell::StaticCell;

    bind_interrupts!(struct Irqs {
        UART0_IRQ => BufferedInterruptHandler<UART0>;
    });

    // UART buffers must live forever
    static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
    static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

    pub type Link = UartTransport<EhSerial<BufferedUart>, Delay>;

    pub fn preset() -> parlance_core::SynthConfig {
        parlance_core::SynthConfig::uart()
    }

    pub fn open(
        uart0: Peri<'static, UART0>,
        tx: Peri<'static, PIN_0>,
        rx: Peri<'static, PIN_1>,
        device: &DeviceConfig,
    ) -> Link {
        let mut config = uart::Config::default();
        config.baudrate = UartConfig::default().baudrate;

        let tx_buf = TX_BUF.init([0u8; 256]);
        let rx_buf = RX_BUF.init([0u8; 64]);
        let serial = Uart::new_blocking(uart0, tx, rx, config).into_buffered(Irqs, tx_buf, rx_buf);
        UartTransport::from_config(EhSerial(serial), Delay, device)
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Parlance firmware starting...");

    let p = embassy_rp::init(Default::default());

    let config = load_config();

    #[cfg(not(feature = "uart"))]
    let transport = link::open(p.I2C0, p.PIN_5, p.PIN_4, &config.device);
    #[cfg(feature = "uart")]
    let transport = link::open(p.UART0, p.PIN_0, p.PIN_1, &config.device);
    info!("Transport initialized");

    let mut synth: Synthesizer<link::Link, Delay, SCRATCH_LEN> =
        Synthesizer::new(transport, Delay, config);

    match synth.begin() {
        Ok(true) => info!("Module awake"),
        Ok(false) => warn!("Module did not answer wake bytes, continuing"),
        Err(e) => error!("Module setup failed: {}", Debug2Format(&e)),
    }

    if let Err(e) = configure_reading(&mut synth) {
        warn!("Failed to apply reading options: {}", Debug2Format(&e));
    }

    if let Err(e) = synth.speak_stored(&GREETING) {
        warn!("Greeting failed: {}", Debug2Format(&e));
    }

    announce_loop(&mut synth).await;
}

/// Start from the transport preset and apply voice.toml on top
fn load_config() -> SynthConfig {
    let mut config = link::preset();
    match parse_into(EMBEDDED_CONFIG, &mut config) {
        Ok(()) => {
            info!(
                "Config: addr={:#x}, settle={}ms, volume={}",
                config.device.i2c_address,
                config.handshake.settle_ms,
                config.voice.volume.get()
            );
            config
        }
        Err(e) => {
            // build.rs checks the file, so this only trips on reader gaps
            warn!("voice.toml rejected ({}), using defaults", e);
            link::preset()
        }
    }
}

fn configure_reading<T, D, const N: usize>(
    synth: &mut Synthesizer<T, D, N>,
) -> Result<(), parlance_core::Error<T::Error>>
where
    T: Transport,
    D: DelayNs,
{
    synth.set_english_reading(EnglishReading::Word)?;
    synth.set_digit_reading(DigitReading::Numeric)
}

/// Speak a numbered announcement forever
async fn announce_loop<T, D, const N: usize>(synth: &mut Synthesizer<T, D, N>) -> !
where
    T: Transport,
    T::Error: core::fmt::Debug,
    D: DelayNs,
{
    let mut count: u32 = 0;
    loop {
        count = count.wrapping_add(1);

        let mut phrase: heapless::String<48> = heapless::String::new();
        if write!(phrase, "Announcement {}, \u{7b2c}{}\u{6b21}", count, count).is_err() {
            warn!("Announcement text truncated");
        }

        info!("Speaking announcement {}", count);
        match synth.speak(phrase.as_str()) {
            Ok(()) => {}
            Err(e) => warn!("Speak failed: {}", Debug2Format(&e)),
        }

        Timer::after_secs(ANNOUNCE_INTERVAL_S).await;
    }
}
