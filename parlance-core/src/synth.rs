//! Speech synthesis driver
//!
//! [`Synthesizer`] owns the transport and delay and runs one request at a
//! time. Every speak call works in two passes over the text:
//!
//! 1. **plan**: decode and segment everything, checking that every segment
//!    fits a frame and (for buffered delivery) the scratch buffer
//! 2. **emit**: segment again, send each frame and wait for the module to
//!    finish playing it
//!
//! A failed plan means nothing reached the bus.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use parlance_hal::TextStore;
use parlance_protocol::{
    Command, DigitReading, EnglishReading, Level, NameReading, NumberLanguage, OneReading,
    Setting, SpeechStyle, Voice, ZeroReading, ACK_COMPLETE, WAKE_BYTE, STATUS_QUERY,
};

use crate::config::SynthConfig;
use crate::error::Error;
use crate::framer::{segment_header, send_control, send_raw_ascii, Framer};
use crate::handshake::wait_for_playback;
use crate::text::{native_len, Segmenter, Text, TextSource};
use crate::transport::Transport;

/// Default scratch buffer size in bytes
pub const DEFAULT_SCRATCH_LEN: usize = 256;

/// Result of the planning pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Plan {
    segments: usize,
    native_len: usize,
    largest: usize,
}

/// Driver for one synthesis module
///
/// `N` is the size of the per-call scratch buffer that holds one segment's
/// payload. It lives on the stack for the duration of a speak call.
pub struct Synthesizer<T, D, const N: usize = DEFAULT_SCRATCH_LEN> {
    transport: T,
    delay: D,
    config: SynthConfig,
}

impl<T, D, const N: usize> Synthesizer<T, D, N>
where
    T: Transport,
    D: DelayNs,
{
    /// Create a driver; the module is not touched until [`begin`](Self::begin)
    pub fn new(transport: T, delay: D, config: SynthConfig) -> Self {
        Self {
            transport,
            delay,
            config,
        }
    }

    /// Get the active configuration
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Give back the transport and delay
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// Wake the module and apply the configured voice defaults
    ///
    /// Sends the wake byte followed by a status query until the module
    /// reports ready or the attempts run out. Wake write failures are ignored
    /// since a sleeping module may not acknowledge its bus address. Returns
    /// whether the module answered a wake attempt; always `false` when the
    /// configuration sends none.
    pub fn begin(&mut self) -> Result<bool, Error<T::Error>> {
        let init = self.config.init;
        let mut ready = false;

        for _attempt in 0..init.wake_attempts {
            let _ = self.transport.send_command(&[WAKE_BYTE]);
            self.delay.delay_ms(init.wake_delay_ms);
            let _ = self.transport.send_command(&STATUS_QUERY);
            if let Ok(Some(ACK_COMPLETE)) = self.transport.read_ack() {
                ready = true;
                break;
            }
        }

        #[cfg(feature = "defmt")]
        if ready {
            defmt::info!("synthesis module ready");
        } else {
            defmt::warn!("synthesis module did not answer {} wake attempts", init.wake_attempts);
        }

        let voice = self.config.voice;
        self.set_volume(voice.volume.get())?;
        if let Some(speed) = voice.speed {
            self.set_speed(speed.get())?;
        }
        if let Some(tone) = voice.tone {
            self.set_tone(tone.get())?;
        }
        if let Some(kind) = voice.voice {
            self.set_voice(kind)?;
        }

        Ok(ready)
    }

    /// Speak UTF-8 text that may mix English and Chinese
    pub fn speak(&mut self, text: &str) -> Result<(), Error<T::Error>> {
        self.speak_source(TextSource::from(text))
    }

    /// Speak an in-memory byte buffer of known length
    pub fn speak_bytes(&mut self, bytes: &[u8]) -> Result<(), Error<T::Error>> {
        self.speak_source(TextSource::counted(bytes))
    }

    /// Speak in-memory bytes up to the first zero byte
    pub fn speak_null_terminated(&mut self, bytes: &[u8]) -> Result<(), Error<T::Error>> {
        self.speak_source(TextSource::null_terminated(bytes))
    }

    /// Speak zero-terminated text from read-only storage
    ///
    /// Stored text is streamed a code point at a time and needs no scratch
    /// buffer.
    pub fn speak_stored(&mut self, store: &dyn TextStore) -> Result<(), Error<T::Error>> {
        self.speak_source(TextSource::stored(store))
    }

    /// Speak text from any source
    pub fn speak_source(&mut self, source: TextSource<'_>) -> Result<(), Error<T::Error>> {
        let text = Text::new(source);
        let streamed = text.is_stored();
        let plan = self.plan(&text, streamed)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "speaking {} source bytes as {} segments, {} native bytes",
            text.len(),
            plan.segments,
            plan.native_len
        );
        #[cfg(not(feature = "defmt"))]
        let _ = plan;

        let framer = Framer::new(&text);
        let mut scratch: Vec<u8, N> = Vec::new();
        for segment in Segmenter::new(&text) {
            let segment = segment?;
            if streamed {
                framer.send_streamed(&mut self.transport, &segment)?;
            } else {
                framer.send_buffered(&mut self.transport, &segment, &mut scratch)?;
            }
            self.wait_for_playback()?;
        }
        Ok(())
    }

    /// Speak text as one unsegmented ASCII frame
    ///
    /// Every byte is sent masked to seven bits, so this is only meaningful
    /// for English text and control strings.
    pub fn speak_ascii(&mut self, text: &str) -> Result<(), Error<T::Error>> {
        let mut scratch: Vec<u8, N> = Vec::new();
        send_raw_ascii(&mut self.transport, text.as_bytes(), &mut scratch)?;
        self.wait_for_playback()
    }

    /// Apply one voice setting
    pub fn apply(&mut self, setting: Setting) -> Result<(), Error<T::Error>> {
        let control = setting.control_string();

        #[cfg(feature = "defmt")]
        defmt::debug!("apply {}", control.as_str());

        self.speak_ascii(control.as_str())
    }

    /// Set volume 0-9 (clamped)
    pub fn set_volume(&mut self, volume: u8) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Volume(Level::new(volume)))
    }

    /// Set speed 0-9 (clamped)
    pub fn set_speed(&mut self, speed: u8) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Speed(Level::new(speed)))
    }

    /// Set tone 0-9 (clamped)
    pub fn set_tone(&mut self, tone: u8) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Tone(Level::new(tone)))
    }

    /// Select the speaker voice
    pub fn set_voice(&mut self, voice: Voice) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Voice(voice))
    }

    /// Spell English words letter by letter, or read them as words
    pub fn set_english_reading(&mut self, reading: EnglishReading) -> Result<(), Error<T::Error>> {
        self.apply(Setting::English(reading))
    }

    /// Read digit strings as telephone numbers, as numbers, or decide per string
    pub fn set_digit_reading(&mut self, reading: DigitReading) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Digits(reading))
    }

    /// Speak word by word or in smooth phrases
    pub fn set_speech_style(&mut self, style: SpeechStyle) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Style(style))
    }

    /// Read inline pinyin as pronunciation instead of letters
    pub fn enable_pinyin(&mut self, enable: bool) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Pinyin(enable))
    }

    /// Read numbers in Chinese, in English, or by context
    pub fn set_number_language(&mut self, language: NumberLanguage) -> Result<(), Error<T::Error>> {
        self.apply(Setting::NumberLanguage(language))
    }

    /// Read "0" as "ling" or as "o"
    pub fn set_zero_reading(&mut self, reading: ZeroReading) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Zero(reading))
    }

    /// Read "1" as "yao" or as "yi"
    pub fn set_one_reading(&mut self, reading: OneReading) -> Result<(), Error<T::Error>> {
        self.apply(Setting::One(reading))
    }

    /// Force surname pronunciation of the first character, or decide by context
    pub fn set_name_reading(&mut self, reading: NameReading) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Name(reading))
    }

    /// Follow the prosody marks in the text
    pub fn enable_rhythm(&mut self, enable: bool) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Rhythm(enable))
    }

    /// Restore every voice parameter to the module's defaults
    pub fn reset(&mut self) -> Result<(), Error<T::Error>> {
        self.apply(Setting::Reset)
    }

    /// Stop playback
    pub fn stop(&mut self) -> Result<(), Error<T::Error>> {
        send_control(&mut self.transport, Command::Stop)
    }

    /// Pause playback
    pub fn pause(&mut self) -> Result<(), Error<T::Error>> {
        send_control(&mut self.transport, Command::Pause)
    }

    /// Resume paused playback
    pub fn resume(&mut self) -> Result<(), Error<T::Error>> {
        send_control(&mut self.transport, Command::Resume)
    }

    /// Put the module into low-power sleep
    pub fn sleep(&mut self) -> Result<(), Error<T::Error>> {
        send_control(&mut self.transport, Command::Sleep)
    }

    /// Wake the module from sleep
    pub fn wake(&mut self) -> Result<(), Error<T::Error>> {
        send_control(&mut self.transport, Command::Wake)
    }

    fn wait_for_playback(&mut self) -> Result<(), Error<T::Error>> {
        wait_for_playback(&mut self.transport, &mut self.delay, &self.config.handshake)
    }

    /// Check the whole text before anything is sent
    fn plan(&self, text: &Text<'_>, streamed: bool) -> Result<Plan, Error<T::Error>> {
        let total = native_len(text).inspect_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("undecodable text at byte {}", _e.offset());
        })?;

        let mut plan = Plan {
            native_len: total,
            ..Plan::default()
        };
        for segment in Segmenter::new(text) {
            let segment = segment?;
            segment_header(&segment)?;
            plan.segments += 1;
            plan.largest = plan.largest.max(segment.native_len);
        }

        if !streamed && plan.largest > N {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "segment of {} bytes exceeds {} byte scratch buffer",
                plan.largest,
                N
            );
            return Err(Error::Allocation {
                needed: plan.largest,
                capacity: N,
            });
        }
        Ok(plan)
    }
}
