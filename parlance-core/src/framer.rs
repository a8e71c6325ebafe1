//! Packing segments into speak frames
//!
//! A segment goes out in one of two shapes:
//!
//! - **buffered**: the native payload is collected in a scratch buffer and
//!   handed to [`Transport::send_frame`] together with the header
//! - **streamed**: the header is sent on its own, then every code point as a
//!   separate one- or two-byte write; no scratch buffer is needed
//!
//! The framer trusts the segmenter's boundaries and does not re-check them.

use heapless::Vec;
use parlance_protocol::{control_frame, Command, Encoding, SpeakHeader};

use crate::error::Error;
use crate::text::{decode_at, Script, Segment, Text, MAX_NATIVE_LEN};
use crate::transport::Transport;

/// Frame encoding for a segment's script
pub fn segment_encoding(script: Script) -> Encoding {
    match script {
        Script::Ascii => Encoding::Ascii,
        Script::MultiByte => Encoding::Unicode,
    }
}

/// Header announcing a segment
pub fn segment_header(segment: &Segment) -> Result<SpeakHeader, parlance_protocol::FrameError> {
    SpeakHeader::new(segment_encoding(segment.script), segment.native_len)
}

/// Frame builder over one resolved text
pub struct Framer<'t, 'a> {
    text: &'t Text<'a>,
}

impl<'t, 'a> Framer<'t, 'a> {
    /// Create a framer for `text`
    pub fn new(text: &'t Text<'a>) -> Self {
        Self { text }
    }

    /// Call `f` with the native bytes of every code point in `segment`
    fn for_each_native<E>(
        &self,
        segment: &Segment,
        mut f: impl FnMut(&[u8]) -> Result<(), Error<E>>,
    ) -> Result<(), Error<E>> {
        let mut native = [0u8; MAX_NATIVE_LEN];
        let mut offset = segment.start;
        while offset < segment.end() {
            let cp = decode_at(self.text, offset)?;
            f(cp.encode_native(&mut native))?;
            offset += cp.width as usize;
        }
        Ok(())
    }

    /// Collect the native payload of `segment` into `scratch`
    ///
    /// `scratch` is cleared first.
    pub fn fill_payload<E, const N: usize>(
        &self,
        segment: &Segment,
        scratch: &mut Vec<u8, N>,
    ) -> Result<(), Error<E>> {
        scratch.clear();
        self.for_each_native(segment, |bytes| {
            scratch
                .extend_from_slice(bytes)
                .map_err(|_| Error::Allocation {
                    needed: segment.native_len,
                    capacity: N,
                })
        })
    }

    /// Send `segment` as header plus one buffered payload
    pub fn send_buffered<T: Transport, const N: usize>(
        &self,
        transport: &mut T,
        segment: &Segment,
        scratch: &mut Vec<u8, N>,
    ) -> Result<(), Error<T::Error>> {
        let header = segment_header(segment)?;
        self.fill_payload::<T::Error, N>(segment, scratch)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "buffered {} frame, {} payload bytes",
            segment.script,
            scratch.len()
        );

        let result = transport
            .send_frame(&header.encode(), scratch)
            .map_err(Error::Bus);
        scratch.clear();
        result
    }

    /// Send `segment` as header plus one write per code point
    pub fn send_streamed<T: Transport>(
        &self,
        transport: &mut T,
        segment: &Segment,
    ) -> Result<(), Error<T::Error>> {
        let header = segment_header(segment)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "streamed {} frame, {} code points",
            segment.script,
            segment.code_points
        );

        transport
            .begin_frame(&header.encode())
            .map_err(Error::Bus)?;
        self.for_each_native(segment, |bytes| {
            transport.send_command(bytes).map_err(Error::Bus)
        })
    }
}

/// Send `text` unsegmented as a raw ASCII frame
///
/// Every byte is masked to seven bits. Used for voice control strings.
pub fn send_raw_ascii<T: Transport, const N: usize>(
    transport: &mut T,
    text: &[u8],
    scratch: &mut Vec<u8, N>,
) -> Result<(), Error<T::Error>> {
    if text.len() > N {
        #[cfg(feature = "defmt")]
        defmt::warn!("raw text of {} bytes exceeds {} byte buffer", text.len(), N);
        return Err(Error::Allocation {
            needed: text.len(),
            capacity: N,
        });
    }
    let header = SpeakHeader::new(Encoding::RawAscii, text.len())?;

    scratch.clear();
    for &byte in text {
        // Length checked above
        let _ = scratch.push(byte & 0x7F);
    }

    let result = transport
        .send_frame(&header.encode(), scratch)
        .map_err(Error::Bus);
    scratch.clear();
    result
}

/// Send a payload-less control command
pub fn send_control<T: Transport>(
    transport: &mut T,
    command: Command,
) -> Result<(), Error<T::Error>> {
    #[cfg(feature = "defmt")]
    defmt::debug!("control command {}", command);

    transport
        .send_command(&control_frame(command))
        .map_err(Error::Bus)
}
