//! Driver errors

use parlance_protocol::FrameError;

use crate::handshake::Phase;
use crate::text::DecodeError;

/// Errors from a driver operation
///
/// `E` is the transport's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus transaction failed; the frame may have been partly sent
    Bus(E),
    /// Scratch buffer too small for a segment; nothing was sent
    Allocation {
        /// Bytes the largest segment needs
        needed: usize,
        /// Bytes the scratch buffer holds
        capacity: usize,
    },
    /// Text cannot be decoded; nothing was sent
    MalformedInput(DecodeError),
    /// Segment too long for the 16-bit frame length field; nothing was sent
    PayloadTooLarge,
    /// A handshake phase ran past its configured deadline
    Timeout(Phase),
}

impl<E> From<DecodeError> for Error<E> {
    fn from(e: DecodeError) -> Self {
        Error::MalformedInput(e)
    }
}

impl<E> From<FrameError> for Error<E> {
    fn from(_: FrameError) -> Self {
        Error::PayloadTooLarge
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "data bus error: {:?}", e),
            Error::Allocation { needed, capacity } => write!(
                f,
                "scratch buffer too small: need {} bytes, have {}",
                needed, capacity
            ),
            Error::MalformedInput(e) => write!(f, "malformed input: {}", e),
            Error::PayloadTooLarge => write!(f, "segment too large for one frame"),
            Error::Timeout(phase) => write!(f, "device did not answer during {:?}", phase),
        }
    }
}
