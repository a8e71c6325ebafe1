//! Two-phase playback handshake
//!
//! After every speak frame the module first confirms it accepted the frame,
//! then reports completion when polled with the status query:
//!
//! ```text
//!  AwaitAccept ──0x41──▶ Settle ──100 ms──▶ AwaitComplete ──0x4F──▶ Done
//!      ▲   │                                   ▲      │
//!      └───┘ other byte / nothing              └──────┘ query, wait 20 ms
//! ```
//!
//! Without deadlines the wait is unbounded: a module that never answers
//! blocks the caller forever. Deadlines are counted in the delay time the
//! handshake itself spends, so they need no clock.

use embedded_hal::delay::DelayNs;
use parlance_protocol::{Ack, STATUS_QUERY};

use crate::config::HandshakeConfig;
use crate::error::Error;
use crate::transport::Transport;

/// Handshake phase, reported on timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Waiting for the frame to be accepted
    AwaitAccept,
    /// Fixed delay masking the module's turnaround latency
    Settle,
    /// Polling until playback has finished
    AwaitComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Waiting(Phase),
    Done,
}

/// Time spent in one waiting phase
struct Budget {
    phase: Phase,
    limit_ms: Option<u32>,
    spent_ms: u32,
}

impl Budget {
    fn new(phase: Phase, limit_ms: Option<u32>) -> Self {
        Self {
            phase,
            limit_ms,
            spent_ms: 0,
        }
    }

    /// Account for one poll interval, failing once the limit is used up
    ///
    /// A zero interval still counts as one millisecond so that a deadline
    /// always ends a spin.
    fn charge<E>(&mut self, interval_ms: u32) -> Result<(), Error<E>> {
        self.spent_ms = self.spent_ms.saturating_add(interval_ms.max(1));
        match self.limit_ms {
            Some(limit) if self.spent_ms > limit => {
                #[cfg(feature = "defmt")]
                defmt::warn!("handshake timed out in {} after {} ms", self.phase, limit);
                Err(Error::Timeout(self.phase))
            }
            _ => Ok(()),
        }
    }
}

/// Block until the module has accepted and finished playing the last frame
pub fn wait_for_playback<T, D>(
    transport: &mut T,
    delay: &mut D,
    config: &HandshakeConfig,
) -> Result<(), Error<T::Error>>
where
    T: Transport,
    D: DelayNs,
{
    let mut state = State::Waiting(Phase::AwaitAccept);
    let mut accept = Budget::new(Phase::AwaitAccept, config.accept_timeout_ms);
    let mut complete = Budget::new(Phase::AwaitComplete, config.complete_timeout_ms);

    while let State::Waiting(phase) = state {
        state = match phase {
            Phase::AwaitAccept => {
                match Ack::from_read(transport.read_ack().map_err(Error::Bus)?) {
                    Ack::Accepted => State::Waiting(Phase::Settle),
                    _ => {
                        accept.charge(config.accept_poll_ms)?;
                        if config.accept_poll_ms > 0 {
                            delay.delay_ms(config.accept_poll_ms);
                        }
                        State::Waiting(Phase::AwaitAccept)
                    }
                }
            }
            Phase::Settle => {
                delay.delay_ms(config.settle_ms);
                State::Waiting(Phase::AwaitComplete)
            }
            Phase::AwaitComplete => {
                transport.send_command(&STATUS_QUERY).map_err(Error::Bus)?;
                match Ack::from_read(transport.read_ack().map_err(Error::Bus)?) {
                    Ack::Complete => State::Done,
                    _ => {
                        complete.charge(config.complete_poll_ms)?;
                        delay.delay_ms(config.complete_poll_ms);
                        State::Waiting(Phase::AwaitComplete)
                    }
                }
            }
        };
    }

    #[cfg(feature = "defmt")]
    defmt::trace!(
        "playback done after {} ms accept, {} ms complete polling",
        accept.spent_ms,
        complete.spent_ms
    );

    Ok(())
}
