//! Test doubles for the transport and delay seams

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use parlance_protocol::{ACK_ACCEPTED, ACK_COMPLETE, FRAME_MARKER, HEADER_LEN, STATUS_QUERY};

use crate::transport::Transport;

/// Bus failure raised by [`MockTransport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

/// Scripted synthesis module
///
/// Every write is recorded. A responsive module answers each speak frame
/// with `0x41` and each status query with `0x4F`; a silent one never
/// answers.
pub struct MockTransport {
    pub writes: Vec<Vec<u8>>,
    pub pending: VecDeque<u8>,
    pub responsive: bool,
    /// Status queries answered with "busy" before reporting complete
    pub busy_polls: usize,
    /// Fail the write with this index (counting from 0)
    pub fail_at: Option<usize>,
    pub reads: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            pending: VecDeque::new(),
            responsive: true,
            busy_polls: 0,
            fail_at: None,
            reads: 0,
        }
    }

    pub fn silent() -> Self {
        Self {
            responsive: false,
            ..Self::new()
        }
    }

    /// Writes that were not status queries
    pub fn frames(&self) -> Vec<&[u8]> {
        self.writes
            .iter()
            .filter(|w| w.as_slice() != STATUS_QUERY)
            .map(|w| w.as_slice())
            .collect()
    }

    fn record(&mut self, bytes: Vec<u8>) -> Result<(), BusFault> {
        if self.fail_at == Some(self.writes.len()) {
            return Err(BusFault);
        }
        self.writes.push(bytes);
        Ok(())
    }
}

impl Transport for MockTransport {
    type Error = BusFault;

    fn send_frame(&mut self, header: &[u8; HEADER_LEN], payload: &[u8]) -> Result<(), BusFault> {
        let mut bytes = header.to_vec();
        bytes.extend_from_slice(payload);
        self.record(bytes)?;
        if self.responsive {
            self.pending.push_back(ACK_ACCEPTED);
        }
        Ok(())
    }

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), BusFault> {
        self.record(bytes.to_vec())?;
        if !self.responsive {
            return Ok(());
        }
        if bytes == STATUS_QUERY {
            if self.busy_polls > 0 {
                self.busy_polls -= 1;
                self.pending.push_back(0x4E);
            } else {
                self.pending.push_back(ACK_COMPLETE);
            }
        } else if bytes.len() == HEADER_LEN && bytes[0] == FRAME_MARKER {
            self.pending.push_back(ACK_ACCEPTED);
        }
        Ok(())
    }

    fn read_ack(&mut self) -> Result<Option<u8>, BusFault> {
        self.reads += 1;
        Ok(self.pending.pop_front())
    }
}

/// Delay that only records what was asked of it
#[derive(Default)]
pub struct MockDelay {
    pub calls_ms: Vec<u32>,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.calls_ms.iter().map(|&ms| ms as u64).sum()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls_ms.push(ns / 1_000_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.calls_ms.push(us / 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls_ms.push(ms);
    }
}
