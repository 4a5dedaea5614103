//! Bounded spin-poll on the EC status register
//!
//! The poll is a hot loop: no sleep or yield between attempts. The bound is a
//! number of reads, never a wall-clock duration, since the timing of a single
//! port transaction on the host is unknown.

use lpcfan_core::{PollCondition, PollError};
use tracing::debug;

use crate::io_channel::read_port;
use crate::transport::PortTransport;

/// Read `port` until `(value & mask) == expected` or the attempts run out
///
/// A failed read aborts the wait immediately; only a value mismatch is
/// retried.
pub fn wait_for<S: PortTransport + ?Sized>(
    session: &mut S,
    port: u8,
    condition: PollCondition,
) -> Result<(), PollError> {
    let mut last_value = None;

    for _ in 0..condition.max_attempts {
        let value = read_port(session, port).map_err(PollError::ReadFailed)?;
        if condition.is_met(value) {
            return Ok(());
        }
        last_value = Some(value);
    }

    debug!(
        "Timeout waiting for port 0x{:02X} & 0x{:02X} == 0x{:02X} (last value: {:02X?})",
        port, condition.mask, condition.expected, last_value
    );
    Err(PollError::Timeout {
        attempts: condition.max_attempts,
        last_value,
    })
}
