//! Single-byte port access over a device session
//!
//! Errors at this layer are never retried; retry policy belongs to the
//! status poller.

use lpcfan_core::IoError;
use tracing::{debug, trace};

use crate::transport::{encode_request, ControlCode, PortTransport};

/// Read one byte from `port`
///
/// The transaction must report exactly one byte transferred, otherwise the
/// read is treated as failed even if the transport call succeeded.
pub fn read_port<S: PortTransport + ?Sized>(session: &mut S, port: u8) -> Result<u8, IoError> {
    if !session.is_valid() {
        debug!("Invalid device session, not reading port 0x{:02X}", port);
        return Err(IoError::InvalidSession);
    }

    let request = encode_request(port, 0x00);
    let mut response = [0u8; 1];

    let transferred = session
        .transact(ControlCode::ReadPort, &request, &mut response)
        .map_err(|source| {
            debug!("Unable to read from port 0x{:02X}: {}", port, source);
            IoError::TransportFailed { port, source }
        })?;

    if transferred != 1 {
        debug!(
            "Unable to read from port 0x{:02X}: {} byte(s) returned",
            port, transferred
        );
        return Err(IoError::ShortTransfer { port, transferred });
    }

    trace!("RX 0x{:02X} <- port 0x{:02X}", response[0], port);
    Ok(response[0])
}

/// Write one byte to `port`
pub fn write_port<S: PortTransport + ?Sized>(
    session: &mut S,
    port: u8,
    value: u8,
) -> Result<(), IoError> {
    if !session.is_valid() {
        debug!("Invalid device session, not writing port 0x{:02X}", port);
        return Err(IoError::InvalidSession);
    }

    let request = encode_request(port, value);

    session
        .transact(ControlCode::WritePort, &request, &mut [])
        .map_err(|source| {
            debug!(
                "Error writing 0x{:02X} to port 0x{:02X}: {}",
                value, port, source
            );
            IoError::TransportFailed { port, source }
        })?;

    trace!("TX 0x{:02X} -> port 0x{:02X}", value, port);
    Ok(())
}
