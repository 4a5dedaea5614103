//! Transport abstraction for raw port transactions
//!
//! A transport performs one device transaction per call: given a control code
//! and an 8-byte request, it either reads one byte from a port or writes one
//! byte to it, and reports how many bytes were transferred back. Session
//! providers open and release the device that carries these transactions.

use lpcfan_core::{Backend, CloseError, OpenError};

/// Size of the request buffer sent with every transaction
pub const REQUEST_LEN: usize = 8;

const FILE_DEVICE_UNKNOWN: u32 = 0x22;
const METHOD_BUFFERED: u32 = 0;
const FILE_READ_WRITE_ACCESS: u32 = 0x1 | 0x2;

/// Equivalent of the Windows `CTL_CODE` macro
const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

/// Control codes understood by the LPC filter driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    /// Read one byte from the port in request byte 0
    ReadPort,
    /// Write request byte 4 to the port in request byte 0
    WritePort,
}

impl ControlCode {
    /// IOCTL value passed to the driver
    pub const fn value(self) -> u32 {
        match self {
            ControlCode::ReadPort => {
                ctl_code(FILE_DEVICE_UNKNOWN, 0x800, METHOD_BUFFERED, FILE_READ_WRITE_ACCESS)
            }
            ControlCode::WritePort => {
                ctl_code(FILE_DEVICE_UNKNOWN, 0x801, METHOD_BUFFERED, FILE_READ_WRITE_ACCESS)
            }
        }
    }
}

/// Build a request buffer: port in byte 0, value in byte 4, zeros elsewhere
#[inline]
pub fn encode_request(port: u8, value: u8) -> [u8; REQUEST_LEN] {
    [port, 0x00, 0x00, 0x00, value, 0x00, 0x00, 0x00]
}

#[inline]
pub fn request_port(request: &[u8; REQUEST_LEN]) -> u8 {
    request[0]
}

#[inline]
pub fn request_value(request: &[u8; REQUEST_LEN]) -> u8 {
    request[4]
}

/// An open device session able to perform raw port transactions
///
/// This trait enables testing of the EC protocol without real hardware
/// by allowing simulated implementations.
pub trait PortTransport {
    /// Whether the underlying handle is usable (not the invalid sentinel)
    fn is_valid(&self) -> bool {
        true
    }

    /// Perform one transaction and return the number of bytes transferred
    /// into `response`.
    fn transact(
        &mut self,
        code: ControlCode,
        request: &[u8; REQUEST_LEN],
        response: &mut [u8],
    ) -> std::io::Result<usize>;
}

/// Opens and releases device sessions
pub trait SessionProvider {
    type Session: PortTransport;

    /// Backend this provider implements, for reporting
    fn backend(&self) -> Backend;

    /// Acquire a session on the transport device
    fn open(&mut self) -> Result<Self::Session, OpenError>;

    /// Release a session. Consumes it so it cannot be released twice.
    fn close(&mut self, session: Self::Session) -> Result<(), CloseError>;
}
