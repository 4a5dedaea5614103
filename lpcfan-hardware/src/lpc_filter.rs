//! Vendor LPC filter driver transport (Windows)
//!
//! The driver exposes port reads and writes as two buffered IOCTLs on
//! `\\.\LPCFilter`. Each call carries an 8-byte request; reads return one
//! byte.

use std::ffi::{c_void, CString};

use lpcfan_core::{Backend, CloseError, OpenError};
use tracing::{debug, error};
use windows::core::PCSTR;
use windows::Win32::Foundation::{CloseHandle, GENERIC_READ, GENERIC_WRITE, HANDLE};
use windows::Win32::Storage::FileSystem::{
    CreateFileA, FILE_FLAGS_AND_ATTRIBUTES, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};
use windows::Win32::System::IO::DeviceIoControl;

use crate::transport::{ControlCode, PortTransport, SessionProvider, REQUEST_LEN};

/// Session provider for the LPC filter driver
#[derive(Debug, Clone)]
pub struct LpcFilterDevice {
    path: String,
}

impl LpcFilterDevice {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    fn open_error(&self, source: std::io::Error) -> OpenError {
        OpenError {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for LpcFilterDevice {
    fn default() -> Self {
        Self::new(r"\\.\LPCFilter")
    }
}

impl SessionProvider for LpcFilterDevice {
    type Session = LpcFilterSession;

    fn backend(&self) -> Backend {
        Backend::LpcFilter
    }

    fn open(&mut self) -> Result<LpcFilterSession, OpenError> {
        debug!("Opening LPC driver: {}", self.path);

        let name = CString::new(self.path.as_str()).map_err(|e| {
            self.open_error(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        // SAFETY: `name` is a valid NUL-terminated string that outlives the call.
        let handle = unsafe {
            CreateFileA(
                PCSTR(name.as_ptr().cast()),
                GENERIC_READ.0 | GENERIC_WRITE.0,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                None,
                OPEN_EXISTING,
                FILE_FLAGS_AND_ATTRIBUTES(0),
                None,
            )
        }
        .map_err(|e| {
            error!("Unable to open LPC driver {}: {}", self.path, e);
            self.open_error(std::io::Error::other(e))
        })?;

        Ok(LpcFilterSession { handle })
    }

    fn close(&mut self, session: LpcFilterSession) -> Result<(), CloseError> {
        // SAFETY: the session owns the handle and is consumed here, so it is
        // closed exactly once.
        unsafe { CloseHandle(session.handle) }.map_err(|e| {
            error!("Unable to close LPC driver handle: {}", e);
            CloseError {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            }
        })?;
        debug!("Driver handle closed successfully");
        Ok(())
    }
}

/// Open handle on the LPC filter driver
#[derive(Debug)]
pub struct LpcFilterSession {
    handle: HANDLE,
}

impl PortTransport for LpcFilterSession {
    fn is_valid(&self) -> bool {
        !self.handle.is_invalid()
    }

    fn transact(
        &mut self,
        code: ControlCode,
        request: &[u8; REQUEST_LEN],
        response: &mut [u8],
    ) -> std::io::Result<usize> {
        let mut bytes_returned: u32 = 0;
        let out_buffer: Option<*mut c_void> = if response.is_empty() {
            None
        } else {
            Some(response.as_mut_ptr().cast())
        };

        // SAFETY: the request and response buffers are valid for the sizes
        // passed, and the call is synchronous (no OVERLAPPED).
        unsafe {
            DeviceIoControl(
                self.handle,
                code.value(),
                Some(request.as_ptr().cast::<c_void>()),
                REQUEST_LEN as u32,
                out_buffer,
                response.len() as u32,
                Some(&mut bytes_returned as *mut u32),
                None,
            )
        }
        .map_err(std::io::Error::other)?;

        Ok(bytes_returned as usize)
    }
}
