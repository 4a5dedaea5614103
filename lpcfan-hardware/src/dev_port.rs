//! Raw port access through `/dev/port`
//!
//! The kernel exposes the I/O port space as a character device where the
//! file offset is the port number. A one-byte positional read or write at
//! offset `port` is an `inb`/`outb` on that port. Requires root (or
//! `CAP_SYS_RAWIO`).

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use lpcfan_core::{Backend, CloseError, OpenError};
use tracing::{debug, error};

use crate::transport::{
    request_port, request_value, ControlCode, PortTransport, SessionProvider, REQUEST_LEN,
};

/// Session provider for `/dev/port`
#[derive(Debug, Clone)]
pub struct DevPortDevice {
    path: PathBuf,
}

impl DevPortDevice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DevPortDevice {
    fn default() -> Self {
        Self::new("/dev/port")
    }
}

impl SessionProvider for DevPortDevice {
    type Session = DevPortSession;

    fn backend(&self) -> Backend {
        Backend::DevPort
    }

    fn open(&mut self) -> Result<DevPortSession, OpenError> {
        debug!("Opening port device: {}", self.path.display());

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|source| {
                error!("Failed to open {}: {}", self.path.display(), source);
                OpenError {
                    path: self.path.display().to_string(),
                    source,
                }
            })?;

        Ok(DevPortSession { file })
    }

    fn close(&mut self, session: DevPortSession) -> Result<(), CloseError> {
        drop(session);
        debug!("Port device closed: {}", self.path.display());
        Ok(())
    }
}

/// Open handle on the port device
#[derive(Debug)]
pub struct DevPortSession {
    file: File,
}

impl PortTransport for DevPortSession {
    fn transact(
        &mut self,
        code: ControlCode,
        request: &[u8; REQUEST_LEN],
        response: &mut [u8],
    ) -> std::io::Result<usize> {
        let offset = u64::from(request_port(request));
        match code {
            ControlCode::ReadPort => {
                let len = response.len().min(1);
                self.file.read_at(&mut response[..len], offset)
            }
            ControlCode::WritePort => self.file.write_at(&[request_value(request)], offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fan_controller::FanController;
    use lpcfan_core::{FanError, IoError, PollError};

    /// A regular file standing in for the port space
    fn port_space(dir: &tempfile::TempDir, size: usize) -> PathBuf {
        let path = dir.path().join("port");
        std::fs::write(&path, vec![0u8; size]).unwrap();
        path
    }

    #[test]
    fn test_transaction_against_port_space() {
        let dir = tempfile::tempdir().unwrap();
        let path = port_space(&dir, 0x100);

        let mut controller = FanController::with_poll_attempts(DevPortDevice::new(&path), 8);
        controller.set_fan(true).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes[0x68], 0x77);
        // Last command port write is the close byte
        assert_eq!(bytes[0x6C], 0xFF);
    }

    #[test]
    fn test_read_past_end_is_short_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let path = port_space(&dir, 0x10);

        let mut controller = FanController::with_poll_attempts(DevPortDevice::new(&path), 8);
        let err = controller.set_fan(false).unwrap_err();

        assert!(matches!(
            err,
            FanError::IdleWait(PollError::ReadFailed(IoError::ShortTransfer {
                port: 0x6C,
                transferred: 0
            }))
        ));
    }

    #[test]
    fn test_missing_device_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = DevPortDevice::new(dir.path().join("absent"));

        let err = device.open().unwrap_err();
        assert!(err.path.ends_with("absent"));
        assert_eq!(err.source.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_default_path() {
        assert_eq!(DevPortDevice::default().path(), Path::new("/dev/port"));
    }
}
