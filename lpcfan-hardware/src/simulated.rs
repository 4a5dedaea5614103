//! In-memory embedded controller
//!
//! Used by the `simulated` backend to exercise the full protocol without
//! hardware, and by tests to inject failures at specific ports. Every
//! attempted transaction is recorded, including the ones made to fail.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lpcfan_core::protocol::{DATA_PORT, STATUS_PORT};
use lpcfan_core::{Backend, CloseError, OpenError};
use tracing::debug;

use crate::transport::{
    request_port, request_value, ControlCode, PortTransport, SessionProvider, REQUEST_LEN,
};

/// One attempted port transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortOp {
    Read { port: u8 },
    Write { port: u8, value: u8 },
}

#[derive(Debug, Default)]
struct SimState {
    status: u8,
    status_script: VecDeque<u8>,
    data: u8,
    ops: Vec<PortOp>,
    fail_reads: Vec<u8>,
    fail_writes: Vec<u8>,
    short_reads: Vec<u8>,
    fail_open: bool,
    opened: usize,
    released: usize,
}

/// Simulated EC and its transport device
///
/// Clones share state, so a test can keep one handle for inspection while
/// the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEc {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedEc {
    /// An idle EC: the status port reads `0x00`, the data port `0x00`
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Value returned by status reads once the script is exhausted
    pub fn with_status(self, status: u8) -> Self {
        self.lock().status = status;
        self
    }

    /// Values returned by the next status reads, in order
    pub fn with_status_script(self, values: impl IntoIterator<Item = u8>) -> Self {
        self.lock().status_script.extend(values);
        self
    }

    /// Value returned by data port reads
    pub fn with_data(self, data: u8) -> Self {
        self.lock().data = data;
        self
    }

    /// Make every read of `port` fail at the transport level
    pub fn fail_reads_on(self, port: u8) -> Self {
        self.lock().fail_reads.push(port);
        self
    }

    /// Make every write to `port` fail at the transport level
    pub fn fail_writes_on(self, port: u8) -> Self {
        self.lock().fail_writes.push(port);
        self
    }

    /// Make every read of `port` succeed without transferring a byte
    pub fn short_reads_on(self, port: u8) -> Self {
        self.lock().short_reads.push(port);
        self
    }

    /// Make opening the device fail
    pub fn fail_open(self) -> Self {
        self.lock().fail_open = true;
        self
    }

    /// Every attempted transaction so far
    pub fn ops(&self) -> Vec<PortOp> {
        self.lock().ops.clone()
    }

    /// Attempted writes as `(port, value)` pairs
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match *op {
                PortOp::Write { port, value } => Some((port, value)),
                PortOp::Read { .. } => None,
            })
            .collect()
    }

    /// Number of attempted reads of `port`
    pub fn reads_of(&self, port: u8) -> usize {
        self.lock()
            .ops
            .iter()
            .filter(|op| matches!(op, PortOp::Read { port: p } if *p == port))
            .count()
    }

    pub fn sessions_opened(&self) -> usize {
        self.lock().opened
    }

    pub fn sessions_released(&self) -> usize {
        self.lock().released
    }

    /// A session on this EC, bypassing the provider's bookkeeping
    pub fn session(&self) -> SimulatedSession {
        SimulatedSession {
            state: Arc::clone(&self.state),
        }
    }
}

impl SessionProvider for SimulatedEc {
    type Session = SimulatedSession;

    fn backend(&self) -> Backend {
        Backend::Simulated
    }

    fn open(&mut self) -> Result<SimulatedSession, OpenError> {
        let mut state = self.lock();
        if state.fail_open {
            return Err(OpenError {
                path: "simulated EC".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "device not present"),
            });
        }
        state.opened += 1;
        debug!("Simulated EC session opened");
        Ok(SimulatedSession {
            state: Arc::clone(&self.state),
        })
    }

    fn close(&mut self, _session: SimulatedSession) -> Result<(), CloseError> {
        self.lock().released += 1;
        debug!("Simulated EC session released");
        Ok(())
    }
}

/// Session on a [`SimulatedEc`]
#[derive(Debug)]
pub struct SimulatedSession {
    state: Arc<Mutex<SimState>>,
}

impl PortTransport for SimulatedSession {
    fn transact(
        &mut self,
        code: ControlCode,
        request: &[u8; REQUEST_LEN],
        response: &mut [u8],
    ) -> std::io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let port = request_port(request);

        match code {
            ControlCode::ReadPort => {
                state.ops.push(PortOp::Read { port });
                if state.fail_reads.contains(&port) {
                    return Err(std::io::Error::other("simulated read failure"));
                }
                if state.short_reads.contains(&port) {
                    return Ok(0);
                }
                let value = match port {
                    STATUS_PORT => {
                        let fallback = state.status;
                        state.status_script.pop_front().unwrap_or(fallback)
                    }
                    DATA_PORT => state.data,
                    _ => 0xFF,
                };
                match response.first_mut() {
                    Some(slot) => {
                        *slot = value;
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }
            ControlCode::WritePort => {
                let value = request_value(request);
                state.ops.push(PortOp::Write { port, value });
                if state.fail_writes.contains(&port) {
                    return Err(std::io::Error::other("simulated write failure"));
                }
                Ok(0)
            }
        }
    }
}
