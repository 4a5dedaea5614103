//! Intro and close handshakes
//!
//! Both have the same shape: read the data-accept port, wait for the EC to
//! consume its input, then write a command byte to the command port. The
//! first failing step ends the handshake.

use lpcfan_core::protocol::{DATA_PORT, STATUS_PORT};
use lpcfan_core::{EcCommand, HandshakeError, PollCondition};
use tracing::debug;

use crate::io_channel::{read_port, write_port};
use crate::poller::wait_for;
use crate::transport::PortTransport;

/// Runs the EC entry and exit sequences
#[derive(Debug, Clone, Copy)]
pub struct EcHandshake {
    poll_attempts: u32,
}

impl EcHandshake {
    pub fn new(poll_attempts: u32) -> Self {
        Self { poll_attempts }
    }

    /// Open a transaction (writes 0x59 to the command port)
    pub fn intro<S: PortTransport + ?Sized>(&self, session: &mut S) -> Result<(), HandshakeError> {
        self.run(session, EcCommand::Intro)
    }

    /// Return the EC to normal command acceptance (writes 0xFF to the command port)
    pub fn close<S: PortTransport + ?Sized>(&self, session: &mut S) -> Result<(), HandshakeError> {
        self.run(session, EcCommand::Close)
    }

    fn run<S: PortTransport + ?Sized>(
        &self,
        session: &mut S,
        command: EcCommand,
    ) -> Result<(), HandshakeError> {
        let value = read_port(session, DATA_PORT).map_err(HandshakeError::Read)?;
        debug!(
            "{:?}: read 0x{:02X} from port 0x{:02X}",
            command, value, DATA_PORT
        );

        wait_for(
            session,
            STATUS_PORT,
            PollCondition::ec_ready(self.poll_attempts),
        )
        .map_err(HandshakeError::Wait)?;

        write_port(session, command.port(), command.byte()).map_err(HandshakeError::Write)?;
        debug!(
            "{:?}: wrote 0x{:02X} to port 0x{:02X}",
            command,
            command.byte(),
            command.port()
        );

        Ok(())
    }
}
