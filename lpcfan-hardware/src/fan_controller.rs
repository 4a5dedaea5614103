//! Fan Controller - full EC transaction with guaranteed cleanup
//!
//! One call to [`FanController::set_fan`] opens a session, waits for the EC to
//! go idle, runs the intro handshake, waits for readiness, writes the fan
//! command byte, then always runs the close handshake and always releases the
//! session. Cleanup runs no matter which step failed; the result reports the
//! first failure only after cleanup is done.

use lpcfan_core::protocol::{DEFAULT_POLL_ATTEMPTS, STATUS_PORT};
use lpcfan_core::{
    Backend, CloseError, FanError, FanMode, HandshakeError, PollCondition, TransactionSummary,
};
use tracing::{debug, error, info, warn};

use crate::handshake::EcHandshake;
use crate::io_channel::write_port;
use crate::poller::wait_for;
use crate::switch::FanSwitch;
use crate::transport::SessionProvider;

/// Results of the cleanup half of a transaction
#[derive(Debug)]
pub struct Cleanup {
    pub close: Result<(), HandshakeError>,
    pub release: Result<(), CloseError>,
}

/// Everything that happened during one transaction
#[derive(Debug)]
pub struct Transaction {
    pub mode: FanMode,
    /// First failure of steps 1-5, or `Ok` if all succeeded
    pub outcome: Result<(), FanError>,
    /// `None` when the session could not be opened
    pub cleanup: Option<Cleanup>,
}

impl Transaction {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Flatten into a serializable summary
    pub fn summary(&self, backend: Backend) -> TransactionSummary {
        let (failed_step, error) = match &self.outcome {
            Ok(()) => (None, None),
            Err(e) => (Some(e.step()), Some(e.to_string())),
        };
        TransactionSummary {
            backend,
            mode: self.mode,
            success: self.outcome.is_ok(),
            failed_step,
            error,
            closed: self.cleanup.as_ref().map(|c| c.close.is_ok()),
            released: self.cleanup.as_ref().map(|c| c.release.is_ok()),
        }
    }
}

/// Fan controller driving the EC through a session provider
///
/// Generic over the provider, allowing real hardware (`LpcFilterDevice`,
/// `DevPortDevice`) or the simulated EC for testing.
pub struct FanController<P: SessionProvider> {
    provider: P,
    handshake: EcHandshake,
    poll_attempts: u32,
}

impl<P: SessionProvider> FanController<P> {
    /// Create a controller with the default poll budget
    pub fn new(provider: P) -> Self {
        Self::with_poll_attempts(provider, DEFAULT_POLL_ATTEMPTS)
    }

    /// Create a controller with a custom number of status reads per wait
    pub fn with_poll_attempts(provider: P, poll_attempts: u32) -> Self {
        Self {
            provider,
            handshake: EcHandshake::new(poll_attempts),
            poll_attempts,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Switch the fan to high speed (`on`) or back to normal
    pub fn set_fan(&mut self, on: bool) -> Result<(), FanError> {
        self.transact(FanMode::from(on)).outcome
    }

    /// Run one transaction and return its outcome together with the cleanup
    /// results
    pub fn transact(&mut self, mode: FanMode) -> Transaction {
        let mut session = match self.provider.open() {
            Ok(session) => session,
            Err(e) => {
                error!("Unable to open transport device: {}", e);
                return Transaction {
                    mode,
                    outcome: Err(FanError::Open(e)),
                    cleanup: None,
                };
            }
        };

        let outcome = self.command_sequence(&mut session, mode);
        if let Err(e) = &outcome {
            warn!("Fan transaction failed at {}: {}", e.step(), e);
        }

        let close = self.handshake.close(&mut session);
        match &close {
            Ok(()) => debug!("Close sequence successful"),
            Err(e) => warn!("Close sequence failed: {}", e),
        }

        let release = self.provider.close(session);
        match &release {
            Ok(()) => debug!("Device session released"),
            Err(e) => warn!("Unable to release device session: {}", e),
        }

        if outcome.is_ok() {
            info!("Fan set to {}", mode);
        }

        Transaction {
            mode,
            outcome,
            cleanup: Some(Cleanup { close, release }),
        }
    }

    /// Steps between acquiring and releasing the session; stops at the first
    /// failure
    fn command_sequence(&self, session: &mut P::Session, mode: FanMode) -> Result<(), FanError> {
        wait_for(
            session,
            STATUS_PORT,
            PollCondition::ec_idle(self.poll_attempts),
        )
        .map_err(FanError::IdleWait)?;

        self.handshake.intro(session).map_err(FanError::Intro)?;

        wait_for(
            session,
            STATUS_PORT,
            PollCondition::ec_ready(self.poll_attempts),
        )
        .map_err(FanError::ReadyWait)?;

        let command = mode.command();
        write_port(session, command.port(), command.byte()).map_err(FanError::Command)?;
        debug!(
            "Wrote fan command 0x{:02X} to port 0x{:02X}",
            command.byte(),
            command.port()
        );

        Ok(())
    }
}

impl<P: SessionProvider> FanSwitch for FanController<P> {
    fn backend(&self) -> Backend {
        self.provider.backend()
    }

    fn switch(&mut self, mode: FanMode) -> TransactionSummary {
        let backend = self.provider.backend();
        self.transact(mode).summary(backend)
    }
}
