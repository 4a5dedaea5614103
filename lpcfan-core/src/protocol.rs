//! EC port map and command bytes
//!
//! These values describe one vendor's embedded controller as reached through
//! the LPC bus. They are undocumented and only meaningful for that hardware,
//! so they are fixed here rather than exposed through configuration.

/// Status register, polled for the busy/ready bits
pub const STATUS_PORT: u8 = 0x6C;

/// Command register (same address as the status register, used for writes)
pub const COMMAND_PORT: u8 = 0x6C;

/// Data-accept register, read before each handshake and written with the fan byte
pub const DATA_PORT: u8 = 0x68;

/// Status bit that is set while the EC has not consumed the last byte
pub const READY_MASK: u8 = 0x02;

/// Status bit that is set while the EC is busy with its own work
pub const BUSY_MASK: u8 = 0x80;

/// Default number of status reads before a wait gives up
///
/// This is a retry count, not a duration. How long it takes depends entirely
/// on the speed of a single port transaction on the host.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 20_000;

/// Command bytes understood by the EC
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcCommand {
    /// Open a transaction (0x59, written to the command port)
    Intro = 0x59,
    /// Switch the fan to normal speed (0x76, written to the data port)
    FanNormal = 0x76,
    /// Switch the fan to full speed (0x77, written to the data port)
    FanHigh = 0x77,
    /// Return the EC to normal command acceptance (0xFF, written to the command port)
    Close = 0xFF,
}

impl EcCommand {
    /// Raw byte written to the port
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Port this command byte is written to
    pub const fn port(self) -> u8 {
        match self {
            EcCommand::Intro | EcCommand::Close => COMMAND_PORT,
            EcCommand::FanNormal | EcCommand::FanHigh => DATA_PORT,
        }
    }
}

/// A masked comparison on the status register, bounded by an attempt count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCondition {
    pub mask: u8,
    pub expected: u8,
    pub max_attempts: u32,
}

impl PollCondition {
    /// EC is not busy (bit 0x80 clear)
    pub const fn ec_idle(max_attempts: u32) -> Self {
        Self {
            mask: BUSY_MASK,
            expected: 0x00,
            max_attempts,
        }
    }

    /// EC has consumed the previous byte (bit 0x02 clear)
    pub const fn ec_ready(max_attempts: u32) -> Self {
        Self {
            mask: READY_MASK,
            expected: 0x00,
            max_attempts,
        }
    }

    #[inline]
    pub fn is_met(&self, value: u8) -> bool {
        value & self.mask == self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_bytes() {
        assert_eq!(EcCommand::Intro.byte(), 0x59);
        assert_eq!(EcCommand::Close.byte(), 0xFF);
        assert_eq!(EcCommand::FanHigh.byte(), 0x77);
        assert_eq!(EcCommand::FanNormal.byte(), 0x76);
    }

    #[test]
    fn test_command_ports() {
        assert_eq!(EcCommand::Intro.port(), 0x6C);
        assert_eq!(EcCommand::Close.port(), 0x6C);
        assert_eq!(EcCommand::FanHigh.port(), 0x68);
        assert_eq!(EcCommand::FanNormal.port(), 0x68);
    }

    #[test]
    fn test_poll_condition_masks() {
        let idle = PollCondition::ec_idle(10);
        assert!(idle.is_met(0x00));
        assert!(idle.is_met(0x7F));
        assert!(!idle.is_met(0x80));

        let ready = PollCondition::ec_ready(10);
        assert!(ready.is_met(0x80));
        assert!(ready.is_met(0xFD));
        assert!(!ready.is_met(0x02));
    }
}
