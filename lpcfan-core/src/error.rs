//! Error types for EC access
//!
//! Each layer of the protocol has its own error type and wraps the first
//! failure of the layer below it.

use thiserror::Error;

use crate::types::FanStep;

/// The transport device could not be opened
#[derive(Error, Debug)]
#[error("Unable to open {path}: {source}")]
pub struct OpenError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// The transport device could not be closed
#[derive(Error, Debug)]
#[error("Unable to close {path}: {source}")]
pub struct CloseError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// Single-byte port access errors
#[derive(Error, Debug)]
pub enum IoError {
    /// Session handle is the invalid sentinel; the device was not touched
    #[error("Invalid device session")]
    InvalidSession,

    /// Read completed but did not transfer exactly one byte
    #[error("Short transfer on port 0x{port:02X}: {transferred} byte(s)")]
    ShortTransfer { port: u8, transferred: usize },

    /// The transport call itself failed
    #[error("Transport failed on port 0x{port:02X}: {source}")]
    TransportFailed {
        port: u8,
        #[source]
        source: std::io::Error,
    },
}

/// Status polling errors
#[derive(Error, Debug)]
pub enum PollError {
    /// Reading the status register failed (not retried)
    #[error("Status read failed: {0}")]
    ReadFailed(#[source] IoError),

    /// Attempt bound exhausted without the expected value
    #[error("Status wait timed out after {attempts} attempts (last value: {})", fmt_last(.last_value))]
    Timeout {
        attempts: u32,
        last_value: Option<u8>,
    },
}

fn fmt_last(value: &Option<u8>) -> String {
    match value {
        Some(v) => format!("0x{:02X}", v),
        None => "none".to_string(),
    }
}

/// Intro/close handshake errors, tagged with the step that failed
#[derive(Error, Debug)]
pub enum HandshakeError {
    #[error("Data port read failed: {0}")]
    Read(#[source] IoError),

    #[error("EC did not become ready: {0}")]
    Wait(#[source] PollError),

    #[error("Command write failed: {0}")]
    Write(#[source] IoError),
}

/// External fallback script errors
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}", fmt_code(.code))]
    ExitStatus { program: String, code: Option<i32> },
}

fn fmt_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

/// First failure of a fan transaction
#[derive(Error, Debug)]
pub enum FanError {
    #[error("Device unavailable: {0}")]
    Open(#[source] OpenError),

    #[error("EC busy: {0}")]
    IdleWait(#[source] PollError),

    #[error("Intro handshake failed: {0}")]
    Intro(#[source] HandshakeError),

    #[error("EC not ready for command: {0}")]
    ReadyWait(#[source] PollError),

    #[error("Fan command write failed: {0}")]
    Command(#[source] IoError),

    #[error("Fallback script failed: {0}")]
    Script(#[from] ScriptError),
}

impl FanError {
    /// Step of the transaction that produced this error
    pub fn step(&self) -> FanStep {
        match self {
            FanError::Open(_) => FanStep::Open,
            FanError::IdleWait(_) => FanStep::IdleWait,
            FanError::Intro(_) => FanStep::Intro,
            FanError::ReadyWait(_) => FanStep::ReadyWait,
            FanError::Command(_) => FanStep::Command,
            FanError::Script(_) => FanStep::Script,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = IoError::ShortTransfer {
            port: 0x6C,
            transferred: 0,
        };
        assert_eq!(format!("{}", err), "Short transfer on port 0x6C: 0 byte(s)");

        let err = IoError::InvalidSession;
        assert_eq!(format!("{}", err), "Invalid device session");
    }

    #[test]
    fn test_poll_timeout_display() {
        let err = PollError::Timeout {
            attempts: 20000,
            last_value: Some(0x82),
        };
        assert_eq!(
            format!("{}", err),
            "Status wait timed out after 20000 attempts (last value: 0x82)"
        );

        let err = PollError::Timeout {
            attempts: 0,
            last_value: None,
        };
        assert!(format!("{}", err).ends_with("(last value: none)"));
    }

    #[test]
    fn test_fan_error_wraps_first_failure() {
        let err = FanError::Intro(HandshakeError::Read(IoError::InvalidSession));
        assert_eq!(err.step(), FanStep::Intro);
        assert_eq!(
            format!("{}", err),
            "Intro handshake failed: Data port read failed: Invalid device session"
        );
    }

    #[test]
    fn test_script_error_display() {
        let err = ScriptError::ExitStatus {
            program: "perl".to_string(),
            code: Some(2),
        };
        assert_eq!(format!("{}", err), "perl exited with status 2");

        let fan_err: FanError = err.into();
        assert_eq!(fan_err.step(), FanStep::Script);
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ConfigError = toml_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
