//! Shared types for fan transactions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::protocol::EcCommand;

/// Requested fan speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanMode {
    /// Fan at full speed ("on")
    High,
    /// Fan under normal EC control ("off")
    Normal,
}

impl FanMode {
    /// EC command byte selecting this mode
    pub fn command(self) -> EcCommand {
        match self {
            FanMode::High => EcCommand::FanHigh,
            FanMode::Normal => EcCommand::FanNormal,
        }
    }

    /// Argument passed to the fallback script
    pub fn script_arg(self) -> &'static str {
        match self {
            FanMode::High => "MAX",
            FanMode::Normal => "NORMAL",
        }
    }
}

impl From<bool> for FanMode {
    fn from(on: bool) -> Self {
        if on {
            FanMode::High
        } else {
            FanMode::Normal
        }
    }
}

impl FromStr for FanMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "max" | "on" => Ok(FanMode::High),
            "normal" | "auto" | "off" => Ok(FanMode::Normal),
            _ => Err(ConfigError::Invalid(format!(
                "Unknown fan mode: '{}'. Valid options: high, normal",
                s
            ))),
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanMode::High => write!(f, "high"),
            FanMode::Normal => write!(f, "normal"),
        }
    }
}

/// How the EC is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Vendor LPC filter driver (Windows)
    LpcFilter,
    /// Raw port access through `/dev/port` (Unix)
    DevPort,
    /// External helper script
    Script,
    /// In-memory EC, no hardware access
    Simulated,
}

impl Backend {
    /// Backend used when nothing is configured
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Backend::LpcFilter
        } else {
            Backend::Script
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::LpcFilter => "lpc-filter",
            Backend::DevPort => "dev-port",
            Backend::Script => "script",
            Backend::Simulated => "simulated",
        }
    }

    /// Whether this backend runs the EC handshake itself
    pub fn speaks_ec(&self) -> bool {
        !matches!(self, Backend::Script)
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lpc-filter" | "lpcfilter" | "lpc" => Ok(Backend::LpcFilter),
            "dev-port" | "devport" | "port" => Ok(Backend::DevPort),
            "script" => Ok(Backend::Script),
            "simulated" | "mock" => Ok(Backend::Simulated),
            _ => Err(ConfigError::Invalid(format!(
                "Unknown backend: '{}'. Valid options: lpc-filter, dev-port, script, simulated",
                s
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Step of a fan transaction, used to report where it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FanStep {
    Open,
    IdleWait,
    Intro,
    ReadyWait,
    Command,
    Script,
}

impl fmt::Display for FanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FanStep::Open => "open",
            FanStep::IdleWait => "idle-wait",
            FanStep::Intro => "intro",
            FanStep::ReadyWait => "ready-wait",
            FanStep::Command => "command",
            FanStep::Script => "script",
        };
        f.write_str(name)
    }
}

/// Outcome of one fan transaction, suitable for display or JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub backend: Backend,
    pub mode: FanMode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<FanStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Close handshake result; `None` when no session was opened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    /// Session release result; `None` when no session was opened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<bool>,
}

impl TransactionSummary {
    /// Summary of a run that succeeded without an EC session (script fallback)
    pub fn succeeded(backend: Backend, mode: FanMode) -> Self {
        Self {
            backend,
            mode,
            success: true,
            failed_step: None,
            error: None,
            closed: None,
            released: None,
        }
    }

    /// Summary of a run that failed without an EC session
    pub fn failed(backend: Backend, mode: FanMode, error: &crate::FanError) -> Self {
        Self {
            backend,
            mode,
            success: false,
            failed_step: Some(error.step()),
            error: Some(error.to_string()),
            closed: None,
            released: None,
        }
    }
}
