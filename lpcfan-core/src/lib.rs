//! lpcfan Core Library
//!
//! Shared types, protocol constants, error taxonomy, and configuration for
//! the lpcfan embedded-controller fan switch. Used by both the hardware
//! crate and the CLI.

pub mod config;
pub mod error;
pub mod protocol;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, DeviceConfig, EcConfig, ScriptConfig, StaticConfig};
pub use error::*;
pub use protocol::{EcCommand, PollCondition};
pub use types::*;
