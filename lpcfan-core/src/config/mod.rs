//! Configuration types for lpcfan
//!
//! Configuration is a single TOML file ([`StaticConfig`]) selecting the
//! transport backend, its device paths, and the status poll budget. EC port
//! numbers and command bytes are deliberately absent: they live in
//! [`crate::protocol`] as constants.

mod paths;
mod static_config;

pub use paths::default_config_path;
pub use static_config::{DeviceConfig, EcConfig, ScriptConfig, StaticConfig};
