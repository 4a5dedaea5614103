//! lpcfan CLI Library
//!
//! Configuration resolution, backend selection and output formatting for
//! the `lpcfanctl` tool. Fan switching itself lives in `lpcfan-hardware`.
//!
//! ```no_run
//! use lpcfan_core::{FanMode, StaticConfig};
//! use lpcfanctl::backend::build_switch;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings = StaticConfig::load(Path::new("/etc/lpcfan/config.toml"))?;
//! let mut switch = build_switch(&settings)?;
//! let summary = switch.switch(FanMode::High);
//! println!("success: {}", summary.success);
//! # Ok(())
//! # }
//! ```

/// Backend selection from configuration.
pub mod backend;

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;
