//! lpcfan-hardware
//!
//! Embedded controller access protocol and the transports that carry it.
//! This crate is intended to be used by the CLI (or any other front end) to
//! switch the fan through the EC.
//!
//! Public API:
//! - `fan_controller::FanController`: full EC transaction with guaranteed cleanup
//! - `handshake::EcHandshake`: intro/close sequences
//! - `poller::wait_for`: bounded status spin-poll
//! - `io_channel::{read_port, write_port}`: single-byte port access
//! - `transport::{PortTransport, SessionProvider}`: transport seam
//! - `SimulatedEc`, `DevPortDevice` (Unix), `LpcFilterDevice` (Windows): session providers
//! - `script::ScriptFallback`: external helper script for hosts without a transport
//! - `switch::FanSwitch`: backend-independent entry point

pub mod fan_controller;
pub mod handshake;
pub mod io_channel;
pub mod poller;
pub mod script;
pub mod simulated;
pub mod switch;
pub mod transport;

#[cfg(unix)]
pub mod dev_port;
#[cfg(windows)]
pub mod lpc_filter;

#[cfg(unix)]
pub use dev_port::DevPortDevice;
pub use fan_controller::{FanController, Transaction};
pub use handshake::EcHandshake;
#[cfg(windows)]
pub use lpc_filter::LpcFilterDevice;
pub use script::ScriptFallback;
pub use simulated::{PortOp, SimulatedEc};
pub use switch::FanSwitch;
pub use transport::{ControlCode, PortTransport, SessionProvider};
