//! Backend selection
//!
//! Turns the configured [`Backend`] into a ready-to-use [`FanSwitch`].

use anyhow::Result;
use lpcfan_core::{Backend, StaticConfig};
use lpcfan_hardware::{FanController, FanSwitch, ScriptFallback, SimulatedEc};
use tracing::debug;

/// Build the fan switch for the configured backend
///
/// Fails if the backend is not available on this platform.
pub fn build_switch(settings: &StaticConfig) -> Result<Box<dyn FanSwitch>> {
    let attempts = settings.ec.poll_attempts;
    let backend = settings.device.backend;
    if backend.speaks_ec() {
        debug!("Using {} backend ({} poll attempts)", backend, attempts);
    } else {
        debug!("Using {} backend", backend);
    }

    match backend {
        Backend::LpcFilter => lpc_filter(settings),
        Backend::DevPort => dev_port(settings),
        Backend::Script => Ok(Box::new(ScriptFallback::from_config(&settings.script))),
        Backend::Simulated => Ok(Box::new(FanController::with_poll_attempts(
            SimulatedEc::new(),
            attempts,
        ))),
    }
}

#[cfg(windows)]
fn lpc_filter(settings: &StaticConfig) -> Result<Box<dyn FanSwitch>> {
    use lpcfan_hardware::LpcFilterDevice;

    let device = LpcFilterDevice::new(settings.device.lpc_filter_path.clone());
    Ok(Box::new(FanController::with_poll_attempts(
        device,
        settings.ec.poll_attempts,
    )))
}

#[cfg(not(windows))]
fn lpc_filter(_settings: &StaticConfig) -> Result<Box<dyn FanSwitch>> {
    Err(anyhow::anyhow!(
        "The lpc-filter backend requires Windows; use dev-port or script instead"
    ))
}

#[cfg(unix)]
fn dev_port(settings: &StaticConfig) -> Result<Box<dyn FanSwitch>> {
    use lpcfan_hardware::DevPortDevice;

    let device = DevPortDevice::new(settings.device.dev_port_path.clone());
    Ok(Box::new(FanController::with_poll_attempts(
        device,
        settings.ec.poll_attempts,
    )))
}

#[cfg(not(unix))]
fn dev_port(_settings: &StaticConfig) -> Result<Box<dyn FanSwitch>> {
    Err(anyhow::anyhow!(
        "The dev-port backend requires a Unix host; use lpc-filter instead"
    ))
}
