//! Backend-independent fan switching

use lpcfan_core::{Backend, FanMode, TransactionSummary};

/// Anything that can put the fan into a [`FanMode`]
///
/// Implemented by the EC controller for every session provider and by the
/// script fallback, so front ends can drive any backend through one trait
/// object.
pub trait FanSwitch {
    /// Backend behind this switch
    fn backend(&self) -> Backend;

    /// Run one complete transaction and report how it went
    fn switch(&mut self, mode: FanMode) -> TransactionSummary;
}
