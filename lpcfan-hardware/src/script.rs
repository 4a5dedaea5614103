//! Fallback for hosts without an LPC transport
//!
//! Hands the request to an external helper script (`perl fancontroller.pl
//! MAX|NORMAL` by default) instead of talking to the EC directly.

use std::path::PathBuf;
use std::process::Command;

use lpcfan_core::{
    Backend, FanError, FanMode, ScriptConfig, ScriptError, TransactionSummary,
};
use tracing::{debug, info, warn};

use crate::switch::FanSwitch;

/// Runs the configured helper script
#[derive(Debug, Clone)]
pub struct ScriptFallback {
    interpreter: String,
    script: PathBuf,
}

impl ScriptFallback {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
        }
    }

    pub fn from_config(config: &ScriptConfig) -> Self {
        Self::new(config.interpreter.clone(), config.path.clone())
    }

    /// Run the script with `MAX` or `NORMAL` and wait for it to exit
    pub fn run(&self, mode: FanMode) -> Result<(), ScriptError> {
        debug!(
            "Running {} {} {}",
            self.interpreter,
            self.script.display(),
            mode.script_arg()
        );

        let status = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(mode.script_arg())
            .status()
            .map_err(|source| ScriptError::Spawn {
                program: self.interpreter.clone(),
                source,
            })?;

        if !status.success() {
            return Err(ScriptError::ExitStatus {
                program: self.interpreter.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }

    /// Switch the fan to high speed (`on`) or back to normal
    pub fn set_fan(&self, on: bool) -> Result<(), FanError> {
        Ok(self.run(FanMode::from(on))?)
    }
}

impl FanSwitch for ScriptFallback {
    fn backend(&self) -> Backend {
        Backend::Script
    }

    fn switch(&mut self, mode: FanMode) -> TransactionSummary {
        match self.run(mode) {
            Ok(()) => {
                info!("Fan set to {} via script", mode);
                TransactionSummary::succeeded(Backend::Script, mode)
            }
            Err(e) => {
                let err = FanError::from(e);
                warn!("{}", err);
                TransactionSummary::failed(Backend::Script, mode, &err)
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use lpcfan_core::FanStep;

    #[test]
    fn test_passes_mode_argument() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fan.sh");
        let out = dir.path().join("mode.txt");
        std::fs::write(&script, format!("echo \"$1\" > '{}'\n", out.display())).unwrap();

        let fallback = ScriptFallback::new("sh", &script);
        fallback.run(FanMode::High).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap().trim(), "MAX");

        fallback.set_fan(false).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap().trim(), "NORMAL");
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "exit 3\n").unwrap();

        let err = ScriptFallback::new("sh", &script)
            .run(FanMode::Normal)
            .unwrap_err();
        assert!(matches!(err, ScriptError::ExitStatus { code: Some(3), .. }));
    }

    #[test]
    fn test_missing_interpreter_is_spawn_error() {
        let err = ScriptFallback::new("/nonexistent/lpcfan-interpreter", "x.pl")
            .run(FanMode::High)
            .unwrap_err();
        assert!(matches!(err, ScriptError::Spawn { .. }));
    }

    #[test]
    fn test_switch_summary() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fail.sh");
        std::fs::write(&script, "exit 1\n").unwrap();

        let mut fallback = ScriptFallback::new("sh", &script);
        let summary = fallback.switch(FanMode::High);

        assert!(!summary.success);
        assert_eq!(summary.backend, Backend::Script);
        assert_eq!(summary.failed_step, Some(FanStep::Script));
        assert!(summary.closed.is_none());
    }
}
