//! Static configuration loaded once per invocation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::protocol::DEFAULT_POLL_ATTEMPTS;
use crate::types::Backend;

/// Transport device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Backend used to reach the EC
    pub backend: Backend,
    /// Device name of the vendor LPC filter driver
    pub lpc_filter_path: String,
    /// Raw port device on Unix
    pub dev_port_path: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::platform_default(),
            lpc_filter_path: r"\\.\LPCFilter".to_string(),
            dev_port_path: PathBuf::from("/dev/port"),
        }
    }
}

/// EC protocol tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcConfig {
    /// Status reads per wait before giving up (a count, not a duration)
    pub poll_attempts: u32,
}

impl Default for EcConfig {
    fn default() -> Self {
        Self {
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

/// Fallback script used by the `script` backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub interpreter: String,
    pub path: PathBuf,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            interpreter: "perl".to_string(),
            path: PathBuf::from("fancontroller.pl"),
        }
    }
}

/// Static configuration for lpcfan.
///
/// Located at `~/.config/lpcfan/config.toml` by default. Every section and
/// key is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub device: DeviceConfig,
    pub ec: EcConfig,
    pub script: ScriptConfig,
}

impl StaticConfig {
    /// Parse StaticConfig from TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize StaticConfig to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from `path`, falling back to defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Write configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Check values that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.ec.poll_attempts == 0 {
            return Err(ConfigError::Invalid(
                "ec.poll_attempts must be greater than 0".to_string(),
            ));
        }
        if self.device.lpc_filter_path.is_empty() {
            return Err(ConfigError::Invalid(
                "device.lpc_filter_path cannot be empty".to_string(),
            ));
        }
        if self.device.backend == Backend::Script && self.script.interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "script.interpreter cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_static_config() {
        let config = StaticConfig::default();
        assert_eq!(config.ec.poll_attempts, 20_000);
        assert_eq!(config.device.lpc_filter_path, r"\\.\LPCFilter");
        assert_eq!(config.device.dev_port_path, PathBuf::from("/dev/port"));
        assert_eq!(config.script.interpreter, "perl");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_static_config_serialization() {
        let config = StaticConfig::default();
        let toml_str = config.to_toml().unwrap();

        assert!(toml_str.contains("[device]"));
        assert!(toml_str.contains("[ec]"));
        assert!(toml_str.contains("[script]"));
        assert!(toml_str.contains("poll_attempts = 20000"));
    }

    #[test]
    fn test_static_config_deserialization() {
        let toml_str = r#"
            [device]
            backend = "dev-port"
            dev_port_path = "/tmp/port"

            [ec]
            poll_attempts = 500
        "#;

        let config = StaticConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.device.backend, Backend::DevPort);
        assert_eq!(config.device.dev_port_path, PathBuf::from("/tmp/port"));
        assert_eq!(config.ec.poll_attempts, 500);
        // Untouched sections keep their defaults
        assert_eq!(config.script, ScriptConfig::default());
        assert_eq!(config.device.lpc_filter_path, r"\\.\LPCFilter");
    }

    #[test]
    fn test_static_config_rejects_zero_attempts() {
        let result = StaticConfig::from_toml("[ec]\npoll_attempts = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_static_config_rejects_unknown_backend() {
        let result = StaticConfig::from_toml("[device]\nbackend = \"serial\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StaticConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, StaticConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = StaticConfig::default();
        config.device.backend = Backend::Simulated;
        config.ec.poll_attempts = 42;
        config.save(&path).unwrap();

        let loaded = StaticConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
