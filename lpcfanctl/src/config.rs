//! CLI configuration resolution
//!
//! Combines the TOML config file with environment variables and command-line
//! flags into one validated [`CliConfig`].

use anyhow::{Context, Result};
use lpcfan_core::{Backend, StaticConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;

/// Effective configuration for one invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CliConfig {
    /// Config file the settings were read from (may not exist)
    pub config_path: PathBuf,

    /// Device, EC and script settings
    #[serde(flatten)]
    pub settings: StaticConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Enable verbose logging
    pub verbose: bool,
}

impl CliConfig {
    /// Create a new builder for constructing configuration
    pub fn builder(config_path: impl Into<PathBuf>) -> ConfigBuilder {
        ConfigBuilder::new(config_path)
    }

    pub fn backend(&self) -> Backend {
        self.settings.device.backend
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
///
/// Each `with_*` call overrides what earlier calls set, so callers apply the
/// layers in that order.
#[derive(Debug)]
pub struct ConfigBuilder {
    config_path: PathBuf,
    settings: StaticConfig,
    output_format: OutputFormat,
    verbose: bool,
}

impl ConfigBuilder {
    /// Start from defaults
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: StaticConfig::default(),
            output_format: OutputFormat::default(),
            verbose: false,
        }
    }

    /// Load the config file, if requested and present
    pub fn with_config_file(mut self, load_file: bool) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }

        self.settings = StaticConfig::load(&self.config_path).with_context(|| {
            format!(
                "Failed to load config file {}",
                self.config_path.display()
            )
        })?;
        Ok(self)
    }

    /// Apply `LPCFAN_BACKEND`, `LPCFAN_POLL_ATTEMPTS` and `LPCFAN_FORMAT`
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(backend) = std::env::var("LPCFAN_BACKEND") {
            let backend = backend
                .parse::<Backend>()
                .context("Invalid LPCFAN_BACKEND environment variable")?;
            self = self.with_backend(backend);
        }

        if let Ok(attempts) = std::env::var("LPCFAN_POLL_ATTEMPTS") {
            let attempts: u32 = attempts
                .parse()
                .context("Invalid LPCFAN_POLL_ATTEMPTS environment variable")?;
            self = self.with_poll_attempts(attempts)?;
        }

        if let Ok(format) = std::env::var("LPCFAN_FORMAT") {
            let format = format
                .parse::<OutputFormat>()
                .context("Invalid LPCFAN_FORMAT environment variable")?;
            self = self.with_output_format(format);
        }

        Ok(self)
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.settings.device.backend = backend;
        self
    }

    /// Set the poll budget (with validation)
    pub fn with_poll_attempts(mut self, attempts: u32) -> Result<Self> {
        Self::validate_poll_attempts(attempts)?;
        self.settings.ec.poll_attempts = attempts;
        Ok(self)
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        self.settings
            .validate()
            .context("Invalid configuration")?;

        Ok(CliConfig {
            config_path: self.config_path,
            settings: self.settings,
            output_format: self.output_format,
            verbose: self.verbose,
        })
    }

    fn validate_poll_attempts(attempts: u32) -> Result<()> {
        if attempts == 0 {
            return Err(anyhow::anyhow!("Poll attempts must be greater than 0"));
        }
        Ok(())
    }
}

/// Write `settings` to `path`, refusing to overwrite unless `force` is set
pub fn write_config(path: &Path, settings: &StaticConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    settings
        .save(path)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}
