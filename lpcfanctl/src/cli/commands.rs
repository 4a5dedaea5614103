//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use lpcfan_core::{Backend, FanMode};
use serde::Serialize;
use std::path::PathBuf;

/// lpcfan fan switch
#[derive(Parser, Debug)]
#[command(name = "lpcfanctl")]
#[command(version, about = "Switch the laptop fan through the embedded controller", long_about = None)]
pub struct Cli {
    /// Config file path (default: ~/.config/lpcfan/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    /// Transport backend (lpc-filter, dev-port, script, simulated)
    #[arg(short, long)]
    pub backend: Option<Backend>,

    /// Status reads per EC wait before giving up
    #[arg(long)]
    pub poll_attempts: Option<u32>,

    /// Output format (overrides config and environment)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Text,
    /// JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'text' or 'json'",
                s
            )),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the fan at full speed
    On,

    /// Return the fan to normal speed
    Off,

    /// Set the fan mode explicitly
    Set {
        /// Fan mode (high, normal)
        mode: FanMode,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// Fan mode requested by this command, if it switches the fan
    pub fn fan_mode(&self) -> Option<FanMode> {
        match self {
            Commands::On => Some(FanMode::High),
            Commands::Off => Some(FanMode::Normal),
            Commands::Set { mode } => Some(*mode),
            Commands::Config { .. } | Commands::Completion { .. } => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
