//! Command execution handlers

use anyhow::Result;
use lpcfan_core::FanMode;
use lpcfan_hardware::FanSwitch;
use tracing::info;

use crate::cli::{Cli, ConfigCommands, OutputFormat};
use crate::config::{write_config, CliConfig};
use crate::format::{format_config, format_success, format_summary};

/// Run one fan transaction and print its summary
///
/// Returns whether the transaction succeeded.
pub fn handle_switch(
    switch: &mut dyn FanSwitch,
    mode: FanMode,
    format: &OutputFormat,
) -> Result<bool> {
    info!("Setting fan to {} via {}", mode, switch.backend());
    let summary = switch.switch(mode);
    println!("{}", format_summary(&summary, format)?);
    Ok(summary.success)
}

pub fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("{}", format_config(current_config, format)?);
        }
        ConfigCommands::Path => {
            println!("{}", current_config.config_path.display());
        }
        ConfigCommands::Init { force } => {
            let path = &current_config.config_path;
            write_config(path, &current_config.settings, force)?;
            match format {
                OutputFormat::Json => {
                    let result = serde_json::json!({
                        "written": path,
                    });
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        format_success(&format!("Configuration written to {}", path.display()))
                    );
                }
            }
        }
    }

    Ok(())
}

pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
