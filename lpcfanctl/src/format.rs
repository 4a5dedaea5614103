//! Output formatting utilities for the CLI
//!
//! Provides text and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use lpcfan_core::TransactionSummary;

use crate::cli::OutputFormat;
use crate::config::CliConfig;

/// Format the result of a fan transaction
pub fn format_summary(summary: &TransactionSummary, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            let mut output = String::new();

            if summary.success {
                output.push_str(&format_success(&format!(
                    "Fan set to {} via {}",
                    summary.mode.to_string().cyan(),
                    summary.backend
                )));
            } else {
                output.push_str(&format_error(&format!(
                    "Failed to set fan to {} via {}",
                    summary.mode, summary.backend
                )));
                if let Some(step) = summary.failed_step {
                    output.push('\n');
                    output.push_str(&format!("  Failed step: {}", step.to_string().yellow()));
                }
                if let Some(error) = &summary.error {
                    output.push('\n');
                    output.push_str(&format!("  Error: {}", error));
                }
            }

            if let Some(closed) = summary.closed {
                output.push('\n');
                output.push_str(&format!("  EC closed: {}", yes_no(closed)));
            }
            if let Some(released) = summary.released {
                output.push('\n');
                output.push_str(&format!("  Session released: {}", yes_no(released)));
            }

            Ok(output)
        }
    }
}

/// Format the effective configuration
pub fn format_config(config: &CliConfig, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Text => {
            let settings = &config.settings;
            let rows = [
                ("Config File", config.config_path.display().to_string()),
                ("Backend", settings.device.backend.to_string()),
                ("LPC Filter", settings.device.lpc_filter_path.clone()),
                (
                    "Port Device",
                    settings.device.dev_port_path.display().to_string(),
                ),
                ("Poll Attempts", settings.ec.poll_attempts.to_string()),
                (
                    "Script",
                    format!(
                        "{} {}",
                        settings.script.interpreter,
                        settings.script.path.display()
                    ),
                ),
                (
                    "Output Format",
                    format!("{:?}", config.output_format).to_lowercase(),
                ),
                ("Verbose", config.verbose.to_string()),
            ];

            let mut output = String::new();
            output.push_str(&"lpcfan Configuration".bold().to_string());
            output.push('\n');
            output.push_str(&format!("{:<20} Value\n", "Setting"));
            output.push_str(&"-".repeat(40));
            for (key, value) in rows {
                output.push('\n');
                output.push_str(&format!("{:<20} {}", key, value));
            }
            Ok(output)
        }
    }
}

fn yes_no(value: bool) -> ColoredString {
    if value {
        "Yes".green()
    } else {
        "No".red()
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format error message
pub fn format_error(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message)
}
