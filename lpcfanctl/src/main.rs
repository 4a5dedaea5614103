//! lpcfan CLI
//!
//! Command-line interface for switching the fan through the embedded
//! controller.

use anyhow::Result;
use clap::Parser;
use lpcfan_core::default_config_path;
use lpcfanctl::backend::build_switch;
use lpcfanctl::cli::{generate_completion, handle_config, handle_switch, Cli, Commands};
use lpcfanctl::config::CliConfig;
use std::path::PathBuf;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine config path: CLI flag > env var > default
    let config_path = cli.config.clone().unwrap_or_else(|| {
        std::env::var("LPCFAN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path())
    });

    // Build configuration using priority chain: defaults → file → env → CLI args
    let config = match resolve_config(&cli, config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);
    debug!("Configuration file: {}", config.config_path.display());
    debug!("Backend: {}", config.backend());

    let format = config.output_format;
    let result = match cli.command {
        Commands::Config { command } => handle_config(command, &config, &format).map(|_| true),
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(true)
        }
        command => match command.fan_mode() {
            Some(mode) => build_switch(&config.settings)
                .and_then(|mut switch| handle_switch(switch.as_mut(), mode, &format)),
            None => Ok(true),
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if config.verbose {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli, config_path: PathBuf) -> Result<CliConfig> {
    let mut builder = CliConfig::builder(config_path)
        .with_config_file(!cli.no_config)?
        .with_env_overrides()?;

    if let Some(backend) = cli.backend {
        builder = builder.with_backend(backend);
    }
    if let Some(attempts) = cli.poll_attempts {
        builder = builder.with_poll_attempts(attempts)?;
    }
    if let Some(format) = cli.format {
        builder = builder.with_output_format(format);
    }
    if cli.verbose {
        builder = builder.with_verbose(true);
    }

    builder.build()
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
