//! Integration tests for the lpcfan CLI
//!
//! Everything here runs against the simulated EC or a throwaway script, so no
//! driver or port access is needed.

use anyhow::Result;
use lpcfan_core::{Backend, FanMode, FanStep, StaticConfig};
use lpcfanctl::backend::build_switch;
use lpcfanctl::cli::OutputFormat;
use lpcfanctl::config::CliConfig;
use std::path::Path;
use std::process::{Command, Output};

fn lpcfanctl(args: &[&str]) -> Output {
    lpcfanctl_with_config_env(args, None)
}

fn lpcfanctl_with_config_env(args: &[&str], config_env: Option<&Path>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_lpcfanctl"));
    match config_env {
        Some(path) => command.env("LPCFAN_CONFIG", path),
        None => command.env_remove("LPCFAN_CONFIG"),
    };
    command
        .args(args)
        .env_remove("LPCFAN_BACKEND")
        .env_remove("LPCFAN_POLL_ATTEMPTS")
        .env_remove("LPCFAN_FORMAT")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run lpcfanctl")
}

fn write_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

#[test]
fn test_config_file_drives_backend_selection() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    write_file(
        &path,
        "[device]\nbackend = \"simulated\"\n\n[ec]\npoll_attempts = 16\n",
    );

    let config = CliConfig::builder(&path).with_config_file(true)?.build()?;
    assert_eq!(config.backend(), Backend::Simulated);
    assert_eq!(config.settings.ec.poll_attempts, 16);

    let mut switch = build_switch(&config.settings)?;
    let summary = switch.switch(FanMode::High);
    assert!(summary.success);
    assert_eq!(summary.closed, Some(true));
    assert_eq!(summary.released, Some(true));

    Ok(())
}

#[test]
fn test_cli_flags_override_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    write_file(&path, "[device]\nbackend = \"script\"\n");

    let config = CliConfig::builder(&path)
        .with_config_file(true)?
        .with_backend(Backend::Simulated)
        .with_poll_attempts(5)?
        .with_output_format(OutputFormat::Json)
        .build()?;

    assert_eq!(config.backend(), Backend::Simulated);
    assert_eq!(config.settings.ec.poll_attempts, 5);
    assert_eq!(config.output_format, OutputFormat::Json);
    Ok(())
}

#[test]
fn test_init_then_load_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested").join("config.toml");

    let mut settings = StaticConfig::default();
    settings.device.backend = Backend::Simulated;
    settings.ec.poll_attempts = 321;
    lpcfanctl::config::write_config(&path, &settings, false)?;

    assert_eq!(StaticConfig::load(&path)?, settings);
    Ok(())
}

#[test]
fn test_binary_switches_simulated_fan() {
    let output = lpcfanctl(&["--no-config", "-b", "simulated", "-f", "json", "on"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["mode"], "high");
    assert_eq!(value["backend"], "simulated");
    assert_eq!(value["closed"], true);
    assert_eq!(value["released"], true);
}

#[test]
fn test_binary_set_normal_text_output() {
    let output = lpcfanctl(&["--no-config", "--backend", "simulated", "set", "normal"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Fan set to"));
    assert!(stdout.contains("normal"));
}

#[test]
fn test_binary_exits_nonzero_when_script_cannot_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    write_file(
        &path,
        "[device]\nbackend = \"script\"\n\n[script]\ninterpreter = \"/nonexistent/lpcfan-interpreter\"\npath = \"fancontroller.pl\"\n",
    );

    let output = lpcfanctl(&["--config", path.to_str().unwrap(), "-f", "json", "off"]);
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["failed_step"], FanStep::Script.to_string());
}

#[test]
fn test_binary_rejects_zero_poll_attempts() {
    let output = lpcfanctl(&["--no-config", "-b", "simulated", "--poll-attempts", "0", "on"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"));
}

#[test]
fn test_binary_config_path_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    let output = lpcfanctl(&["--config", path_str, "config", "path"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), path_str);

    let output = lpcfanctl(&[
        "--config", path_str, "-b", "simulated", "-f", "json", "config", "show",
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["device"]["backend"], "simulated");
    assert_eq!(value["ec"]["poll_attempts"], 20000);
}

#[test]
fn test_binary_config_path_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join("from-env.toml");
    let flag_path = dir.path().join("from-flag.toml");
    write_file(&env_path, "[device]\nbackend = \"simulated\"\n");

    // LPCFAN_CONFIG is used when no flag is given
    let output = lpcfanctl_with_config_env(&["config", "path"], Some(&env_path));
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        env_path.to_str().unwrap()
    );

    // and its contents are loaded
    let output = lpcfanctl_with_config_env(&["-f", "json", "config", "show"], Some(&env_path));
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["device"]["backend"], "simulated");

    // --config wins over LPCFAN_CONFIG
    let output = lpcfanctl_with_config_env(
        &["--config", flag_path.to_str().unwrap(), "config", "path"],
        Some(&env_path),
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        flag_path.to_str().unwrap()
    );

    // without either, the default path is used
    let output = lpcfanctl(&["--no-config", "config", "path"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        lpcfan_core::default_config_path().to_str().unwrap()
    );
}

#[test]
fn test_binary_config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    let output = lpcfanctl(&["--config", path_str, "-b", "simulated", "config", "init"]);
    assert!(output.status.success());
    let settings = StaticConfig::load(&path).unwrap();
    assert_eq!(settings.device.backend, Backend::Simulated);

    let output = lpcfanctl(&["--config", path_str, "config", "init"]);
    assert_eq!(output.status.code(), Some(1));

    let output = lpcfanctl(&["--config", path_str, "config", "init", "--force"]);
    assert!(output.status.success());
}
