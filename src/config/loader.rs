//! Configuration Loader - File Loading, Overrides and Validation
//!
//! Handles loading the optional TOML file, layering CLI/env values on
//! top and validating the result with clear error messages.

use std::path::Path;

use anyhow::{Context, Result};

use super::{AppConfig, MAX_TIMEOUT_SECONDS};
use super::cli::Cli;

/// Build the effective configuration for this process.
///
/// # Errors
/// Returns detailed error if:
/// - The given config file can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
  let mut config = match &cli.config {
    Some(path) => load_file(path)?,
    None => AppConfig::default(),
  };

  cli.apply_to(&mut config);
  validate_config(&config)?;

  Ok(config)
}

/// Read and parse a TOML config file.
pub fn load_file(path: &Path) -> Result<AppConfig> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  load_from_str(&content)
    .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML config content.
pub fn load_from_str(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A `host:port` listen address with a usable port
/// - Positive timeout (at most a day) and transmit time
/// - Non-empty iperf3 binary and log filter
pub fn validate_config(config: &AppConfig) -> Result<()> {
  let listen = &config.exporter.listen;
  let (host, port) = listen
    .rsplit_once(':')
    .with_context(|| format!("exporter.listen must be host:port, got {listen:?}"))?;
  anyhow::ensure!(
    !host.is_empty(),
    "exporter.listen has an empty host: {listen:?}"
  );
  let port: u16 = port
    .parse()
    .with_context(|| format!("exporter.listen has an invalid port: {listen:?}"))?;
  anyhow::ensure!(port > 0, "exporter.listen port must not be 0");

  anyhow::ensure!(
    config.exporter.timeout_seconds > 0,
    "exporter.timeout_seconds must be positive"
  );
  anyhow::ensure!(
    config.exporter.timeout_seconds <= MAX_TIMEOUT_SECONDS,
    "exporter.timeout_seconds must be at most {MAX_TIMEOUT_SECONDS}, got {}",
    config.exporter.timeout_seconds
  );

  anyhow::ensure!(
    config.iperf3.time > 0,
    "iperf3.time must be positive"
  );
  anyhow::ensure!(
    !config.iperf3.binary.trim().is_empty(),
    "iperf3.binary must not be empty"
  );

  anyhow::ensure!(
    !config.log.level.trim().is_empty(),
    "log.level must not be empty"
  );

  Ok(())
}
