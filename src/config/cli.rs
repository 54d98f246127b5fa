//! Command line surface.
//!
//! Every flag falls back to an `IPERF3EXPORTER_<SECTION>_<KEY>`
//! environment variable, so clap already resolves CLI over env. Unset
//! flags stay `None` and leave the file/default value untouched.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use super::{AppConfig, parse_timeout_seconds};

/// Prometheus exporter that runs iperf3 against `?target=` on every scrape.
#[derive(Debug, Default, Parser)]
#[command(name = "iperf3exporter", version, about)]
pub struct Cli {
  /// TOML config file.
  #[arg(short, long, env = "IPERF3EXPORTER_CONFIG")]
  pub config: Option<PathBuf>,

  /// Listen address (host:port).
  #[arg(long, env = "IPERF3EXPORTER_EXPORTER_LISTEN")]
  pub listen: Option<String>,

  /// Scraping timeout shared by the download and upload run (`60`, `90s`, `1m`).
  #[arg(
    long,
    value_name = "DURATION",
    env = "IPERF3EXPORTER_EXPORTER_TIMEOUT_SECONDS",
    value_parser = timeout_arg
  )]
  pub timeout: Option<u64>,

  /// Exporter process metrics.
  #[arg(
    long,
    env = "IPERF3EXPORTER_EXPORTER_PROCESS_METRICS",
    action = ArgAction::Set,
    num_args = 0..=1,
    default_missing_value = "true"
  )]
  pub process_metrics: Option<bool>,

  /// JSON log output.
  #[arg(
    long,
    env = "IPERF3EXPORTER_LOG_JSON",
    action = ArgAction::Set,
    num_args = 0..=1,
    default_missing_value = "true"
  )]
  pub log_json: Option<bool>,

  /// Colorful log output.
  #[arg(
    long,
    env = "IPERF3EXPORTER_LOG_COLORS",
    action = ArgAction::Set,
    num_args = 0..=1,
    default_missing_value = "true"
  )]
  pub log_colors: Option<bool>,

  /// Default log filter, overridden by RUST_LOG.
  #[arg(long, env = "IPERF3EXPORTER_LOG_LEVEL")]
  pub log_level: Option<String>,

  /// Time in seconds to transmit for.
  #[arg(long, value_name = "SECONDS", env = "IPERF3EXPORTER_IPERF3_TIME")]
  pub time: Option<u32>,

  /// iperf3 executable.
  #[arg(long, env = "IPERF3EXPORTER_IPERF3_BINARY")]
  pub iperf3_binary: Option<String>,
}

impl Cli {
  /// Overwrite `config` with every value given on the command line or env.
  pub fn apply_to(&self, config: &mut AppConfig) {
    if let Some(listen) = &self.listen {
      config.exporter.listen.clone_from(listen);
    }
    if let Some(timeout) = self.timeout {
      config.exporter.timeout_seconds = timeout;
    }
    if let Some(process_metrics) = self.process_metrics {
      config.exporter.process_metrics = process_metrics;
    }
    if let Some(json) = self.log_json {
      config.log.json = json;
    }
    if let Some(colors) = self.log_colors {
      config.log.colors = colors;
    }
    if let Some(level) = &self.log_level {
      config.log.level.clone_from(level);
    }
    if let Some(time) = self.time {
      config.iperf3.time = time;
    }
    if let Some(binary) = &self.iperf3_binary {
      config.iperf3.binary.clone_from(binary);
    }
  }
}

fn timeout_arg(raw: &str) -> Result<u64, String> {
  parse_timeout_seconds(raw)
    .ok_or_else(|| format!("invalid timeout {raw:?}, expected e.g. 60, 90s or 1m"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_flags_override_config() {
    let cli = Cli::try_parse_from([
      "iperf3exporter",
      "--listen",
      "0.0.0.0:9200",
      "--timeout",
      "30",
      "--log-json",
      "--process-metrics=false",
      "--time",
      "10",
    ])
    .unwrap();

    let mut config = AppConfig::default();
    cli.apply_to(&mut config);

    assert_eq!(config.exporter.listen, "0.0.0.0:9200");
    assert_eq!(config.exporter.timeout_seconds, 30);
    assert!(!config.exporter.process_metrics);
    assert!(config.log.json);
    assert_eq!(config.iperf3.time, 10);
  }

  #[test]
  fn test_unset_flags_keep_config() {
    let mut config = AppConfig::default();
    config.iperf3.binary = "/opt/iperf3/bin/iperf3".to_string();

    Cli::default().apply_to(&mut config);

    assert_eq!(config.iperf3.binary, "/opt/iperf3/bin/iperf3");
    assert_eq!(config.exporter.listen, "127.0.0.1:9119");
  }

  #[test]
  fn test_timeout_flag_accepts_durations() {
    let cli = Cli::try_parse_from(["iperf3exporter", "--timeout", "2m"]).unwrap();
    assert_eq!(cli.timeout, Some(120));

    assert!(Cli::try_parse_from(["iperf3exporter", "--timeout", "500ms"]).is_err());
  }

  #[test]
  fn test_version_flags() {
    for flag in ["-V", "--version"] {
      let err = Cli::try_parse_from(["iperf3exporter", flag]).unwrap_err();
      assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion, "{flag}");
    }
  }

  #[test]
  fn test_cli_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }
}
