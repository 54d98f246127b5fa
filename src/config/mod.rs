//! Configuration Module - TOML-based Exporter Configuration
//!
//! Values come from four layers, highest precedence first: CLI flags,
//! `IPERF3EXPORTER_*` environment variables, an optional TOML file and
//! the built-in defaults below. Every field has a serde default, so a
//! partial file (or no file at all) is valid.

pub mod cli;
pub mod loader;

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Upper bound for `exporter.timeout_seconds` (one day).
pub const MAX_TIMEOUT_SECONDS: u64 = 86_400;

/// Top-level exporter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
  /// HTTP listener and scrape behaviour.
  #[serde(default)]
  pub exporter: ExporterConfig,
  /// Log output format.
  #[serde(default)]
  pub log: LogConfig,
  /// iperf3 invocation parameters.
  #[serde(default)]
  pub iperf3: Iperf3Config,
}

/// HTTP listener and scrape configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
  /// `host:port` to listen on.
  #[serde(default = "default_listen")]
  pub listen: String,
  /// Budget for both iperf3 runs of one scrape (seconds). Also read
  /// from `timeout`, as an integer or a string such as `"1m"`.
  #[serde(
    default = "default_timeout",
    alias = "timeout",
    deserialize_with = "deserialize_timeout"
  )]
  pub timeout_seconds: u64,
  /// Append process metrics (fds, memory, cpu) to every scrape.
  #[serde(default = "default_true")]
  pub process_metrics: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
  /// Emit JSON lines instead of human-readable output.
  #[serde(default)]
  pub json: bool,
  /// ANSI colors for the human-readable format.
  #[serde(default = "default_true")]
  pub colors: bool,
  /// Default filter (trace, debug, info, warn, error). `RUST_LOG` wins.
  #[serde(default = "default_log_level")]
  pub level: String,
}

/// iperf3 invocation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Iperf3Config {
  /// Seconds to transmit for (`-t`).
  #[serde(default = "default_time")]
  pub time: u32,
  /// Executable name or path.
  #[serde(default = "default_binary")]
  pub binary: String,
}

impl ExporterConfig {
  /// Per-scrape timeout as a [`Duration`].
  pub const fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_seconds)
  }
}

impl Default for ExporterConfig {
  fn default() -> Self {
    Self {
      listen: default_listen(),
      timeout_seconds: default_timeout(),
      process_metrics: true,
    }
  }
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      json: false,
      colors: true,
      level: default_log_level(),
    }
  }
}

impl Default for Iperf3Config {
  fn default() -> Self {
    Self {
      time: default_time(),
      binary: default_binary(),
    }
  }
}

/// Whole seconds from `"90"`, `"90s"`, `"2m"` or `"1h"`.
///
/// Sub-second values such as `"500ms"` are rejected rather than rounded.
pub fn parse_timeout_seconds(raw: &str) -> Option<u64> {
  let raw = raw.trim();
  let (digits, scale) = if let Some(hours) = raw.strip_suffix('h') {
    (hours, 3_600)
  } else if let Some(minutes) = raw.strip_suffix('m') {
    (minutes, 60)
  } else {
    (raw.strip_suffix('s').unwrap_or(raw), 1)
  };
  digits.parse::<u64>().ok()?.checked_mul(scale)
}

fn deserialize_timeout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Seconds(u64),
    Text(String),
  }

  match Raw::deserialize(deserializer)? {
    Raw::Seconds(seconds) => Ok(seconds),
    Raw::Text(text) => parse_timeout_seconds(&text)
      .ok_or_else(|| serde::de::Error::custom(format!("invalid timeout {text:?}"))),
  }
}

// Default value functions for serde

fn default_listen() -> String {
  "127.0.0.1:9119".to_string()
}

fn default_timeout() -> u64 {
  60
}

fn default_true() -> bool {
  true
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_time() -> u32 {
  5
}

fn default_binary() -> String {
  "iperf3".to_string()
}
