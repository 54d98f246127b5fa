//! Probe directions and the subset of iperf3's `-J` output we consume.

use std::fmt;

use serde::Deserialize;

/// Which way traffic flows during one iperf3 run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Server sends to us (`-R`, reverse mode).
    Download,
    /// We send to the server (iperf3's normal mode).
    Upload,
}

impl Direction {
    /// Whether iperf3 must run in reverse mode.
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Download)
    }

    /// Lowercase label used in metric names and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded iperf3 JSON result for one invocation.
///
/// Only `end.sum_sent` and `end.sum_received` are read; every other
/// key iperf3 emits is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeResult {
    pub end: ProbeSummary,
}

/// The `end` section of an iperf3 report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeSummary {
    pub sum_sent: SentStream,
    pub sum_received: ReceivedStream,
}

/// Aggregate for the sending side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentStream {
    pub seconds: f64,
    pub bytes: f64,
    pub bits_per_second: f64,
    /// Absent for UDP runs.
    #[serde(default)]
    pub retransmits: i64,
}

/// Aggregate for the receiving side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReceivedStream {
    pub seconds: f64,
    pub bytes: f64,
    pub bits_per_second: f64,
}

impl ProbeResult {
    /// Decode captured iperf3 stdout.
    pub fn from_json(raw: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(raw)
    }
}
