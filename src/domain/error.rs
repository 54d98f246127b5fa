//! Error types for target parsing and probe execution.
//!
//! Target errors are caller mistakes (HTTP 422); probe errors come from
//! the iperf3 dependency (HTTP 500). The HTTP mapping lives in the
//! adapter layer, not here.

use std::num::ParseIntError;
use std::process::ExitStatus;

use thiserror::Error;

use super::probe::Direction;

/// Rejected `target` query parameter.
#[derive(Debug, Error)]
pub enum TargetError {
    /// No host, or a zero port.
    #[error("empty target")]
    EmptyTarget,
    /// Port segment is not a valid port number.
    #[error("invalid port {port:?}: {source}")]
    InvalidPort {
        port: String,
        #[source]
        source: ParseIntError,
    },
    /// More than one `:`; host and port cannot be told apart.
    #[error("could not determine host and port from {0:?}")]
    AmbiguousTarget(String),
}

/// Why an iperf3 invocation did not produce output.
#[derive(Debug, Error)]
pub enum ExecutionCause {
    #[error("could not run iperf3: {0}")]
    Io(#[from] std::io::Error),
    #[error("iperf3 exited with {0}")]
    Exit(ExitStatus),
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// A single probe invocation failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not get {direction} metrics: {cause}")]
    ExecutionFailed {
        direction: Direction,
        #[source]
        cause: ExecutionCause,
    },
    #[error("could not decode {direction} result: {source}")]
    DecodeFailed {
        direction: Direction,
        #[source]
        source: serde_json::Error,
    },
}

impl ProbeError {
    /// Direction of the invocation that failed.
    pub fn direction(&self) -> Direction {
        match self {
            Self::ExecutionFailed { direction, .. } | Self::DecodeFailed { direction, .. } => {
                *direction
            }
        }
    }
}
