//! Probe Tool Port - Throughput Measurement Interface
//!
//! The scrape use case only knows that "something" measures one
//! direction against a target and hands back a decoded result. The
//! iperf3 subprocess adapter implements it in production; tests plug
//! in mocks.

use async_trait::async_trait;
use tokio::time::Instant;

use crate::domain::{Direction, ProbeError, ProbeResult, Target};

/// Runs a single throughput measurement.
#[async_trait]
pub trait ProbeTool: Send + Sync + 'static {
  /// Measure `direction` against `target`, finishing before `deadline`.
  ///
  /// Implementations must stop any work they started once the deadline
  /// passes or the returned future is dropped. A deadline already in
  /// the past is reported as a normal [`ProbeError`].
  async fn run(
    &self,
    target: &Target,
    direction: Direction,
    deadline: Instant,
  ) -> Result<ProbeResult, ProbeError>;
}
