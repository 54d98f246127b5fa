//! Probe Scrape - One `/probe` Request End to End
//!
//! Parse target → download probe → record → upload probe → record →
//! render. Both probes share one deadline taken at the start of the
//! scrape, and run strictly one after the other so a scrape never has
//! more than one iperf3 child alive. A failed step ends the scrape: no
//! partial body is rendered, and the upload probe is never started if
//! the download probe failed. Gauges already recorded stay in the
//! registry for the next scrape.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, instrument};

use crate::adapters::metrics::MetricsRegistry;
use crate::domain::{Direction, ProbeError, Target, TargetError};
use crate::ports::ProbeTool;

/// Stand-in deadline for budgets too large for [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Why a scrape produced no metrics.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("could not find target in url params")]
    MissingTarget,
    #[error("could not determine target: {0}")]
    Target(#[from] TargetError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error("could not encode metrics: {0}")]
    Render(#[from] prometheus::Error),
}

impl ScrapeError {
    /// Whether the caller sent an unusable target.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingTarget | Self::Target(_))
    }
}

/// Runs scrapes against a probe tool and a shared metrics registry.
pub struct ProbeScraper {
    /// Measurement backend (iperf3 in production).
    tool: Arc<dyn ProbeTool>,
    /// Gauges shared by every scrape.
    metrics: Arc<MetricsRegistry>,
    /// Budget for both probes together.
    timeout: Duration,
    /// Append process metrics to the rendered body.
    process_metrics: bool,
}

impl ProbeScraper {
    /// Create a new scraper.
    pub fn new(
        tool: Arc<dyn ProbeTool>,
        metrics: Arc<MetricsRegistry>,
        timeout: Duration,
        process_metrics: bool,
    ) -> Self {
        Self {
            tool,
            metrics,
            timeout,
            process_metrics,
        }
    }

    /// Registry the scraper writes into.
    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Run a full scrape for the raw `target` query value.
    ///
    /// # Errors
    /// [`ScrapeError::MissingTarget`] / [`ScrapeError::Target`] for bad
    /// input, [`ScrapeError::Probe`] when either iperf3 run fails.
    #[instrument(skip(self))]
    pub async fn scrape(&self, raw_target: Option<&str>) -> Result<Vec<u8>, ScrapeError> {
        let raw = match raw_target {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                error!("could not find target in url params");
                return Err(ScrapeError::MissingTarget);
            }
        };

        let target = Target::parse(raw).inspect_err(|e| {
            error!(error = %e, "could not determine target");
        })?;

        let deadline = deadline_after(self.timeout);

        for direction in [Direction::Download, Direction::Upload] {
            info!(probe_target = %target, %direction, "getting {direction} metrics");

            let result = self
                .tool
                .run(&target, direction, deadline)
                .await
                .inspect_err(|e| {
                    error!(probe_target = %target, %direction, error = %e, "probe failed");
                })?;

            self.metrics.record(direction, &result);
        }

        info!(probe_target = %target, "done scraping");

        Ok(self.metrics.render(self.process_metrics)?)
    }
}

/// `now + timeout`, saturating to [`FAR_FUTURE`] instead of overflowing.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}
