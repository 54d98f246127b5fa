//! iperf3 Subprocess Runner - ProbeTool Adapter
//!
//! Spawns `iperf3 -J -c <host> -p <port> -t <time> [-R]`, captures
//! stdout and stderr into separate buffers and decodes stdout as the
//! iperf3 JSON report. The child is bound to the scrape deadline:
//! when the deadline passes, or the scrape future is dropped because
//! the client went away, the process is killed rather than abandoned.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::Iperf3Config;
use crate::domain::{Direction, ExecutionCause, ProbeError, ProbeResult, Target};
use crate::ports::ProbeTool;

/// Runs the iperf3 client as a child process.
#[derive(Debug, Clone)]
pub struct Iperf3Runner {
    /// Executable name or path.
    binary: String,
    /// Transmit duration in seconds (`-t`).
    time: u32,
}

impl Iperf3Runner {
    /// Create a runner from the `[iperf3]` config section.
    pub fn new(config: &Iperf3Config) -> Self {
        Self {
            binary: config.binary.clone(),
            time: config.time,
        }
    }

    /// Arguments for one invocation, in the order iperf3 receives them.
    pub fn args(&self, target: &Target, direction: Direction) -> Vec<String> {
        let mut args = vec![
            "-J".to_string(),
            "-c".to_string(),
            target.host.clone(),
            "-p".to_string(),
            target.port.to_string(),
            "-t".to_string(),
            self.time.to_string(),
        ];

        if direction.is_reverse() {
            args.push("-R".to_string());
        }

        args
    }

    fn command(&self, target: &Target, direction: Direction) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.args(target, direction))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl ProbeTool for Iperf3Runner {
    #[instrument(skip_all, fields(probe_target = %target, %direction))]
    async fn run(
        &self,
        target: &Target,
        direction: Direction,
        deadline: Instant,
    ) -> Result<ProbeResult, ProbeError> {
        let failed = |cause: ExecutionCause| ProbeError::ExecutionFailed { direction, cause };

        let mut cmd = self.command(target, direction);
        debug!(cmd = ?cmd.as_std(), "created command");

        let child = cmd.spawn().map_err(|e| failed(e.into()))?;

        // Dropping the wait future on timeout drops the child, and
        // kill_on_drop sends SIGKILL; the runtime reaps it afterwards.
        let output = match tokio::time::timeout_at(deadline, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(failed(e.into())),
            Err(_) => {
                warn!("iperf3 killed after deadline");
                return Err(failed(ExecutionCause::DeadlineExceeded));
            }
        };

        if !output.status.success() {
            debug!(
                stdout = %String::from_utf8_lossy(&output.stdout),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "output from failed run"
            );
            return Err(failed(ExecutionCause::Exit(output.status)));
        }

        ProbeResult::from_json(&output.stdout).map_err(|source| {
            debug!(
                stdout = %String::from_utf8_lossy(&output.stdout),
                "undecodable iperf3 output"
            );
            ProbeError::DecodeFailed { direction, source }
        })
    }
}
