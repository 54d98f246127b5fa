//! iperf3 Exporter - Entry Point
//!
//! Wiring sequence:
//! 1. Parse CLI flags (with IPERF3EXPORTER_* env fallback)
//! 2. Load optional config file, apply overrides, validate
//! 3. Init tracing (JSON or human-readable)
//! 4. Create the metrics registry and iperf3 runner
//! 5. Bind the listener and serve /probe
//! 6. Wait for SIGINT/SIGTERM → graceful shutdown
//!
//! Any startup failure returns an error from `main`, which exits non-zero.

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use iperf3_exporter::adapters::http::{build_router, serve};
use iperf3_exporter::adapters::iperf::Iperf3Runner;
use iperf3_exporter::adapters::metrics::MetricsRegistry;
use iperf3_exporter::config::cli::Cli;
use iperf3_exporter::config::{LogConfig, loader};
use iperf3_exporter::ports::ProbeTool;
use iperf3_exporter::usecases::ProbeScraper;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. CLI + env ────────────────────────────────────────
    let cli = Cli::parse();

    // ── 2. Configuration ────────────────────────────────────
    let config = loader::load_config(&cli).context("Failed to load configuration")?;

    // ── 3. Logging ──────────────────────────────────────────
    init_tracing(&config.log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.exporter.listen,
        timeout_seconds = config.exporter.timeout_seconds,
        process_metrics = config.exporter.process_metrics,
        iperf3_time = config.iperf3.time,
        iperf3_binary = %config.iperf3.binary,
        "Starting iperf3 exporter"
    );

    // ── 4. Registry, probe tool, scrape use case ────────────
    let metrics = Arc::new(MetricsRegistry::new().context("Failed to register metrics")?);
    let tool: Arc<dyn ProbeTool> = Arc::new(Iperf3Runner::new(&config.iperf3));
    let scraper = Arc::new(ProbeScraper::new(
        tool,
        metrics,
        config.exporter.timeout(),
        config.exporter.process_metrics,
    ));

    // ── 5. Listener ─────────────────────────────────────────
    let listener = TcpListener::bind(&config.exporter.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.exporter.listen))?;

    // ── 6. Serve until SIGINT/SIGTERM ───────────────────────
    serve(listener, build_router(scraper), shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("goodbye");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log.level`.
fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true);

    if log.json {
        builder.json().init();
    } else {
        builder.with_ansi(log.colors).init();
    }
}

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("SIGINT received, initiating graceful shutdown"),
        () = terminate => info!("SIGTERM received, initiating graceful shutdown"),
    }
}
