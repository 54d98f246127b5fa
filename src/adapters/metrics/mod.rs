//! Metrics Adapters
//!
//! Prometheus gauges for iperf3 results and their text exposition.

pub mod registry;

pub use registry::MetricsRegistry;
