//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies and exposes the use cases over HTTP.
//!
//! Adapter categories:
//! - `http`: axum router for `/probe` plus request-id middleware
//! - `iperf`: iperf3 subprocess runner (`ProbeTool`)
//! - `metrics`: Prometheus gauge registry and text exposition

pub mod http;
pub mod iperf;
pub mod metrics;
