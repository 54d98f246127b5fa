//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use case layer requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ProbeTool`: one throughput measurement (iperf3 in production)

pub mod probe_tool;

pub use probe_tool::ProbeTool;
