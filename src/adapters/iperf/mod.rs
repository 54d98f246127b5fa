//! iperf3 adapter - implements the `ProbeTool` port with a subprocess.

pub mod runner;

pub use runner::Iperf3Runner;
