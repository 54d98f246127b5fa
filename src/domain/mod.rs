//! Domain layer - probe targets, directions and iperf3 result shapes.
//!
//! Pure types with no I/O. The subprocess, metrics registry and HTTP
//! server all live in `crate::adapters`.

pub mod error;
pub mod probe;
pub mod target;

pub use error::{ExecutionCause, ProbeError, TargetError};
pub use probe::{Direction, ProbeResult};
pub use target::{DEFAULT_PORT, Target};
