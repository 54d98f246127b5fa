//! HTTP adapter - axum router exposing `/probe`.

pub mod probe;
pub mod request_id;
pub mod router;

pub use router::{build_router, serve};
