//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces.
//!
//! Use cases:
//! - `ProbeScraper`: one `/probe` request, download then upload

pub mod scrape;

pub use scrape::{ProbeScraper, ScrapeError};
