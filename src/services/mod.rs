//! Service modules for external collaborators.
//!
//! Network access sits behind traits here so the pipeline can run against
//! canned data in tests.

pub mod fetch;

pub use fetch::{Fetch, HttpFetcher, MemoryFetcher};
