//! Benchmark metrics ingester for storage chassis
//!
//! Sits at the end of a shell pipe behind a `swift-bench` run, echoes
//! the output through unchanged and posts one timestamped JSON document
//! per reading to an Elasticsearch-style metrics sink, so benchmark
//! rates land next to the chassis health dashboards.

pub mod bench;
pub mod config;
pub mod error;
pub mod ingest;
pub mod sink;

// Re-export commonly used items at crate root
pub use bench::{BenchSample, Method};
pub use config::Config;
pub use error::{BaybenchError, Result};
pub use ingest::SessionReport;
pub use sink::Sink;
