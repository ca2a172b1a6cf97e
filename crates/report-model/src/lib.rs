//! Test Report Model
//!
//! Defines the JSON document written for a test run and read back when a
//! later run is merged into it.

pub mod metric;
pub mod record;
pub mod report;
pub mod stats;

pub use metric::Metric;
pub use record::{Speed, TestRecord};
pub use report::Report;
pub use stats::RunStats;

/// Default threshold (ms) above which a test counts as slow.
pub const DEFAULT_SLOW_MS: f64 = 75.0;
