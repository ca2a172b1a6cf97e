//! Test Report Merge
//!
//! Captures the outcome of a test run as a JSON report and, when a report
//! already exists at the destination, merges the new run into it so that
//! sharded or repeated runs add up to one cumulative report.

pub mod collector;
pub mod config;
pub mod logging;
pub mod merge;
pub mod normalize;
pub mod sink;

pub use collector::{RunCollector, RunEvent, RunRecorder, StatsTracker};
pub use config::{ConfigError, ConfigLayer, ReporterConfig};
pub use merge::{merge_reports, merge_stats, merge_values};
pub use normalize::{ErrorFields, Normalizer, RawValue, SeenScope, TestCase, ThrownValue};
pub use report_model::{Metric, Report, RunStats, Speed, TestRecord};
pub use sink::{publish, FsReportSink, MemoryReportSink, PublishError, PublishOutcome, ReportSink, SinkError};
