//! Shared fixtures for the integration tests
//!
//! - `events.jsonl`: one recorded run (3 tests, 1 failing, 1 slow)
//! - `existing_report.json`: a report left by an earlier shard

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use test_report_merge::{Report, RunStats, TestRecord};

/// Path to the recorded event stream
pub fn events_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/events.jsonl")
}

/// Path to the pre-existing report
pub fn existing_report_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/existing_report.json")
}

/// Load the pre-existing report
pub fn existing_report() -> Report {
    let json = fs::read_to_string(existing_report_path()).expect("Failed to read existing report");
    Report::from_json(&json).expect("Failed to parse existing report")
}

/// A report with `n` passing tests named `{prefix} {i}`
pub fn passing_report(prefix: &str, n: usize) -> Report {
    let records: Vec<TestRecord> = (0..n)
        .map(|i| TestRecord::new(i.to_string(), format!("{} {}", prefix, i)))
        .collect();
    Report {
        stats: RunStats::with_counts(1, n as u64, n as u64, 0),
        tests: records.clone(),
        passes: records,
        ..Report::default()
    }
}
