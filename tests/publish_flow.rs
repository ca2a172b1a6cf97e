//! Publishing reports to the filesystem.

mod fixtures;

use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use test_report_merge::{
    publish, FsReportSink, Metric, PublishError, PublishOutcome, Report, ReportSink, RunStats,
};

fn sink() -> FsReportSink<Vec<u8>> {
    FsReportSink::with_fallback(Vec::new())
}

#[test]
fn test_no_destination_writes_json_to_fallback() {
    let mut sink = sink();
    let report = fixtures::passing_report("solo", 2);

    let outcome = publish(&mut sink, None, &report).unwrap();
    assert_eq!(outcome, PublishOutcome::Emitted);

    let emitted = String::from_utf8(sink.into_fallback()).unwrap();
    assert_eq!(emitted, report.to_json().unwrap());
    assert_eq!(Report::from_json(&emitted).unwrap(), report);
}

#[test]
fn test_missing_destination_is_created_in_nested_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports/ci/report.json");
    let mut sink = sink();
    let report = fixtures::passing_report("first", 3);

    let outcome = publish(&mut sink, Some(&path), &report).unwrap();
    assert_eq!(outcome, PublishOutcome::Created);

    let stored = sink.load(&path).unwrap();
    assert_eq!(stored, report);
    // A fresh report is stored as-is: no percentages yet
    assert!(stored.stats.pass_percentage.is_none());
    assert!(sink.into_fallback().is_empty());
}

#[test]
fn test_existing_report_is_merged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    fs::copy(fixtures::existing_report_path(), &path).unwrap();

    let mut sink = sink();
    let mut incoming = fixtures::passing_report("second shard", 1);
    incoming.stats = incoming.stats.with_duration(250.0).with_end("2024-05-01T09:05:00.000Z");

    let outcome = publish(&mut sink, Some(&path), &incoming).unwrap();
    assert_eq!(outcome, PublishOutcome::Merged);

    let merged = sink.load(&path).unwrap();
    assert_eq!(merged.stats.suites, Some(Metric::new(2.0)));
    assert_eq!(merged.stats.tests, Some(Metric::new(3.0)));
    assert_eq!(merged.stats.passes, Some(Metric::new(3.0)));
    assert_eq!(merged.stats.failures, Some(Metric::new(0.0)));
    assert_eq!(merged.stats.duration, Some(Metric::new(1250.0)));
    assert_eq!(merged.stats.pass_percentage, Some(Metric::new(100.0)));
    assert_eq!(merged.stats.failing_percentage, Some(Metric::new(0.0)));
    assert_eq!(merged.stats.start_str(), Some("2024-05-01T09:00:00.000Z"));
    assert_eq!(merged.stats.end_str(), Some("2024-05-01T09:05:00.000Z"));

    assert_eq!(merged.tests.len(), 3);
    assert_eq!(merged.tests[2].full_title, "second shard 0");
    assert_eq!(merged.passes.len(), 3);
    assert!(merged.failures.is_empty());

    // Unknown top-level keys from the existing document survive
    assert_eq!(merged.extra["meta"]["shard"], "1/2");
}

#[test]
fn test_merged_file_encodes_percentages_as_numbers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let mut sink = sink();
    let report = fixtures::passing_report("p", 2);

    publish(&mut sink, Some(&path), &report).unwrap();
    publish(&mut sink, Some(&path), &report).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["stats"]["tests"], 4);
    assert_eq!(raw["stats"]["passPercentage"], 100);
    assert_eq!(raw["stats"]["failingPercentage"], 0);
}

#[test]
fn test_zero_test_merge_writes_null_percentages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let mut sink = sink();
    let empty = Report {
        stats: RunStats::with_counts(0, 0, 0, 0),
        ..Report::default()
    };

    publish(&mut sink, Some(&path), &empty).unwrap();
    publish(&mut sink, Some(&path), &empty).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["stats"]["passPercentage"].is_null());
    assert!(raw["stats"]["failingPercentage"].is_null());
}

#[test]
fn test_unparsable_destination_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let garbage = "{ \"stats\": { \"tests\": 1, ";
    fs::write(&path, garbage).unwrap();

    let mut sink = sink();
    let result = publish(&mut sink, Some(&path), &fixtures::passing_report("x", 1));

    match result {
        Err(PublishError::Load { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected load error, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), garbage);
    assert!(sink.into_fallback().is_empty());
}

#[test]
fn test_document_without_stats_is_not_merged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    fs::write(&path, "{\"tests\": []}").unwrap();

    let mut sink = sink();
    let result = publish(&mut sink, Some(&path), &fixtures::passing_report("x", 1));

    assert!(matches!(result, Err(PublishError::Load { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"tests\": []}");
}

#[test]
fn test_unwritable_destination_falls_back() {
    let dir = TempDir::new().unwrap();
    // A regular file where a parent directory is needed
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let path = blocker.join("report.json");

    let mut sink = sink();
    let report = fixtures::passing_report("y", 1);
    let outcome = publish(&mut sink, Some(&path), &report).unwrap();

    assert_eq!(outcome, PublishOutcome::FellBack);
    let emitted = String::from_utf8(sink.into_fallback()).unwrap();
    assert_eq!(Report::from_json(&emitted).unwrap(), report);
}

#[test]
fn test_existing_report_with_numeric_timestamps_is_merged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    fs::write(
        &path,
        r#"{"stats": {"suites": 1, "tests": 1, "passes": 1, "failures": 0, "start": 1714557600000, "end": 1714557601000}}"#,
    )
    .unwrap();

    let mut sink = sink();
    let mut incoming = fixtures::passing_report("next", 1);
    incoming.stats = incoming.stats.with_end("2024-05-01T10:05:00.000Z");

    let outcome = publish(&mut sink, Some(&path), &incoming).unwrap();
    assert_eq!(outcome, PublishOutcome::Merged);

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["stats"]["tests"], 2);
    assert_eq!(raw["stats"]["start"], 1714557600000u64);
    assert_eq!(raw["stats"]["end"], "2024-05-01T10:05:00.000Z");
}
