//! Run collection
//!
//! Accumulates normalized records while a run is in progress and freezes
//! them into a [`Report`] when the run ends.
//!
//! ## Ownership
//!
//! Each run owns one [`RunCollector`]. Ending the run consumes it, so a
//! report cannot be extended after it has been produced and two runs never
//! share sequences.

mod events;
mod recorder;
mod tracker;

pub use events::{read_events, EventError, RunEvent};
pub use recorder::RunRecorder;
pub use tracker::{format_timestamp, StatsTracker};

use report_model::{Report, RunStats, TestRecord};
use serde_json::Map;

use crate::normalize::{Normalizer, TestCase};

/// Accumulates the three record sequences of one run.
///
/// Records are appended in emission order with no reordering or
/// de-duplication; a retried test appears once per attempt.
#[derive(Debug, Default)]
pub struct RunCollector {
    normalizer: Normalizer,
    tests: Vec<TestRecord>,
    passes: Vec<TestRecord>,
    failures: Vec<TestRecord>,
}

impl RunCollector {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            ..Self::default()
        }
    }

    /// A test finished, whatever its outcome.
    pub fn on_test_end(&mut self, test: &TestCase) {
        tracing::debug!(full_title = %test.full_title, "test end");
        self.tests.push(self.normalizer.normalize(test));
    }

    pub fn on_test_pass(&mut self, test: &TestCase) {
        tracing::debug!(full_title = %test.full_title, "test passed");
        self.passes.push(self.normalizer.normalize(test));
    }

    pub fn on_test_fail(&mut self, test: &TestCase) {
        tracing::debug!(full_title = %test.full_title, "test failed");
        self.failures.push(self.normalizer.normalize(test));
    }

    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Build the report for the run, taking `stats` verbatim.
    pub fn on_run_end(self, stats: RunStats) -> Report {
        tracing::debug!(
            tests = self.tests.len(),
            passes = self.passes.len(),
            failures = self.failures.len(),
            "run end"
        );
        Report {
            stats,
            tests: self.tests,
            failures: self.failures,
            passes: self.passes,
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{ErrorFields, SeenScope};
    use serde_json::json;

    #[test]
    fn test_sequences_keep_emission_order() {
        let mut collector = RunCollector::default();
        let a = TestCase::new("a", "s a");
        let b = TestCase::new("b", "s b");

        collector.on_test_pass(&a);
        collector.on_test_end(&a);
        collector.on_test_fail(&b);
        collector.on_test_end(&b);

        let report = collector.on_run_end(RunStats::default());
        let titles: Vec<&str> = report.tests.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(report.passes.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].title, "b");
    }

    #[test]
    fn test_retried_test_appears_per_attempt() {
        let mut collector = RunCollector::default();
        let mut attempt = TestCase::new("flaky", "s flaky").with_err(ErrorFields::new("boom"));
        collector.on_test_fail(&attempt);
        collector.on_test_end(&attempt);

        attempt.current_retry = 1;
        attempt.err = None;
        collector.on_test_pass(&attempt);
        collector.on_test_end(&attempt);

        assert_eq!(collector.test_count(), 2);
        let report = collector.on_run_end(RunStats::default());
        assert_eq!(report.tests[0].current_retry, 0);
        assert_eq!(report.tests[0].err, json!({"message": "boom"}));
        assert_eq!(report.tests[1].current_retry, 1);
        assert_eq!(report.tests[1].err, json!({}));
    }

    #[test]
    fn test_stats_taken_verbatim() {
        let mut stats = RunStats::with_counts(3, 7, 5, 2).with_end("2024-05-01T10:00:00.000Z");
        stats.extra.insert("custom".to_string(), json!("kept"));

        let report = RunCollector::default().on_run_end(stats.clone());
        assert_eq!(report.stats, stats);
    }

    #[test]
    fn test_empty_run() {
        let report = RunCollector::default().on_run_end(RunStats::with_counts(0, 0, 0, 0));
        assert!(report.tests.is_empty());
        assert!(report.passes.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_uses_configured_scope() {
        let shared = crate::normalize::RawValue::object();
        let err = ErrorFields::new("m")
            .with_property("a", shared.clone())
            .with_property("b", shared);
        let test = TestCase::new("t", "t").with_err(err);

        let mut collector = RunCollector::new(Normalizer::new(SeenScope::Ancestors));
        collector.on_test_fail(&test);
        let report = collector.on_run_end(RunStats::default());
        assert_eq!(report.failures[0].err["b"], json!({}));
    }
}
