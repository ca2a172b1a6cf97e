//! Run statistics derived from lifecycle events.

use chrono::{DateTime, SecondsFormat, Utc};
use report_model::{Metric, RunStats};
use serde_json::Value;

use super::events::RunEvent;

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Counts suites, tests and outcomes as events arrive.
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    suites: u64,
    tests: u64,
    passes: u64,
    pending: u64,
    failures: u64,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe an event at the current time.
    pub fn observe(&mut self, event: &RunEvent) {
        self.observe_at(event, Utc::now());
    }

    /// Observe an event at a given time.
    pub fn observe_at(&mut self, event: &RunEvent, now: DateTime<Utc>) {
        match event {
            RunEvent::RunBegin => self.start = Some(now),
            RunEvent::SuiteBegin { root, .. } => {
                if !root {
                    self.suites += 1;
                }
            }
            RunEvent::Pass { .. } => self.passes += 1,
            RunEvent::Fail { .. } => self.failures += 1,
            RunEvent::Pending { .. } => self.pending += 1,
            RunEvent::TestEnd { .. } => self.tests += 1,
            RunEvent::RunEnd => self.end = Some(now),
            RunEvent::SuiteEnd
            | RunEvent::TestBegin { .. }
            | RunEvent::Hook
            | RunEvent::Retry { .. } => {}
        }
    }

    /// Snapshot the counters. `duration` is only set once both ends are known.
    pub fn stats(&self) -> RunStats {
        let duration = match (self.start, self.end) {
            (Some(start), Some(end)) => Some(Metric::new((end - start).num_milliseconds() as f64)),
            _ => None,
        };
        RunStats {
            suites: Some(self.suites.into()),
            tests: Some(self.tests.into()),
            passes: Some(self.passes.into()),
            pending: Some(self.pending.into()),
            failures: Some(self.failures.into()),
            start: self.start.map(|at| Value::String(format_timestamp(at))),
            end: self.end.map(|at| Value::String(format_timestamp(at))),
            duration,
            ..RunStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::TestCase;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_714_557_600_000 + ms).unwrap()
    }

    #[test]
    fn test_counts_and_timing() {
        let test = TestCase::new("t", "s t");
        let mut tracker = StatsTracker::new();

        tracker.observe_at(&RunEvent::RunBegin, at(0));
        tracker.observe_at(&RunEvent::SuiteBegin { title: String::new(), root: true }, at(1));
        tracker.observe_at(&RunEvent::SuiteBegin { title: "s".into(), root: false }, at(1));
        tracker.observe_at(&RunEvent::Pass { test: test.clone() }, at(2));
        tracker.observe_at(&RunEvent::TestEnd { test: test.clone() }, at(2));
        tracker.observe_at(&RunEvent::Fail { test: test.clone(), err: None }, at(3));
        tracker.observe_at(&RunEvent::TestEnd { test: test.clone() }, at(3));
        tracker.observe_at(&RunEvent::Pending { test: test.clone() }, at(4));
        tracker.observe_at(&RunEvent::TestEnd { test }, at(4));
        tracker.observe_at(&RunEvent::RunEnd, at(42));

        let stats = tracker.stats();
        assert_eq!(stats, RunStats {
            pending: Some(Metric::new(1.0)),
            duration: Some(Metric::new(42.0)),
            ..RunStats::with_counts(1, 3, 1, 1)
                .with_start("2024-05-01T10:00:00.000Z")
                .with_end("2024-05-01T10:00:00.042Z")
        });
    }

    #[test]
    fn test_no_duration_before_end() {
        let mut tracker = StatsTracker::new();
        tracker.observe_at(&RunEvent::RunBegin, at(0));
        let stats = tracker.stats();
        assert!(stats.end.is_none());
        assert!(stats.duration.is_none());
    }
}
