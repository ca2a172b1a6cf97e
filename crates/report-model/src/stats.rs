//! Run statistics block (`stats`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metric::Metric;

/// Summary counters of a run.
///
/// Every field is optional on input. `passPercentage` and
/// `failingPercentage` are only present once a report has been merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suites: Option<Metric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Metric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passes: Option<Metric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<Metric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<Metric>,

    /// Run start, normally an ISO-8601 string. Kept as whatever JSON value
    /// the writer used so foreign reports still load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Value>,

    /// Run end; same representation as `start`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Value>,

    /// Wall-clock duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Metric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_percentage: Option<Metric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failing_percentage: Option<Metric>,

    /// Keys written by other producers, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunStats {
    /// Stats with the four summed counters set and everything else absent.
    pub fn with_counts(suites: u64, tests: u64, passes: u64, failures: u64) -> Self {
        Self {
            suites: Some(suites.into()),
            tests: Some(tests.into()),
            passes: Some(passes.into()),
            failures: Some(failures.into()),
            ..Self::default()
        }
    }

    /// Set the run duration in milliseconds.
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms.into());
        self
    }

    /// Set the run end timestamp.
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(Value::String(end.into()));
        self
    }

    /// Set the run start timestamp.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(Value::String(start.into()));
        self
    }

    /// `start` when it is a string.
    pub fn start_str(&self) -> Option<&str> {
        self.start.as_ref().and_then(Value::as_str)
    }

    /// `end` when it is a string.
    pub fn end_str(&self) -> Option<&str> {
        self.end.as_ref().and_then(Value::as_str)
    }

    /// Generate a human-readable summary
    pub fn human_summary(&self) -> String {
        let count = |m: Option<Metric>| m.map_or_else(|| "0".to_string(), |m| m.to_string());
        let mut summary = format!(
            "{} tests in {} suites: {} passing, {} failing",
            count(self.tests),
            count(self.suites),
            count(self.passes),
            count(self.failures),
        );
        if let Some(pending) = self.pending {
            summary.push_str(&format!(", {} pending", pending));
        }
        if let Some(duration) = self.duration {
            summary.push_str(&format!(" ({} ms)", duration));
        }
        summary
    }
}
