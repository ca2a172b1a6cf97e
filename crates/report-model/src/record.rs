//! Per-test records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metric::Metric;

/// Coarse duration classification of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    Fast,
    Medium,
    Slow,
}

impl Speed {
    /// Classify a duration against a slow threshold.
    ///
    /// Above the threshold is slow, above half of it is medium.
    pub fn classify(duration_ms: f64, slow_ms: f64) -> Speed {
        let medium_ms = slow_ms / 2.0;
        if duration_ms > slow_ms {
            Speed::Slow
        } else if duration_ms > medium_ms {
            Speed::Medium
        } else {
            Speed::Fast
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Medium => "medium",
            Speed::Slow => "slow",
        }
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Outcome of one test execution as stored in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    /// Test title
    #[serde(default)]
    pub title: String,

    /// Title prefixed by the titles of all enclosing suites
    #[serde(default)]
    pub full_title: String,

    /// Source file of the test, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Wall-clock duration in milliseconds (absent for pending tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Metric>,

    /// Number of attempts before this one
    #[serde(default)]
    pub current_retry: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Speed>,

    /// Normalized error field bag; `{}` when the test did not fail
    #[serde(default = "empty_object")]
    pub err: Value,

    /// Fields written by other producers, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TestRecord {
    /// Create a record with no error and no optional fields.
    pub fn new(title: impl Into<String>, full_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            full_title: full_title.into(),
            file: None,
            duration: None,
            current_retry: 0,
            speed: None,
            err: empty_object(),
            extra: Map::new(),
        }
    }

    /// Whether the record carries a non-empty error.
    pub fn has_error(&self) -> bool {
        match &self.err {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        }
    }
}
