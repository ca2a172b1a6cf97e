//! The report document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::TestRecord;
use crate::stats::RunStats;

/// Complete structured outcome of one run, or of several merged runs.
///
/// `tests`, `failures` and `passes` are tracked independently; nothing
/// re-derives one from another.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    pub stats: RunStats,

    #[serde(default)]
    pub tests: Vec<TestRecord>,

    #[serde(default)]
    pub failures: Vec<TestRecord>,

    #[serde(default)]
    pub passes: Vec<TestRecord>,

    /// Top-level keys written by other producers, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Report {
    /// Serialize to pretty JSON (two-space indent)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
