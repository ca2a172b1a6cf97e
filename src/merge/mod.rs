//! Report merge
//!
//! Reconciles an existing cumulative report with the report of a new run.
//!
//! Rules, applied per key:
//! - `stats`: counters and duration summed, percentages derived, `end`
//!   taken from the incoming side
//! - Arrays on both sides: concatenated, base first (no de-duplication)
//! - Objects on both sides: merged recursively
//! - Anything else, or a key only in the incoming side: incoming wins
//! - Keys only in the base side: kept
//!
//! Merging is not idempotent: merging a report with itself doubles every
//! counter and sequence.

mod stats;

pub use stats::{
    failures_over_tests, merge_stats, passes_over_tests, tests_over_passes, PercentageFormula,
    FAILING_PERCENTAGE, PASS_PERCENTAGE,
};

use report_model::{Report, RunStats, TestRecord};
use serde_json::{Map, Value};

/// Key whose object value gets the statistics rule at any depth.
pub const STATS_KEY: &str = "stats";

/// Merge `incoming` into `base`, producing a new report.
pub fn merge_reports(base: &Report, incoming: &Report) -> Report {
    let merged = Report {
        stats: merge_stats(&base.stats, &incoming.stats),
        tests: concat(&base.tests, &incoming.tests),
        failures: concat(&base.failures, &incoming.failures),
        passes: concat(&base.passes, &incoming.passes),
        extra: merge_maps(&base.extra, &incoming.extra),
    };
    tracing::debug!(
        tests = merged.tests.len(),
        failures = merged.failures.len(),
        passes = merged.passes.len(),
        "merged reports"
    );
    merged
}

fn concat(base: &[TestRecord], incoming: &[TestRecord]) -> Vec<TestRecord> {
    let mut out = Vec::with_capacity(base.len() + incoming.len());
    out.extend_from_slice(base);
    out.extend_from_slice(incoming);
    out
}

/// Merge two untyped JSON values with the report rules.
pub fn merge_values(base: &Value, incoming: &Value) -> Value {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            Value::Object(merge_maps(base_map, incoming_map))
        }
        (Value::Array(base_items), Value::Array(incoming_items)) => {
            Value::Array(base_items.iter().chain(incoming_items).cloned().collect())
        }
        (_, incoming) => incoming.clone(),
    }
}

fn merge_maps(base: &Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    let mut result = base.clone();
    for (key, incoming_value) in incoming {
        let merged = match base.get(key) {
            Some(base_value) if key == STATS_KEY => merge_stats_values(base_value, incoming_value),
            Some(base_value) => merge_values(base_value, incoming_value),
            None => incoming_value.clone(),
        };
        result.insert(key.clone(), merged);
    }
    result
}

/// Apply the statistics rule to an untyped `stats` pair. Any two objects
/// decode as stats; other pairs fall back to the generic rules.
fn merge_stats_values(base: &Value, incoming: &Value) -> Value {
    if let (Value::Object(_), Value::Object(_)) = (base, incoming) {
        let decoded = decode_stats(base).zip(decode_stats(incoming));
        if let Some((base_stats, incoming_stats)) = decoded {
            if let Ok(value) = serde_json::to_value(merge_stats(&base_stats, &incoming_stats)) {
                return value;
            }
        }
    }
    merge_values(base, incoming)
}

fn decode_stats(value: &Value) -> Option<RunStats> {
    serde_json::from_value(value.clone()).ok()
}
