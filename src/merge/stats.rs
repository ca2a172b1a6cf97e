//! Statistic reconciliation for merged reports.

use report_model::{Metric, RunStats};

/// Derives a percentage from already-summed stats.
pub type PercentageFormula = fn(&RunStats) -> f64;

/// `passPercentage` formula: tests / passes * 100.
///
/// The operands are inverted relative to a conventional pass rate. Existing
/// cumulative reports were produced this way, so it is kept; swap the
/// constant for [`passes_over_tests`] to change it.
pub const PASS_PERCENTAGE: PercentageFormula = tests_over_passes;

/// `failingPercentage` formula: failures / tests * 100.
pub const FAILING_PERCENTAGE: PercentageFormula = failures_over_tests;

/// Division by zero yields `NaN` or an infinity, never an error.
fn percentage(numerator: Option<Metric>, denominator: Option<Metric>) -> f64 {
    Metric::or_zero(numerator) / Metric::or_zero(denominator) * 100.0
}

pub fn tests_over_passes(stats: &RunStats) -> f64 {
    percentage(stats.tests, stats.passes)
}

pub fn passes_over_tests(stats: &RunStats) -> f64 {
    percentage(stats.passes, stats.tests)
}

pub fn failures_over_tests(stats: &RunStats) -> f64 {
    percentage(stats.failures, stats.tests)
}

fn sum(a: Option<Metric>, b: Option<Metric>) -> Option<Metric> {
    Some(Metric::new(Metric::or_zero(a) + Metric::or_zero(b)))
}

/// Merge two `stats` blocks.
///
/// Starts from a copy of `base`, so `start`, `pending` and any unknown keys
/// come from `base` only. `suites`, `tests`, `passes`, `failures` and
/// `duration` are summed with absent values counting as zero, the
/// percentages are derived from the summed counters, and `end` is taken
/// from `incoming` even when it is absent there.
pub fn merge_stats(base: &RunStats, incoming: &RunStats) -> RunStats {
    let mut merged = base.clone();

    merged.suites = sum(base.suites, incoming.suites);
    merged.tests = sum(base.tests, incoming.tests);
    merged.passes = sum(base.passes, incoming.passes);
    merged.failures = sum(base.failures, incoming.failures);

    merged.pass_percentage = Some(Metric::new(PASS_PERCENTAGE(&merged)));
    merged.failing_percentage = Some(Metric::new(FAILING_PERCENTAGE(&merged)));

    merged.duration = sum(base.duration, incoming.duration);
    merged.end = incoming.end.clone();

    merged
}
