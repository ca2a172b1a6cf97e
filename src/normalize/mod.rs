//! Record normalization
//!
//! Turns raw tests and whatever they threw into plain, serializable
//! records. Error values may reference themselves; serialization breaks
//! every repeated reference so traversal always terminates.

mod thrown;
mod value;

pub use thrown::{ErrorFields, ThrownValue};
pub use value::{Fields, RawValue, Shared};

use report_model::{Metric, Speed, TestRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;

/// Which earlier references make a node collapse to its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeenScope {
    /// Any node already visited in the same pass, including shared
    /// siblings that do not form a cycle.
    #[default]
    Global,
    /// Only nodes on the current path from the root (true cycles).
    Ancestors,
}

impl SeenScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeenScope::Global => "global",
            SeenScope::Ancestors => "ancestors",
        }
    }
}

/// A test as delivered by the event source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub full_title: String,

    #[serde(default)]
    pub file: Option<String>,

    /// Duration in milliseconds; absent for tests that never ran
    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(default)]
    pub current_retry: u32,

    #[serde(default)]
    pub speed: Option<Speed>,

    /// Per-test slow threshold in milliseconds
    #[serde(default)]
    pub slow: Option<f64>,

    #[serde(default, deserialize_with = "deserialize_thrown")]
    pub err: Option<ThrownValue>,
}

pub(crate) fn deserialize_thrown<'de, D>(deserializer: D) -> Result<Option<ThrownValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(ThrownValue::from_json))
}

impl TestCase {
    pub fn new(title: impl Into<String>, full_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            full_title: full_title.into(),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration = Some(duration_ms);
        self
    }

    pub fn with_err(mut self, err: impl Into<ThrownValue>) -> Self {
        self.err = Some(err.into());
        self
    }
}

/// Converts raw tests and error values into plain records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    scope: SeenScope,
}

impl Normalizer {
    pub fn new(scope: SeenScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> SeenScope {
        self.scope
    }

    /// Extract the record fields of a test.
    ///
    /// A missing or falsy error becomes `{}`; otherwise the error's field
    /// bag is serialized with [`Normalizer::serialize_safely`].
    pub fn normalize(&self, test: &TestCase) -> TestRecord {
        let err = match &test.err {
            Some(thrown) if thrown.is_truthy() => self.serialize_safely(&thrown.to_field_bag()),
            _ => Value::Object(Map::new()),
        };

        let mut record = TestRecord::new(test.title.as_str(), test.full_title.as_str());
        record.file = test.file.clone();
        record.duration = test.duration.map(Metric::new);
        record.current_retry = test.current_retry;
        record.speed = test.speed;
        record.err = err;
        record
    }

    /// Convert a value graph to JSON.
    ///
    /// The seen set lives for this one call. A node met again (per the
    /// configured [`SeenScope`]) is replaced by its string form and not
    /// descended into.
    pub fn serialize_safely(&self, value: &RawValue) -> Value {
        let mut seen = HashSet::new();
        self.visit(value, &mut seen)
    }

    fn visit(&self, value: &RawValue, seen: &mut HashSet<usize>) -> Value {
        let id = match value {
            RawValue::Null => return Value::Null,
            RawValue::Bool(b) => return Value::Bool(*b),
            RawValue::Number(n) => return number_value(*n),
            RawValue::String(s) => return Value::String(s.clone()),
            RawValue::Array(_) | RawValue::Object(_) => value.identity().unwrap_or_default(),
        };

        if !seen.insert(id) {
            return Value::String(value.to_display_string());
        }

        let out = match value {
            RawValue::Array(items) => Value::Array(
                items.borrow().iter().map(|item| self.visit(item, seen)).collect(),
            ),
            RawValue::Object(fields) => Value::Object(
                fields
                    .borrow()
                    .iter()
                    .map(|(key, field)| (key.clone(), self.visit(field, seen)))
                    .collect(),
            ),
            _ => Value::Null,
        };

        if self.scope == SeenScope::Ancestors {
            seen.remove(&id);
        }
        out
    }
}

/// JSON number for an `f64`: integral values as integers, non-finite as null.
fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}
