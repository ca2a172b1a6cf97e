//! Numeric statistics with JSON-number semantics.

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Largest integer an `f64` holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A numeric statistic.
///
/// Reports written by other tools may carry malformed values, so decoding
/// never fails on a wrong type: anything that is not a number becomes `NaN`
/// and poisons the arithmetic that uses it instead of aborting the load.
///
/// Encoding mirrors JSON number output: integral values are written as
/// integers, non-finite values as `null`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Metric(f64);

impl Metric {
    /// Zero.
    pub const ZERO: Metric = Metric(0.0);

    /// Wrap a raw value.
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The raw value.
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Whether the value is `NaN` or infinite.
    pub fn is_non_finite(self) -> bool {
        !self.0.is_finite()
    }

    /// Value of an optional metric, with absence counting as zero.
    pub fn or_zero(metric: Option<Metric>) -> f64 {
        metric.map_or(0.0, Metric::get)
    }
}

impl From<f64> for Metric {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<u64> for Metric {
    fn from(value: u64) -> Self {
        Self(value as f64)
    }
}

impl From<u32> for Metric {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            write!(f, "NaN")
        } else if self.0.is_infinite() {
            write!(f, "{}Infinity", if self.0 < 0.0 { "-" } else { "" })
        } else if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if !value.is_finite() {
            serializer.serialize_unit()
        } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(value as i64)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

struct MetricVisitor;

impl<'de> Visitor<'de> for MetricVisitor {
    type Value = Metric;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Metric, E> {
        Ok(Metric(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Metric, E> {
        Ok(Metric(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Metric, E> {
        Ok(Metric(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Metric, E> {
        Ok(Metric(f64::NAN))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Metric, E> {
        Ok(Metric(f64::NAN))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Metric, E> {
        Ok(Metric::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Metric, E> {
        Ok(Metric::ZERO)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Metric, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Metric(f64::NAN))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Metric, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Metric(f64::NAN))
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetricVisitor)
    }
}
