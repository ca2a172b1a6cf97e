//! Values a failing test can carry as its error.

use serde_json::Value;

use super::value::RawValue;

/// A conventional error: message, optional stack, plus whatever custom
/// properties the thrower attached (expected/actual, codes, ...).
#[derive(Debug, Clone)]
pub struct ErrorFields {
    /// Only set when `name` is an own property of the error
    pub name: Option<String>,
    pub message: String,
    pub stack: Option<String>,
    /// Custom properties in insertion order
    pub properties: Vec<(String, RawValue)>,
}

impl ErrorFields {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
            stack: None,
            properties: Vec::new(),
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: RawValue) -> Self {
        self.properties.push((key.into(), value));
        self
    }

    /// Flatten into one field bag: `stack`, `message`, `name`, then the
    /// custom properties. A custom property with a standard key replaces it.
    pub fn to_field_bag(&self) -> RawValue {
        let bag = RawValue::object();
        if let Some(stack) = &self.stack {
            bag.set("stack", RawValue::from(stack.as_str()));
        }
        bag.set("message", RawValue::from(self.message.as_str()));
        if let Some(name) = &self.name {
            bag.set("name", RawValue::from(name.as_str()));
        }
        for (key, value) in &self.properties {
            bag.set(key.as_str(), value.clone());
        }
        bag
    }
}

/// Whatever a test threw.
#[derive(Debug, Clone)]
pub enum ThrownValue {
    Structured(ErrorFields),
    Opaque(RawValue),
}

impl ThrownValue {
    /// Interpret a decoded JSON error.
    ///
    /// Decoded values are never error instances, so they are kept as-is,
    /// key order included. Errors built in code go through [`ErrorFields`].
    pub fn from_json(value: Value) -> Self {
        ThrownValue::Opaque(RawValue::from(value))
    }

    /// Falsy opaque values count as "no error".
    pub fn is_truthy(&self) -> bool {
        match self {
            ThrownValue::Structured(_) => true,
            ThrownValue::Opaque(raw) => raw.is_truthy(),
        }
    }

    /// The field bag to serialize.
    ///
    /// Opaque objects are used as-is so their node identity survives; other
    /// opaque values are wrapped as `{ "message": <string form> }`.
    pub fn to_field_bag(&self) -> RawValue {
        match self {
            ThrownValue::Structured(fields) => fields.to_field_bag(),
            ThrownValue::Opaque(raw @ RawValue::Object(_)) => raw.clone(),
            ThrownValue::Opaque(raw) => {
                RawValue::object_from([("message", RawValue::from(raw.to_display_string()))])
            }
        }
    }
}

impl From<ErrorFields> for ThrownValue {
    fn from(fields: ErrorFields) -> Self {
        ThrownValue::Structured(fields)
    }
}
