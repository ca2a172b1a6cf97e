//! Raw value graph with reference identity.
//!
//! Arrays and objects are shared nodes, so a graph may reference the same
//! node from several places or from inside itself.

use report_model::Metric;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Shared, mutable node.
pub type Shared<T> = Rc<RefCell<T>>;

/// Insertion-ordered object body.
pub type Fields = Vec<(String, RawValue)>;

/// A value as produced by the test engine, before normalization.
///
/// Nodes are reference counted, so a graph whose nodes form a cycle is never
/// freed. Graphs converted from JSON are acyclic; cycles only arise from
/// [`RawValue::set`] or [`RawValue::push`] linking a node back into itself.
#[derive(Clone)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Shared<Vec<RawValue>>),
    Object(Shared<Fields>),
}

impl RawValue {
    /// A new, empty object node.
    pub fn object() -> RawValue {
        RawValue::Object(Rc::new(RefCell::new(Vec::new())))
    }

    /// A new object node holding the given fields.
    pub fn object_from<K, I>(fields: I) -> RawValue
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RawValue)>,
    {
        let value = RawValue::object();
        for (key, field) in fields {
            value.set(key, field);
        }
        value
    }

    /// A new array node holding the given items.
    pub fn array_from<I: IntoIterator<Item = RawValue>>(items: I) -> RawValue {
        RawValue::Array(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Set a field on an object node, replacing an existing key in place.
    ///
    /// Returns false when `self` is not an object.
    pub fn set(&self, key: impl Into<String>, value: RawValue) -> bool {
        let RawValue::Object(fields) = self else {
            return false;
        };
        let key = key.into();
        let mut fields = fields.borrow_mut();
        match fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => fields.push((key, value)),
        }
        true
    }

    /// Append to an array node. Returns false when `self` is not an array.
    pub fn push(&self, value: RawValue) -> bool {
        let RawValue::Array(items) = self else {
            return false;
        };
        items.borrow_mut().push(value);
        true
    }

    /// Identity of a shared node; `None` for scalars.
    pub fn identity(&self) -> Option<usize> {
        match self {
            RawValue::Array(items) => Some(Rc::as_ptr(items) as *const () as usize),
            RawValue::Object(fields) => Some(Rc::as_ptr(fields) as *const () as usize),
            _ => None,
        }
    }

    /// Truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Bool(b) => *b,
            RawValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RawValue::String(s) => !s.is_empty(),
            RawValue::Array(_) | RawValue::Object(_) => true,
        }
    }

    /// String coercion of the value.
    ///
    /// Objects become `[object Object]`; arrays join their elements with
    /// commas, rendering `null` as empty and a nested reference back to an
    /// array being joined as empty.
    pub fn to_display_string(&self) -> String {
        let mut joining = HashSet::new();
        self.display_into(&mut joining)
    }

    fn display_into(&self, joining: &mut HashSet<usize>) -> String {
        match self {
            RawValue::Null => "null".to_string(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) => Metric::new(*n).to_string(),
            RawValue::String(s) => s.clone(),
            RawValue::Object(_) => "[object Object]".to_string(),
            RawValue::Array(items) => {
                let id = Rc::as_ptr(items) as *const () as usize;
                if !joining.insert(id) {
                    return String::new();
                }
                let parts: Vec<String> = items
                    .borrow()
                    .iter()
                    .map(|item| match item {
                        RawValue::Null => String::new(),
                        other => other.display_into(joining),
                    })
                    .collect();
                joining.remove(&id);
                parts.join(",")
            }
        }
    }
}

impl fmt::Debug for RawValue {
    // Shallow on purpose: nodes may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "Null"),
            RawValue::Bool(b) => write!(f, "Bool({})", b),
            RawValue::Number(n) => write!(f, "Number({})", n),
            RawValue::String(s) => write!(f, "String({:?})", s),
            RawValue::Array(items) => write!(f, "Array(len={})", items.borrow().len()),
            RawValue::Object(fields) => {
                let fields = fields.borrow();
                let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
                write!(f, "Object({:?})", keys)
            }
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => RawValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => RawValue::String(s),
            Value::Array(items) => RawValue::array_from(items.into_iter().map(RawValue::from)),
            Value::Object(map) => {
                RawValue::object_from(map.into_iter().map(|(k, v)| (k, RawValue::from(v))))
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}
