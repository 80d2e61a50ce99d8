//! The value model inspected by the matching engine.
//!
//! A [`Value`] is a tree of objects, arrays, and leaves. The engine never
//! parses or renders the wire form; it only looks at the shape of each
//! node, summarised by [`ValueKind`].

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Attribute map of an object value. Ordering carries no meaning; the
/// `BTreeMap` only makes iteration deterministic.
pub type Map = BTreeMap<String, Value>;

/// A semi-structured value.
///
/// Serializes through its `serde_json::Value` form. Timestamps render as
/// RFC 3339 strings and come back as plain strings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// An instant, compared by three-way ordering rather than equality.
    Timestamp(DateTime<FixedOffset>),
    Object(Map),
    Array(Vec<Value>),
}

/// Shape classification used to dispatch a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    /// Bool, number, or string: compared by exact equality.
    Primitive,
    /// Totally ordered leaf: equal iff the comparison yields `Equal`.
    Ordered,
    Object,
    Array,
}

impl Value {
    /// Parse an RFC 3339 string into a [`Value::Timestamp`].
    pub fn parse_timestamp(s: &str) -> Result<Self, TypeError> {
        DateTime::parse_from_rfc3339(s)
            .map(Value::Timestamp)
            .map_err(|e| TypeError::InvalidTimestamp(format!("{s}: {e}")))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => ValueKind::Primitive,
            Value::Timestamp(_) => ValueKind::Ordered,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_primitive(&self) -> bool {
        self.kind() == ValueKind::Primitive
    }

    pub fn is_ordered(&self) -> bool {
        self.kind() == ValueKind::Ordered
    }

    /// Returns `true` for objects and arrays.
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up an attribute of an object value. Non-objects have none.
    pub fn get(&self, attr: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(attr))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Timestamp(ts) => serde_json::Value::String(ts.to_rfc3339()),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}
