//! Dynamic values flowing through the binding engine.
//!
//! The [`Value`] enum covers both sides of a binding: untyped source data
//! (typically converted from parsed JSON) and the typed contents of a
//! [`Record`]. It distinguishes an explicit `undefined` from `null`, because
//! the engine treats "absent", "explicitly undefined", and "explicitly null"
//! differently.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use modelbind_core::naming::{self, NamingStyle};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::enums::Enumerator;
use crate::record::Record;

/// A dynamically typed value.
///
/// Cloning a `Value` is a deep copy, except for [`Value::Enum`], which shares
/// the same enumerator singleton.
///
/// # Examples
///
/// ```
/// use modelbind_schema::value::Value;
///
/// let v = Value::from(serde_json::json!({"name": "Ada", "tags": ["x"]}));
/// assert_eq!(v.get("name"), Some(&Value::from("Ada")));
/// assert_eq!(v.kind(), "map");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicitly undefined; also the value of a field with no default.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A UTC timestamp.
    Date(DateTime<Utc>),
    /// An ordered list of values.
    Array(Vec<Value>),
    /// A plain string-keyed object.
    Map(BTreeMap<String, Value>),
    /// An instance of a registered model class.
    Record(Record),
    /// A shared enumerator singleton.
    Enum(Arc<Enumerator>),
}

impl Value {
    /// Returns `true` for `null` and `undefined`.
    pub const fn is_nullish(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Returns `true` for `undefined`.
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for `null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for arrays and plain maps.
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Map(_))
    }

    /// Returns a short name for the runtime shape of this value.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Enum(_) => "enum",
        }
    }

    /// Like [`kind`](Self::kind), but names the class of records and enumerators.
    pub fn describe(&self) -> String {
        match self {
            Self::Record(r) => format!("{} instance", r.class_name()),
            Self::Enum(e) => format!("{} enumerator", e.class_name()),
            other => other.kind().to_string(),
        }
    }

    /// Returns the string slice if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the entries if this is a plain map.
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the record if this is one.
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the enumerator if this is one.
    pub const fn as_enum(&self) -> Option<&Arc<Enumerator>> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Looks up a key on a plain map or a field on a record.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            Self::Record(r) => r.get(key),
            _ => None,
        }
    }

    /// Returns the keys of a plain map or the field names of a record.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Map(map) => map.keys().map(String::as_str).collect(),
            Self::Record(r) => r.field_names().collect(),
            _ => Vec::new(),
        }
    }

    /// Deep clone that renames the top-level keys of a plain map.
    ///
    /// Nested maps, array elements and records are cloned without renaming.
    pub fn clone_renamed(&self, rename: Option<(NamingStyle, NamingStyle)>) -> Self {
        match (self, rename) {
            (Self::Map(map), Some((from, to))) => Self::Map(
                map.iter()
                    .map(|(k, v)| (naming::convert(k, from, to), v.clone()))
                    .collect(),
            ),
            _ => self.clone(),
        }
    }

    /// Converts records and enumerators into plain data.
    ///
    /// Records become maps whose keys are renamed `from -> to` when `rename` is
    /// given, enumerators become their canonical value, and `undefined` entries
    /// are dropped from maps.
    pub fn to_plain(&self, rename: Option<(NamingStyle, NamingStyle)>) -> Self {
        match self {
            Self::Record(r) => r.to_plain(rename),
            Self::Enum(e) => Self::String(e.value().to_string()),
            Self::Array(items) => Self::Array(items.iter().map(|v| v.to_plain(rename)).collect()),
            Self::Map(map) => Self::Map(
                map.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_plain(rename)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Converts this value into JSON.
    ///
    /// `undefined` map entries are omitted and `undefined` array elements become
    /// `null`. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Map(map) => json_object(map.iter().map(|(k, v)| (k.as_str(), v))),
            Self::Record(r) => json_object(r.fields()),
            Self::Enum(e) => serde_json::Value::String(e.value().to_string()),
        }
    }
}

fn json_object<'a>(entries: impl Iterator<Item = (&'a str, &'a Value)>) -> serde_json::Value {
    serde_json::Value::Object(
        entries
            .filter(|(_, v)| !v.is_undefined())
            .map(|(k, v)| (k.to_string(), v.to_json()))
            .collect(),
    )
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Self::Enum(e) => write!(f, "{}.{}", e.class_name(), e.value()),
            Self::Record(r) => write!(f, "{} {}", r.class_name(), self.to_json()),
            Self::Array(_) | Self::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Self::Map(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}

impl From<Arc<Enumerator>> for Value {
    fn from(v: Arc<Enumerator>) -> Self {
        Self::Enum(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
