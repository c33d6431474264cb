//! Instances of registered model classes.

use std::collections::BTreeMap;
use std::sync::Arc;

use modelbind_core::naming::{self, NamingStyle};

use crate::value::Value;

/// An instance of a model class: the class name plus its field values.
///
/// Records are plain owned trees; cloning one is a deep copy. New records
/// for a registered class come from
/// [`SchemaRegistry::instantiate`](crate::registry::SchemaRegistry::instantiate),
/// which starts them from the class's default instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    class: Arc<str>,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record of the given class.
    pub fn new(class: impl Into<Arc<str>>) -> Self {
        Self {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the name of this record's class.
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Returns the value of a field, if the record has it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the value of a field, or `undefined` if the record lacks it.
    pub fn value(&self, field: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        self.fields.get(field).unwrap_or(&UNDEFINED)
    }

    /// Returns a mutable reference to a field value.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    /// Sets a field value, returning the previous one.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    /// Removes a field from the record.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    /// Returns `true` if the record has the field (even if it is undefined).
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates over field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serializes the record into a plain map.
    ///
    /// With `rename = Some((from, to))`, every record key (recursively) is
    /// converted between the two naming styles. Pass the record's own style
    /// as `from` and the wire style as `to`.
    pub fn to_plain(&self, rename: Option<(NamingStyle, NamingStyle)>) -> Value {
        Value::Map(
            self.fields
                .iter()
                .filter(|(_, v)| !v.is_undefined())
                .map(|(k, v)| {
                    let key = rename.map_or_else(|| k.clone(), |(from, to)| naming::convert(k, from, to));
                    (key, v.to_plain(rename))
                })
                .collect(),
        )
    }

    /// Serializes the record into JSON without renaming.
    pub fn to_json(&self) -> serde_json::Value {
        Value::Record(self.clone()).to_json()
    }
}
