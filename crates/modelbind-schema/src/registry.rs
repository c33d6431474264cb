//! The schema registry.
//!
//! Classes are registered once, by name, before any binding targets them.
//! The registry hands out shared [`ClassSchema`]s and lazily builds and
//! caches each model's default instance.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use modelbind_core::{BindError, BindResult};
use once_cell::sync::Lazy;

use crate::class::{ClassBuilder, ClassSchema};
use crate::enums::EnumType;
use crate::fields::FieldDefault;
use crate::record::Record;
use crate::value::Value;

/// A thread-safe map from class name to schema.
///
/// # Examples
///
/// ```
/// use modelbind_schema::{ClassBuilder, FieldSchema, SchemaRegistry, Value};
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register(ClassBuilder::model("Point").field(FieldSchema::new("x").default_value(0)))
///     .unwrap();
///
/// let p = registry.instantiate("Point").unwrap();
/// assert_eq!(p.get("x"), Some(&Value::from(0)));
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    classes: RwLock<HashMap<String, Arc<ClassSchema>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a class declaration.
    ///
    /// The parent, if any, must already be registered. A class name can only
    /// be registered once.
    pub fn register(&self, builder: ClassBuilder) -> BindResult<Arc<ClassSchema>> {
        let parent = match builder.parent_name() {
            Some(parent) => Some(self.get(parent).ok_or_else(|| {
                BindError::ConfigurationError(format!(
                    "{} extends unknown class {parent}",
                    builder.class_name()
                ))
            })?),
            None => None,
        };
        let schema = Arc::new(builder.build(parent)?);

        let mut classes = self.classes.write().expect("schema registry lock poisoned");
        if classes.contains_key(schema.name()) {
            return Err(BindError::ConfigurationError(format!(
                "Class {} is already registered",
                schema.name()
            )));
        }
        classes.insert(schema.name().to_string(), Arc::clone(&schema));
        tracing::debug!(
            class = schema.name(),
            category = ?schema.category(),
            fields = schema.own_fields().len(),
            parent = schema.parent().map(|p| p.name()),
            "Registered class"
        );
        Ok(schema)
    }

    /// Returns the schema of a registered class.
    pub fn get(&self, name: &str) -> Option<Arc<ClassSchema>> {
        self.classes
            .read()
            .expect("schema registry lock poisoned")
            .get(name)
            .cloned()
    }

    /// Returns the schema of `name`, or an empty schema if it is not registered.
    pub fn schema(&self, name: &str) -> Arc<ClassSchema> {
        self.get(name)
            .unwrap_or_else(|| Arc::new(ClassSchema::empty(name)))
    }

    /// Returns the schema of a registered class, or [`BindError::UnknownClass`].
    pub fn require(&self, name: &str) -> BindResult<Arc<ClassSchema>> {
        self.get(name)
            .ok_or_else(|| BindError::UnknownClass(name.to_string()))
    }

    /// Returns the schema of a registered model class.
    pub fn model(&self, name: &str) -> BindResult<Arc<ClassSchema>> {
        let schema = self.require(name)?;
        if !schema.is_model() {
            return Err(BindError::ConfigurationError(format!(
                "{name} is an enum class, not a model"
            )));
        }
        Ok(schema)
    }

    /// Returns a handle on a registered enum class.
    pub fn enum_type(&self, name: &str) -> BindResult<EnumType> {
        EnumType::new(self.require(name)?)
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.classes
            .read()
            .expect("schema registry lock poisoned")
            .contains_key(name)
    }

    /// Names of all registered classes, sorted.
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .classes
            .read()
            .expect("schema registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Returns the cached default instance of a model class, building it on
    /// first use.
    ///
    /// Concurrent first calls may each build a candidate, but all of them
    /// observe the same cached record. An unregistered class yields a fresh,
    /// uncached empty record.
    pub fn default_instance(&self, name: &str) -> BindResult<Arc<Record>> {
        self.default_guarded(name, &mut Vec::new())
    }

    fn default_guarded(&self, name: &str, building: &mut Vec<String>) -> BindResult<Arc<Record>> {
        let Some(schema) = self.get(name) else {
            return Ok(Arc::new(Record::new(name)));
        };
        if schema.is_enum() {
            return Err(BindError::ConfigurationError(format!(
                "Cannot construct an instance of enum class {name}"
            )));
        }
        if let Some(cached) = schema.cached_default() {
            if cached.class_name() == name {
                return Ok(cached);
            }
        }

        if building.iter().any(|b| b == name) {
            return Err(BindError::ConfigurationError(format!(
                "Default instances form a cycle: {} -> {name}",
                building.join(" -> ")
            )));
        }
        building.push(name.to_string());
        let record = self.build_default(&schema, building);
        building.pop();

        Ok(schema.store_default(record?))
    }

    fn build_default(&self, schema: &ClassSchema, building: &mut Vec<String>) -> BindResult<Record> {
        let mut record = Record::new(schema.name());
        for (_, field) in schema.all_fields() {
            let value = match (&field.default, field.declared_class()) {
                (FieldDefault::Value(v), _) => v.clone(),
                (FieldDefault::Instance, Some(class)) => {
                    Value::Record(Record::clone(&*self.default_guarded(class, building)?))
                }
                (FieldDefault::Enum(token), Some(class)) => self
                    .enum_type(class)?
                    .of(token)?
                    .map_or(Value::Undefined, Value::Enum),
                (_, None) => Value::Undefined,
            };
            record.set(field.name.clone(), value);
        }
        tracing::debug!(class = schema.name(), "Built default instance");
        Ok(record)
    }

    /// Returns a new record of `name`, starting from a deep clone of its
    /// default instance.
    pub fn instantiate(&self, name: &str) -> BindResult<Record> {
        Ok(Record::clone(&*self.default_instance(name)?))
    }

    /// Returns `true` if `value` is a record of `class` or of a subclass, or
    /// an enumerator of `class`.
    pub fn is_instance_of(&self, value: &Value, class: &str) -> bool {
        match value {
            Value::Record(r) => self
                .get(r.class_name())
                .map_or(r.class_name() == class, |s| s.is_subclass_of(class)),
            Value::Enum(e) => e.class_name() == class,
            _ => false,
        }
    }

    /// Generates the next identifier of a registered class, as `"{class}:{n}"`.
    pub fn generate_id(&self, name: &str) -> BindResult<String> {
        let schema = self.require(name)?;
        Ok(format!("{name}:{}", schema.next_id()))
    }

    /// Returns the display name of a record, read from its class's name field.
    ///
    /// Enumerators display as their name. `null` and `undefined` have no
    /// display name.
    pub fn display_name(&self, record: &Record) -> Option<String> {
        let schema = self.get(record.class_name())?;
        match record.get(schema.name_field()?)? {
            Value::Null | Value::Undefined => None,
            Value::Enum(e) => Some(e.name().to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// The process-wide registry used by the facade functions.
pub static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::new);
