//! The assignment engine.
//!
//! [`Binder::assign`] merges untyped source data into a typed [`Record`]
//! following the record's class schema. Every field is merged exactly once,
//! at the class level that declares it, ancestors first:
//!
//! - a field absent from the source takes a deep clone of its default;
//! - an explicit `null` or `undefined` is kept as-is;
//! - a field with an element type is cloned element by element;
//! - a field with a declared type is cloned as that type;
//! - an undeclared field is cloned according to the shape of its default.
//!
//! Typed-object and enum shape errors abort the whole call. Collection and
//! built-in type drift is reported to the [`DiagnosticSink`] and tolerated.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use modelbind_core::logging::assign_span;
use modelbind_core::naming;
use modelbind_core::{
    BindError, BindResult, Diagnostic, DiagnosticSink, NullSink, TracingSink, SETTINGS,
};
use modelbind_schema::{ClassSchema, FieldSchema, Record, SchemaRegistry, TypeRef, Value, REGISTRY};

use crate::options::AssignOptions;

/// Binds source data to records of the classes in one registry.
///
/// # Examples
///
/// ```
/// use modelbind_bind::{AssignOptions, Binder};
/// use modelbind_schema::{ClassBuilder, FieldSchema, SchemaRegistry, Value};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register(
///         ClassBuilder::model("User")
///             .field(FieldSchema::new("firstName").normalized())
///             .field(FieldSchema::new("active").default_value(true)),
///     )
///     .unwrap();
///
/// let binder = Binder::new(&registry);
/// let user = binder
///     .create(
///         "User",
///         &Value::from(json!({"first_name": " Ada "})),
///         &AssignOptions::default().convert_naming(true),
///     )
///     .unwrap()
///     .unwrap();
/// assert_eq!(user.get("firstName"), Some(&Value::from("Ada")));
/// assert_eq!(user.get("active"), Some(&Value::from(true)));
/// ```
#[derive(Clone)]
pub struct Binder<'r> {
    registry: &'r SchemaRegistry,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl fmt::Debug for Binder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("classes", &self.registry.class_names())
            .finish_non_exhaustive()
    }
}

impl Binder<'static> {
    /// A binder over the global [`REGISTRY`].
    pub fn global() -> Self {
        Self::new(&REGISTRY)
    }
}

impl<'r> Binder<'r> {
    /// Creates a binder reporting diagnostics to `tracing`, or discarding
    /// them when the settings disable diagnostics.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        let diagnostics: Arc<dyn DiagnosticSink> = if SETTINGS.get().diagnostics.enabled {
            Arc::new(TracingSink)
        } else {
            Arc::new(NullSink)
        };
        Self {
            registry,
            diagnostics,
        }
    }

    /// Replaces the diagnostic sink.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// The registry this binder reads schemas from.
    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Merges `source` into `target` according to the schema of the target's class.
    ///
    /// On error the target may be partially updated.
    pub fn assign<'t>(
        &self,
        target: &'t mut Record,
        source: &Value,
        options: &AssignOptions,
    ) -> BindResult<&'t mut Record> {
        let schema = self.registry.schema(target.class_name());
        if schema.is_enum() {
            return Err(BindError::ConfigurationError(format!(
                "Cannot assign into enum class {}",
                schema.name()
            )));
        }
        let span = assign_span(schema.name());
        let _guard = span.enter();
        self.assign_inner(&schema, target, source, options, None, "")?;
        Ok(target)
    }

    /// Builds a new record of `class` from `source`.
    ///
    /// Returns `None` when the source is `null` or `undefined`.
    pub fn create(
        &self,
        class: &str,
        source: &Value,
        options: &AssignOptions,
    ) -> BindResult<Option<Record>> {
        if source.is_nullish() {
            return Ok(None);
        }
        let schema = self.registry.model(class)?;
        let span = assign_span(class);
        let _guard = span.enter();
        let mut record = self.registry.instantiate(class)?;
        self.assign_inner(&schema, &mut record, source, options, None, "")?;
        Ok(Some(record))
    }

    /// Builds one record of `class` per element of the `source` array.
    ///
    /// Returns `None` when the source is `null` or `undefined`. Nullish
    /// elements stay `None`; every other element becomes an independent record.
    pub fn create_array(
        &self,
        class: &str,
        source: &Value,
        options: &AssignOptions,
    ) -> BindResult<Option<Vec<Option<Record>>>> {
        match source {
            Value::Null | Value::Undefined => Ok(None),
            Value::Array(items) => items
                .iter()
                .map(|item| self.create(class, item, options))
                .collect::<BindResult<Vec<_>>>()
                .map(Some),
            other => Err(BindError::shape(class, "array", other.describe())),
        }
    }

    pub(crate) fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics.report(diagnostic);
    }

    fn assign_inner(
        &self,
        schema: &ClassSchema,
        target: &mut Record,
        source: &Value,
        options: &AssignOptions,
        default: Option<&Record>,
        path: &str,
    ) -> BindResult<()> {
        let options = if options.convert_naming && self.registry.is_instance_of(source, schema.name()) {
            Cow::Owned(options.clone().convert_naming(false))
        } else {
            Cow::Borrowed(options)
        };

        let cached;
        let default = match default {
            Some(d) => d,
            None => {
                cached = self.registry.default_instance(schema.name())?;
                &*cached
            }
        };

        match source {
            Value::Null | Value::Undefined => {
                for (_, field) in schema.all_fields() {
                    target.set(field.name.clone(), default.value(&field.name).clone());
                }
            }
            Value::Map(_) | Value::Record(_) => {
                for (level, field) in schema.all_fields() {
                    self.merge_field(level, field, target, source, &options, default, path)?;
                }
            }
            other => {
                let at = if path.is_empty() { schema.name() } else { path };
                return Err(BindError::shape(at, "object", other.describe()));
            }
        }

        if options.normalize {
            self.normalize(target, &crate::FieldSelector::All);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn merge_field(
        &self,
        level: &ClassSchema,
        field: &FieldSchema,
        target: &mut Record,
        source: &Value,
        options: &AssignOptions,
        default: &Record,
        path: &str,
    ) -> BindResult<()> {
        let name = field.name.as_str();
        let field_path = join_path(path, name);
        let key = options.source_key(name);
        let fallback = default.value(name);

        let Some(raw) = source.get(&key) else {
            target.set(name, fallback.clone());
            if let Some(found) = source
                .keys()
                .into_iter()
                .find(|k| naming::loosely_equal(k, &key))
            {
                self.report(&Diagnostic::NamingMismatch {
                    class: level.name().to_string(),
                    field: name.to_string(),
                    expected_key: key.clone(),
                    found_key: found.to_string(),
                });
            }
            return Ok(());
        };

        if raw.is_nullish() {
            target.set(name, raw.clone());
            return Ok(());
        }

        let value = if let Some(element) = options
            .element_types
            .get(&field_path)
            .or(field.element_type.as_ref())
        {
            self.array_clone(element, raw, fallback, options, &field_path)?
        } else if let Some(ty) = options.types.get(&field_path).or(field.declared_type.as_ref()) {
            self.typed_clone(ty, raw, fallback, options, &field_path)?
        } else {
            self.untyped_clone(raw, fallback, options, &field_path)?
        };
        target.set(name, value);
        Ok(())
    }

    /// Clones a value whose type is only known from the shape of its default.
    fn untyped_clone(
        &self,
        raw: &Value,
        fallback: &Value,
        options: &AssignOptions,
        path: &str,
    ) -> BindResult<Value> {
        match fallback {
            Value::Record(r) => {
                self.typed_clone(&TypeRef::class(r.class_name()), raw, fallback, options, path)
            }
            Value::Enum(e) => {
                self.typed_clone(&TypeRef::class(e.class_name()), raw, fallback, options, path)
            }
            // element keys keep their source names
            Value::Array(_) => Ok(raw.clone()),
            _ => Ok(raw.clone_renamed(options.rename())),
        }
    }

    fn typed_clone(
        &self,
        ty: &TypeRef,
        raw: &Value,
        fallback: &Value,
        options: &AssignOptions,
        path: &str,
    ) -> BindResult<Value> {
        if raw.is_nullish() {
            return Ok(fallback.clone());
        }
        match ty {
            TypeRef::Builtin(builtin) => {
                if !builtin.matches(raw) {
                    self.report(&Diagnostic::TypeMismatch {
                        path: path.to_string(),
                        expected: builtin.as_str().to_string(),
                        found: raw.describe(),
                    });
                }
                Ok(raw.clone())
            }
            TypeRef::Class(class) => {
                let schema = self.registry.require(class)?;
                if schema.is_enum() {
                    return self.registry.enum_type(class)?.resolve(raw, fallback);
                }
                let mut record = self.registry.instantiate(class)?;
                self.assign_inner(&schema, &mut record, raw, options, fallback.as_record(), path)?;
                Ok(Value::Record(record))
            }
        }
    }

    fn array_clone(
        &self,
        element: &TypeRef,
        raw: &Value,
        fallback: &Value,
        options: &AssignOptions,
        path: &str,
    ) -> BindResult<Value> {
        let Value::Array(items) = raw else {
            self.report(&Diagnostic::ArrayExpected {
                path: path.to_string(),
                found: raw.describe(),
            });
            return Ok(fallback.clone());
        };

        let TypeRef::Class(class) = element else {
            return Ok(raw.clone());
        };
        let schema = self.registry.require(class)?;
        let defaults = fallback.as_array().unwrap_or(&[]);

        let cloned = if schema.is_enum() {
            let enum_type = self.registry.enum_type(class)?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    enum_type.resolve(item, defaults.get(i).unwrap_or(&Value::Undefined))
                })
                .collect::<BindResult<Vec<_>>>()?
        } else {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    if item.is_nullish() {
                        return Ok(item.clone());
                    }
                    let mut record = self.registry.instantiate(class)?;
                    let default = defaults.get(i).and_then(Value::as_record);
                    self.assign_inner(&schema, &mut record, item, options, default, path)?;
                    Ok(Value::Record(record))
                })
                .collect::<BindResult<Vec<_>>>()?
        };
        Ok(Value::Array(cloned))
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}
