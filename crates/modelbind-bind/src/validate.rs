//! Invoking field validators.
//!
//! The binding engine does not define validation rules itself; it runs the
//! validators declared on each [`FieldSchema`] and reports the outcome.
//! Errors accumulate rather than short-circuiting, so every problem is
//! reported at once.

use std::collections::BTreeMap;

use modelbind_core::{BindResult, ValidationError};
use modelbind_schema::{FieldSchema, Record, Value};

use crate::assign::Binder;

/// The result of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether every check passed.
    pub success: bool,
    /// The first failure message, prefixed with the field label.
    pub message: Option<String>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub const fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// A failing outcome.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

impl Binder<'_> {
    /// Validates a single field of `record`.
    ///
    /// A field the schema does not declare always passes.
    pub fn validate_field(&self, record: &Record, field: &str) -> ValidationOutcome {
        let schema = self.registry().schema(record.class_name());
        let Some(def) = schema.field(field) else {
            return ValidationOutcome::ok();
        };
        match check_field(def, record.value(field)) {
            Ok(()) => ValidationOutcome::ok(),
            Err(errors) => {
                let first = errors.first().map_or("", |e| e.message.as_str());
                ValidationOutcome::failed(format!("{}: {first}", def.label))
            }
        }
    }

    /// Validates every declared field of `record`, descending into nested
    /// records.
    ///
    /// Nested failures are keyed by dotted path, e.g. `address.zipCode`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::ValidationError`](modelbind_core::BindError::ValidationError)
    /// carrying every field error.
    pub fn full_clean(&self, record: &Record) -> BindResult<()> {
        let mut errors = BTreeMap::new();
        self.collect_errors(record, "", &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                class = record.class_name(),
                fields = errors.len(),
                "Record failed validation"
            );
            Err(ValidationError::with_field_errors(errors).into())
        }
    }

    fn collect_errors(
        &self,
        record: &Record,
        prefix: &str,
        errors: &mut BTreeMap<String, Vec<ValidationError>>,
    ) {
        let schema = self.registry().schema(record.class_name());
        for (_, def) in schema.all_fields() {
            let value = record.value(&def.name);
            let path = if prefix.is_empty() {
                def.name.clone()
            } else {
                format!("{prefix}.{}", def.name)
            };
            if let Err(field_errors) = check_field(def, value) {
                errors.insert(path.clone(), field_errors);
            }
            match value {
                Value::Record(nested) => self.collect_errors(nested, &path, errors),
                Value::Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if let Value::Record(nested) = item {
                            self.collect_errors(nested, &format!("{path}[{i}]"), errors);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn check_field(field: &FieldSchema, value: &Value) -> Result<(), Vec<ValidationError>> {
    if value.is_null() && !field.nullable {
        return Err(vec![ValidationError::new(
            "This field cannot be null.",
            "null",
        )]);
    }
    let errors: Vec<ValidationError> = field
        .validators
        .iter()
        .filter_map(|v| {
            let err = v.validate(value).err()?;
            tracing::trace!(
                field = %field.name,
                validator = v.name(),
                code = %err.code,
                "Validator rejected value"
            );
            Some(err)
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
