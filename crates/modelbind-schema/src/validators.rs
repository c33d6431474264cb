//! Field validators.
//!
//! Validators are attached to a [`FieldSchema`](crate::fields::FieldSchema)
//! and run by the validation engine. Each checks a single constraint. Values
//! of a shape a validator does not understand pass; `null` and `undefined`
//! pass everything except [`RequiredValidator`].

use std::fmt;

use modelbind_core::ValidationError;
use regex::Regex;

use crate::enums::EnumType;
use crate::value::Value;

/// A single field constraint.
///
/// # Examples
///
/// ```
/// use modelbind_schema::validators::{MaxLengthValidator, Validator};
/// use modelbind_schema::Value;
///
/// let v = MaxLengthValidator::new(5);
/// assert!(v.validate(&Value::from("hi")).is_ok());
/// assert!(v.validate(&Value::from("toolong")).is_err());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Checks `value`, returning an error describing the violation.
    fn validate(&self, value: &Value) -> Result<(), ValidationError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Length in characters of strings, or in elements of arrays.
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Rejects `null`, `undefined`, and blank strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredValidator;

impl Validator for RequiredValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let missing = match value {
            Value::Null | Value::Undefined => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        if missing {
            return Err(ValidationError::new("This field is required.", "required"));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "RequiredValidator"
    }
}

/// Caps the length of a string or array.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    /// The maximum allowed length.
    pub max_length: usize,
}

impl MaxLengthValidator {
    /// Creates a new `MaxLengthValidator`.
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match length(value) {
            Some(len) if len > self.max_length => Err(ValidationError::new(
                format!(
                    "Ensure this value has at most {} characters (it has {len}).",
                    self.max_length
                ),
                "max_length",
            )
            .with_param("limit_value", self.max_length.to_string())
            .with_param("show_value", len.to_string())),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MaxLengthValidator"
    }
}

/// Requires a minimum length of a string or array.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    /// The minimum required length.
    pub min_length: usize,
}

impl MinLengthValidator {
    /// Creates a new `MinLengthValidator`.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match length(value) {
            Some(len) if len < self.min_length => Err(ValidationError::new(
                format!(
                    "Ensure this value has at least {} characters (it has {len}).",
                    self.min_length
                ),
                "min_length",
            )
            .with_param("limit_value", self.min_length.to_string())
            .with_param("show_value", len.to_string())),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MinLengthValidator"
    }
}

/// Caps a numeric value.
#[derive(Debug, Clone)]
pub struct MaxValueValidator {
    /// The maximum allowed value.
    pub max_value: f64,
}

impl MaxValueValidator {
    /// Creates a new `MaxValueValidator`.
    pub const fn new(max_value: f64) -> Self {
        Self { max_value }
    }
}

impl Validator for MaxValueValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match numeric(value) {
            Some(n) if n > self.max_value => Err(ValidationError::new(
                format!(
                    "Ensure this value is less than or equal to {}.",
                    self.max_value
                ),
                "max_value",
            )
            .with_param("limit_value", self.max_value.to_string())),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MaxValueValidator"
    }
}

/// Requires a minimum numeric value.
#[derive(Debug, Clone)]
pub struct MinValueValidator {
    /// The minimum required value.
    pub min_value: f64,
}

impl MinValueValidator {
    /// Creates a new `MinValueValidator`.
    pub const fn new(min_value: f64) -> Self {
        Self { min_value }
    }
}

impl Validator for MinValueValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match numeric(value) {
            Some(n) if n < self.min_value => Err(ValidationError::new(
                format!(
                    "Ensure this value is greater than or equal to {}.",
                    self.min_value
                ),
                "min_value",
            )
            .with_param("limit_value", self.min_value.to_string())),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MinValueValidator"
    }
}

/// Requires strings to match a regular expression.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    regex: Regex,
    message: String,
    code: String,
}

impl RegexValidator {
    /// Compiles `pattern`. The pattern is searched, not anchored.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            message: "Enter a valid value.".to_string(),
            code: "invalid".to_string(),
        })
    }

    /// Overrides the error message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Overrides the error code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if let Value::String(s) = value {
            if !self.regex.is_match(s) {
                return Err(ValidationError::new(self.message.clone(), self.code.clone())
                    .with_param("pattern", self.regex.as_str()));
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "RegexValidator"
    }
}

/// Restricts a value to a fixed set of string tokens.
///
/// Enumerators are compared by their canonical value.
#[derive(Debug, Clone)]
pub struct ChoicesValidator {
    choices: Vec<String>,
}

impl ChoicesValidator {
    /// Creates a validator accepting only the given tokens.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepts the canonical values of an enum class.
    pub fn from_enum(ty: &EnumType) -> Self {
        Self::new(ty.values().iter().map(|e| e.value().to_string()))
    }
}

impl Validator for ChoicesValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let token = match value {
            Value::String(s) => s.as_str(),
            Value::Enum(e) => e.value(),
            _ => return Ok(()),
        };
        if self.choices.iter().any(|c| c == token) {
            return Ok(());
        }
        Err(ValidationError::new(
            format!("Value '{token}' is not a valid choice."),
            "invalid_choice",
        )
        .with_param("value", token))
    }

    fn name(&self) -> &str {
        "ChoicesValidator"
    }
}
