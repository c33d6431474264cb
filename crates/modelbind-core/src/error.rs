//! Core error types for modelbind.
//!
//! This module provides the error enum [`BindError`] that covers configuration
//! errors, shape errors raised while binding source data, enum resolution
//! failures, validation errors, and serialization errors.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists).
///
/// # Examples
///
/// ```
/// use modelbind_core::error::ValidationError;
///
/// // Simple validation error
/// let err = ValidationError::new("This field is required.", "required");
///
/// // Field-level validation errors
/// let mut field_errors = std::collections::BTreeMap::new();
/// field_errors.insert(
///     "email".to_string(),
///     vec![ValidationError::new("Invalid email address.", "invalid")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "required", "invalid").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: BTreeMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: BTreeMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: BTreeMap::new(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: BTreeMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: BTreeMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut first = true;
            for (field, errors) in &self.field_errors {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Broad classification of a [`BindError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised at registration or first use; the schema itself is wrong.
    Configuration,
    /// The source data does not fit the declared type of a field.
    Shape,
    /// A declared validator rejected a value.
    Validation,
    /// Reading or decoding external input failed.
    Io,
}

/// The primary error type for modelbind.
///
/// Shape errors raised inside a typed or enum field propagate through the
/// whole recursive binding; there is no partial-success contract.
#[derive(Error, Debug)]
pub enum BindError {
    // ── Configuration ────────────────────────────────────────────────

    /// A schema declaration is malformed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A class was referenced by a declaration but never registered.
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    // ── Shape ────────────────────────────────────────────────────────

    /// A token could not be resolved to an enumerator of the given class.
    #[error("'{value}' is not a valid value of enum {class}")]
    EnumRange {
        /// The enum class name.
        class: String,
        /// A rendering of the offending token.
        value: String,
    },

    /// A source value does not have the shape its field declares.
    #[error("Shape error at '{path}': expected {expected}, found {found}")]
    ShapeError {
        /// Dotted path of the field being bound.
        path: String,
        /// The declared type.
        expected: String,
        /// The runtime kind of the source value.
        found: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BindError {
    /// Returns the broad category of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationError(_) | Self::UnknownClass(_) => ErrorKind::Configuration,
            Self::EnumRange { .. } | Self::ShapeError { .. } => ErrorKind::Shape,
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::SerializationError(_) | Self::IoError(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for building a [`BindError::ShapeError`].
    pub fn shape(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::ShapeError {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<ValidationError> for BindError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

impl From<serde_json::Error> for BindError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, BindError>`.
pub type BindResult<T> = Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("This field is required.", "required");
        assert_eq!(err.to_string(), "This field is required.");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(
            "email".to_string(),
            vec![ValidationError::new("Invalid email.", "invalid")],
        );
        let err = ValidationError::with_field_errors(field_errors);
        assert!(err.to_string().contains("email: Invalid email."));
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Too short.", "min_length").with_param("min", "8");
        assert_eq!(err.params.get("min").unwrap(), "8");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            BindError::ConfigurationError("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            BindError::UnknownClass("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            BindError::EnumRange {
                class: "Status".into(),
                value: "x".into()
            }
            .kind(),
            ErrorKind::Shape
        );
        assert_eq!(BindError::shape("a.b", "Address", "string").kind(), ErrorKind::Shape);
        assert_eq!(
            BindError::ValidationError(ValidationError::new("x", "y")).kind(),
            ErrorKind::Validation
        );
        assert_eq!(BindError::SerializationError("x".into()).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_enum_range_display_names_class_and_value() {
        let err = BindError::EnumRange {
            class: "Status".into(),
            value: "BOGUS".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Status"));
        assert!(msg.contains("BOGUS"));
    }

    #[test]
    fn test_shape_error_display() {
        let err = BindError::shape("owner.address", "Address", "string");
        assert_eq!(
            err.to_string(),
            "Shape error at 'owner.address': expected Address, found string"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BindError = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("file missing"));
    }
}
