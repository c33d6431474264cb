//! Field declarations for class schemas.
//!
//! A [`FieldSchema`] records everything the binding engine needs to know
//! about one field: its declared type or element type, nullability, label,
//! default, normalizer, and validators.

use std::fmt;
use std::sync::Arc;

use crate::validators::Validator;
use crate::value::Value;

/// Built-in value types that the engine clones as opaque data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// Accepts anything.
    Any,
    /// `true` / `false`.
    Bool,
    /// 64-bit integer.
    Int,
    /// Floating-point number; integers are accepted too.
    Float,
    /// UTF-8 string.
    String,
    /// UTC timestamp.
    Date,
    /// Ordered list.
    Array,
    /// Plain string-keyed object.
    Map,
}

impl BuiltinType {
    /// Returns `true` if the runtime shape of `value` fits this type.
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Any, _)
                | (Self::Bool, Value::Bool(_))
                | (Self::Int, Value::Int(_))
                | (Self::Float, Value::Float(_) | Value::Int(_))
                | (Self::String, Value::String(_))
                | (Self::Date, Value::Date(_))
                | (Self::Array, Value::Array(_))
                | (Self::Map, Value::Map(_))
        )
    }

    /// Returns the lowercase name of this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Date => "date",
            Self::Array => "array",
            Self::Map => "map",
        }
    }
}

/// A reference to the declared type of a field or of its elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A built-in type, cloned as-is.
    Builtin(BuiltinType),
    /// A registered model or enum class, by name.
    Class(String),
}

impl TypeRef {
    /// Shorthand for [`TypeRef::Class`].
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }
}

impl From<BuiltinType> for TypeRef {
    fn from(b: BuiltinType) -> Self {
        Self::Builtin(b)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(b) => f.write_str(b.as_str()),
            Self::Class(name) => f.write_str(name),
        }
    }
}

/// Where a field's value in the default instance comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// A literal value, deep-cloned into each new instance.
    Value(Value),
    /// A fresh instance of the field's declared model class.
    Instance,
    /// An enumerator of the field's declared enum class, resolved by token.
    Enum(String),
}

impl Default for FieldDefault {
    fn default() -> Self {
        Self::Value(Value::Undefined)
    }
}

/// Information handed to a normalizer function.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    /// The class declaring the field.
    pub class: &'a str,
    /// The field being normalized.
    pub field: &'a str,
    /// The declared element type, when normalizing collection elements.
    pub element_type: Option<&'a TypeRef>,
}

/// A user-supplied normalizer.
pub type NormalizeFn = Arc<dyn Fn(Value, &NormalizeContext<'_>) -> Value + Send + Sync>;

/// How a field's value is normalized.
#[derive(Clone)]
pub enum Normalizer {
    /// Trim strings, recurse into collections and records.
    Default,
    /// A custom function.
    Custom(NormalizeFn),
}

impl Normalizer {
    /// Wraps a closure as a custom normalizer.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Value, &NormalizeContext<'_>) -> Value + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Normalizer::Default"),
            Self::Custom(_) => write!(f, "Normalizer::Custom(..)"),
        }
    }
}

/// Complete declaration of one field.
///
/// # Examples
///
/// ```
/// use modelbind_schema::fields::{BuiltinType, FieldSchema, TypeRef};
///
/// let tags = FieldSchema::new("tags")
///     .array_of(BuiltinType::String)
///     .label("Tags");
/// assert_eq!(tags.element_type, Some(TypeRef::Builtin(BuiltinType::String)));
/// ```
#[derive(Debug)]
pub struct FieldSchema {
    /// The field name in the target naming style.
    pub name: String,
    /// The declared type of the field value.
    pub declared_type: Option<TypeRef>,
    /// The declared type of collection elements.
    pub element_type: Option<TypeRef>,
    /// Whether `null` is an acceptable value.
    pub nullable: bool,
    /// Human-readable name used in validation messages.
    pub label: String,
    /// The default value for new instances.
    pub default: FieldDefault,
    /// How the field is normalized, if at all.
    pub normalizer: Option<Normalizer>,
    /// Validators run by `full_clean`.
    pub validators: Vec<Box<dyn Validator>>,
}

impl FieldSchema {
    /// Creates an undeclared-type field whose default is `undefined`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let label = name.clone();
        Self {
            name,
            declared_type: None,
            element_type: None,
            nullable: false,
            label,
            default: FieldDefault::default(),
            normalizer: None,
            validators: Vec::new(),
        }
    }

    /// Declares the type of the field.
    pub fn of_type(mut self, ty: impl Into<TypeRef>) -> Self {
        self.declared_type = Some(ty.into());
        self
    }

    /// Declares the field as an instance of a registered class.
    pub fn class(self, name: impl Into<String>) -> Self {
        self.of_type(TypeRef::class(name))
    }

    /// Declares the field as an array with the given element type.
    pub fn array_of(mut self, element: impl Into<TypeRef>) -> Self {
        self.declared_type = Some(TypeRef::Builtin(BuiltinType::Array));
        self.element_type = Some(element.into());
        self
    }

    /// Sets whether `null` is acceptable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets a literal default.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    /// Defaults the field to a fresh instance of its declared class.
    pub fn default_instance(mut self) -> Self {
        self.default = FieldDefault::Instance;
        self
    }

    /// Defaults the field to the enumerator matching `token`.
    pub fn default_enum(mut self, token: impl Into<String>) -> Self {
        self.default = FieldDefault::Enum(token.into());
        self
    }

    /// Sets the normalizer.
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Uses the default normalizer.
    pub fn normalized(self) -> Self {
        self.normalizer(Normalizer::Default)
    }

    /// Uses a custom normalizer function.
    pub fn normalize_with<F>(self, f: F) -> Self
    where
        F: Fn(Value, &NormalizeContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.normalizer(Normalizer::custom(f))
    }

    /// Adds a validator.
    pub fn validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Returns the declared class name, if the field is declared as one.
    pub fn declared_class(&self) -> Option<&str> {
        match &self.declared_type {
            Some(TypeRef::Class(name)) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::MaxLengthValidator;

    #[test]
    fn test_builtin_matches() {
        assert!(BuiltinType::Float.matches(&Value::from(1)));
        assert!(BuiltinType::Float.matches(&Value::from(1.5)));
        assert!(!BuiltinType::Int.matches(&Value::from(1.5)));
        assert!(BuiltinType::Any.matches(&Value::Null));
        assert!(!BuiltinType::Array.matches(&Value::from("x")));
        assert!(BuiltinType::Map.matches(&Value::from(serde_json::json!({}))));
    }

    #[test]
    fn test_field_builder() {
        let f = FieldSchema::new("nickName")
            .of_type(BuiltinType::String)
            .nullable(true)
            .label("Nickname")
            .default_value(Value::Null)
            .normalized()
            .validator(Box::new(MaxLengthValidator::new(10)));

        assert_eq!(f.declared_type, Some(TypeRef::Builtin(BuiltinType::String)));
        assert!(f.nullable);
        assert_eq!(f.label, "Nickname");
        assert_eq!(f.default, FieldDefault::Value(Value::Null));
        assert!(matches!(f.normalizer, Some(Normalizer::Default)));
        assert_eq!(f.validators.len(), 1);
    }

    #[test]
    fn test_label_defaults_to_name() {
        let f = FieldSchema::new("age");
        assert_eq!(f.label, "age");
        assert_eq!(f.default, FieldDefault::Value(Value::Undefined));
        assert!(f.declared_class().is_none());
    }

    #[test]
    fn test_declared_class() {
        let f = FieldSchema::new("address").class("Address").default_instance();
        assert_eq!(f.declared_class(), Some("Address"));
        assert_eq!(f.default, FieldDefault::Instance);
    }

    #[test]
    fn test_custom_normalizer_called() {
        let n = Normalizer::custom(|v, ctx| {
            assert_eq!(ctx.field, "code");
            match v {
                Value::String(s) => Value::String(s.to_uppercase()),
                other => other,
            }
        });
        let Normalizer::Custom(f) = n else {
            panic!("expected custom normalizer");
        };
        let ctx = NormalizeContext {
            class: "Item",
            field: "code",
            element_type: None,
        };
        assert_eq!(f(Value::from("ab"), &ctx), Value::from("AB"));
    }
}
