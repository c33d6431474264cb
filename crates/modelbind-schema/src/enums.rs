//! Enumerator singletons and token resolution.
//!
//! Every enum class owns a closed, frozen set of [`Enumerator`]s built once at
//! registration. A token resolves to one of them by trying, in this fixed
//! order, a case-insensitive match on the canonical value, an exact match on
//! the display name, and an exact match on the code.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use modelbind_core::{BindError, BindResult};

use crate::class::ClassSchema;
use crate::value::Value;

/// One frozen constant of an enum class.
///
/// Enumerators are only ever handed out as `Arc<Enumerator>`; cloning a
/// [`Value::Enum`] shares the same singleton.
#[derive(Debug, PartialEq)]
pub struct Enumerator {
    class: Arc<str>,
    value: String,
    name: String,
    code: Option<String>,
    i18n: Option<String>,
    extra: BTreeMap<String, Value>,
}

impl Enumerator {
    /// The enum class this enumerator belongs to.
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// The canonical token.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The optional short code.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The optional translation key.
    pub fn i18n(&self) -> Option<&str> {
        self.i18n.as_deref()
    }

    /// An extra payload field.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl fmt::Display for Enumerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Declaration of one enumerator, consumed at registration.
///
/// # Examples
///
/// ```
/// use modelbind_schema::enums::EnumeratorDecl;
///
/// let active = EnumeratorDecl::new("ACTIVE", "Active").code("A").i18n("status.active");
/// ```
#[derive(Debug, Clone)]
pub struct EnumeratorDecl {
    value: String,
    name: String,
    code: Option<String>,
    i18n: Option<String>,
    extra: BTreeMap<String, Value>,
}

impl EnumeratorDecl {
    /// Declares an enumerator with its canonical value and display name.
    pub fn new(value: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: name.into(),
            code: None,
            i18n: None,
            extra: BTreeMap::new(),
        }
    }

    /// Sets the short code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the translation key.
    pub fn i18n(mut self, key: impl Into<String>) -> Self {
        self.i18n = Some(key.into());
        self
    }

    /// Attaches an extra payload field.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// The frozen enumerator set of one enum class with its lookup indexes.
#[derive(Debug)]
pub struct EnumTable {
    class: Arc<str>,
    enumerators: Vec<Arc<Enumerator>>,
    by_value: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<String, usize>,
}

impl EnumTable {
    /// Freezes the declared enumerators of `class`.
    ///
    /// Values must be unique ignoring case; names and codes must be unique
    /// exactly. Collisions across attributes are allowed and settled by the
    /// resolution order.
    pub(crate) fn build(class: &Arc<str>, decls: Vec<EnumeratorDecl>) -> BindResult<Self> {
        let mut table = Self {
            class: Arc::clone(class),
            enumerators: Vec::with_capacity(decls.len()),
            by_value: HashMap::new(),
            by_name: HashMap::new(),
            by_code: HashMap::new(),
        };

        for decl in decls {
            let value = decl.value.trim().to_string();
            if value.is_empty() {
                return Err(BindError::ConfigurationError(format!(
                    "Enum {class} declares an enumerator with a blank value"
                )));
            }
            let index = table.enumerators.len();
            insert_unique(&mut table.by_value, value.to_lowercase(), index, class, "value")?;
            insert_unique(&mut table.by_name, decl.name.clone(), index, class, "name")?;
            if let Some(code) = &decl.code {
                insert_unique(&mut table.by_code, code.clone(), index, class, "code")?;
            }
            table.enumerators.push(Arc::new(Enumerator {
                class: Arc::clone(class),
                value,
                name: decl.name,
                code: decl.code,
                i18n: decl.i18n,
                extra: decl.extra,
            }));
        }
        Ok(table)
    }

    /// All enumerators in declaration order.
    pub fn values(&self) -> &[Arc<Enumerator>] {
        &self.enumerators
    }

    /// Resolves a string token, returning `None` for a blank token.
    pub fn of(&self, token: &str) -> BindResult<Option<Arc<Enumerator>>> {
        match self.resolve(&Value::from(token), &Value::Undefined)? {
            Value::Enum(e) => Ok(Some(e)),
            _ => Ok(None),
        }
    }

    /// Resolves any token to an enumerator value.
    ///
    /// - an enumerator of this class is returned unchanged;
    /// - `null` stays `null`;
    /// - `undefined` and blank strings yield `default`;
    /// - other strings are trimmed and matched by value, then name, then code;
    /// - everything else is a range error.
    pub fn resolve(&self, token: &Value, default: &Value) -> BindResult<Value> {
        match token {
            Value::Enum(e) if *e.class == *self.class => Ok(token.clone()),
            Value::Null => Ok(Value::Null),
            Value::Undefined => Ok(default.clone()),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(default.clone());
                }
                self.lookup(trimmed)
                    .map(|e| Value::Enum(Arc::clone(e)))
                    .ok_or_else(|| self.range_error(trimmed))
            }
            other => Err(self.range_error(&other.to_string())),
        }
    }

    fn lookup(&self, token: &str) -> Option<&Arc<Enumerator>> {
        self.by_value
            .get(&token.to_lowercase())
            .or_else(|| self.by_name.get(token))
            .or_else(|| self.by_code.get(token))
            .map(|&i| &self.enumerators[i])
    }

    fn range_error(&self, value: &str) -> BindError {
        BindError::EnumRange {
            class: self.class.to_string(),
            value: value.to_string(),
        }
    }
}

fn insert_unique(
    index: &mut HashMap<String, usize>,
    key: String,
    position: usize,
    class: &str,
    attribute: &str,
) -> BindResult<()> {
    if index.contains_key(&key) {
        return Err(BindError::ConfigurationError(format!(
            "Enum {class} declares the {attribute} '{key}' more than once"
        )));
    }
    index.insert(key, position);
    Ok(())
}

/// A handle on a registered enum class.
///
/// Obtained from [`SchemaRegistry::enum_type`](crate::registry::SchemaRegistry::enum_type).
#[derive(Debug, Clone)]
pub struct EnumType {
    schema: Arc<ClassSchema>,
    table: Arc<EnumTable>,
}

impl EnumType {
    pub(crate) fn new(schema: Arc<ClassSchema>) -> BindResult<Self> {
        let table = schema.enum_table().cloned().ok_or_else(|| {
            BindError::ConfigurationError(format!("{} is not an enum class", schema.name()))
        })?;
        Ok(Self { schema, table })
    }

    /// The class name.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// The class schema.
    pub fn schema(&self) -> &Arc<ClassSchema> {
        &self.schema
    }

    /// Resolves a string token; blank yields `None`.
    pub fn of(&self, token: &str) -> BindResult<Option<Arc<Enumerator>>> {
        self.table.of(token)
    }

    /// Resolves any token; see [`EnumTable::resolve`].
    pub fn resolve(&self, token: &Value, default: &Value) -> BindResult<Value> {
        self.table.resolve(token, default)
    }

    /// All enumerators in declaration order.
    pub fn values(&self) -> &[Arc<Enumerator>] {
        self.table.values()
    }
}
