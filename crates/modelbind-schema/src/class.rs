//! Class schemas and the declaration surface used to register them.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use modelbind_core::{BindError, BindResult};

use crate::enums::{EnumTable, EnumeratorDecl};
use crate::fields::{FieldDefault, FieldSchema};
use crate::record::Record;

/// Whether a class is a model or an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassCategory {
    /// A record type with fields.
    Model,
    /// A closed set of enumerators.
    Enum,
}

/// Everything the engine knows about one registered class.
///
/// A schema only lists the fields its own class declares. Inherited fields
/// are reached through the explicit [`parent`](Self::parent) link, and
/// [`lineage`](Self::lineage) yields the chain root first.
#[derive(Debug)]
pub struct ClassSchema {
    name: Arc<str>,
    category: ClassCategory,
    parent: Option<Arc<ClassSchema>>,
    fields: Vec<FieldSchema>,
    name_field: Option<String>,
    next_id: AtomicU64,
    enum_table: Option<Arc<EnumTable>>,
    default_instance: RwLock<Option<Arc<Record>>>,
}

impl ClassSchema {
    /// The schema of a class nothing was registered for: a model with no
    /// fields and no parent.
    pub fn empty(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            category: ClassCategory::Model,
            parent: None,
            fields: Vec::new(),
            name_field: None,
            next_id: AtomicU64::new(1),
            enum_table: None,
            default_instance: RwLock::new(None),
        }
    }

    /// The class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> ClassCategory {
        self.category
    }

    pub fn is_model(&self) -> bool {
        self.category == ClassCategory::Model
    }

    pub fn is_enum(&self) -> bool {
        self.category == ClassCategory::Enum
    }

    /// The parent class, if any.
    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// Fields declared by this class itself, in declaration order.
    pub fn own_fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// A field declared by this class itself.
    pub fn own_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// A field declared by this class or any ancestor.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.lineage().into_iter().find_map(|level| level.own_field(name))
    }

    /// The level of the chain that declares `name`.
    pub fn declaring_class(&self, name: &str) -> Option<&Self> {
        self.lineage()
            .into_iter()
            .find(|level| level.own_field(name).is_some())
    }

    /// This class and its ancestors, root first.
    pub fn lineage(&self) -> Vec<&Self> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = current.parent.as_deref() {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// All fields along the chain, root first, each paired with its declaring class.
    pub fn all_fields(&self) -> Vec<(&Self, &FieldSchema)> {
        self.lineage()
            .into_iter()
            .flat_map(|level| level.fields.iter().map(move |f| (level, f)))
            .collect()
    }

    /// The field used as a display name, looked up along the chain.
    pub fn name_field(&self) -> Option<&str> {
        self.name_field
            .as_deref()
            .or_else(|| self.parent.as_deref().and_then(Self::name_field))
    }

    /// Returns the next identifier of this class. Starts at 1.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// The enumerator table, for enum classes.
    pub fn enum_table(&self) -> Option<&Arc<EnumTable>> {
        self.enum_table.as_ref()
    }

    /// Returns `true` if this class is `ancestor` or derives from it.
    pub fn is_subclass_of(&self, ancestor: &str) -> bool {
        self.lineage().iter().any(|level| level.name() == ancestor)
    }

    pub(crate) fn cached_default(&self) -> Option<Arc<Record>> {
        self.default_instance
            .read()
            .expect("default instance lock poisoned")
            .clone()
    }

    /// Stores `candidate` unless a valid default got there first, and
    /// returns whichever default is now cached.
    pub(crate) fn store_default(&self, candidate: Record) -> Arc<Record> {
        let mut slot = self
            .default_instance
            .write()
            .expect("default instance lock poisoned");
        if let Some(existing) = slot.as_ref() {
            if existing.class_name() == self.name() {
                return Arc::clone(existing);
            }
        }
        let candidate = Arc::new(candidate);
        *slot = Some(Arc::clone(&candidate));
        candidate
    }
}

/// Declares a class for registration.
///
/// # Examples
///
/// ```
/// use modelbind_schema::{ClassBuilder, EnumeratorDecl, FieldSchema, SchemaRegistry};
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register(
///         ClassBuilder::enum_class("Status")
///             .enumerator(EnumeratorDecl::new("ACTIVE", "Active").code("A")),
///     )
///     .unwrap();
/// registry
///     .register(
///         ClassBuilder::model("User")
///             .field(FieldSchema::new("name"))
///             .field(FieldSchema::new("status").class("Status").default_enum("ACTIVE"))
///             .name_field("name"),
///     )
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    category: ClassCategory,
    parent: Option<String>,
    fields: Vec<FieldSchema>,
    name_field: Option<String>,
    enumerators: Vec<EnumeratorDecl>,
}

impl ClassBuilder {
    /// Starts a model declaration.
    pub fn model(name: impl Into<String>) -> Self {
        Self::new(name.into(), ClassCategory::Model)
    }

    /// Starts an enum declaration.
    pub fn enum_class(name: impl Into<String>) -> Self {
        Self::new(name.into(), ClassCategory::Enum)
    }

    fn new(name: String, category: ClassCategory) -> Self {
        Self {
            name,
            category,
            parent: None,
            fields: Vec::new(),
            name_field: None,
            enumerators: Vec::new(),
        }
    }

    /// Derives from a registered model class.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declares a field.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares the display-name field.
    pub fn name_field(mut self, field: impl Into<String>) -> Self {
        self.name_field = Some(field.into());
        self
    }

    /// Declares an enumerator.
    pub fn enumerator(mut self, decl: EnumeratorDecl) -> Self {
        self.enumerators.push(decl);
        self
    }

    /// The name of the class being declared.
    pub fn class_name(&self) -> &str {
        &self.name
    }

    pub(crate) fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Validates the declaration and freezes it into a schema.
    pub(crate) fn build(self, parent: Option<Arc<ClassSchema>>) -> BindResult<ClassSchema> {
        let config = |msg: String| Err(BindError::ConfigurationError(msg));
        let name = self.name.trim();
        if name.is_empty() {
            return config("Class name must not be blank".to_string());
        }
        let class: Arc<str> = Arc::from(name);

        if let Some(parent) = &parent {
            if self.category == ClassCategory::Enum {
                return config(format!("Enum {class} cannot extend {}", parent.name()));
            }
            if !parent.is_model() {
                return config(format!("{class} cannot extend enum {}", parent.name()));
            }
        }

        let enum_table = match self.category {
            ClassCategory::Enum => {
                if !self.fields.is_empty() {
                    return config(format!("Enum {class} cannot declare fields"));
                }
                if self.name_field.is_some() {
                    return config(format!("Enum {class} cannot declare a name field"));
                }
                Some(Arc::new(EnumTable::build(&class, self.enumerators)?))
            }
            ClassCategory::Model => {
                if !self.enumerators.is_empty() {
                    return config(format!("Model {class} cannot declare enumerators"));
                }
                None
            }
        };

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return config(format!("{class} declares field '{}' twice", field.name));
            }
            if let Some(owner) = parent
                .as_deref()
                .and_then(|p| p.declaring_class(&field.name))
            {
                return config(format!(
                    "{class} redeclares field '{}' inherited from {}",
                    field.name,
                    owner.name()
                ));
            }
            check_default(&class, field)?;
        }

        if let Some(name_field) = &self.name_field {
            if let Some(inherited) = parent.as_deref().and_then(ClassSchema::name_field) {
                return config(format!(
                    "{class} declares name field '{name_field}' but already inherits '{inherited}'"
                ));
            }
            let declared = seen.contains(name_field.as_str())
                || parent
                    .as_deref()
                    .is_some_and(|p| p.field(name_field).is_some());
            if !declared {
                return config(format!("{class} has no field '{name_field}' to use as name"));
            }
        }

        Ok(ClassSchema {
            name: class,
            category: self.category,
            parent,
            fields: self.fields,
            name_field: self.name_field,
            next_id: AtomicU64::new(1),
            enum_table,
            default_instance: RwLock::new(None),
        })
    }
}

fn check_default(class: &str, field: &FieldSchema) -> BindResult<()> {
    match (&field.default, field.declared_class()) {
        (FieldDefault::Instance | FieldDefault::Enum(_), None) => {
            Err(BindError::ConfigurationError(format!(
                "{class}.{} has a class default but no declared class",
                field.name
            )))
        }
        (FieldDefault::Instance, Some(target)) if target == class => {
            Err(BindError::ConfigurationError(format!(
                "{class}.{} defaults to an instance of its own class",
                field.name
            )))
        }
        _ => Ok(()),
    }
}
