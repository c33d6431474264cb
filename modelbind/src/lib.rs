//! # modelbind
//!
//! Schema-driven recursive data binding.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access, and wraps the global registry in free functions. Declare classes
//! once with [`register`], then bind plain data with [`create`] or
//! [`assign`].
//!
//! ```
//! use modelbind::prelude::*;
//! use serde_json::json;
//!
//! modelbind::register(
//!     ClassBuilder::enum_class("DocStatus")
//!         .enumerator(EnumeratorDecl::new("ACTIVE", "Active").code("A"))
//!         .enumerator(EnumeratorDecl::new("CLOSED", "Closed").code("C")),
//! )
//! .unwrap();
//! modelbind::register(
//!     ClassBuilder::model("DocTicket")
//!         .field(FieldSchema::new("title").normalized())
//!         .field(FieldSchema::new("status").class("DocStatus").default_enum("ACTIVE")),
//! )
//! .unwrap();
//!
//! let ticket = modelbind::create(
//!     "DocTicket",
//!     &Value::from(json!({"title": "  Broken build ", "status": "C"})),
//!     &AssignOptions::default(),
//! )
//! .unwrap()
//! .unwrap();
//! assert_eq!(ticket.value("title"), &Value::from("Broken build"));
//! assert_eq!(ticket.value("status").as_enum().unwrap().name(), "Closed");
//! ```

/// Error types, naming styles, diagnostics, settings, and logging.
pub use modelbind_core as core;

/// Values, records, class schemas, enumerators, and the registry.
pub use modelbind_schema as schema;

/// Assignment, normalization, and validation engines.
pub use modelbind_bind as bind;

pub use modelbind_bind::{AssignOptions, Binder, FieldSelector, ValidationOutcome};
pub use modelbind_core::{BindError, BindResult, NamingStyle};
pub use modelbind_schema::{Record, Value, REGISTRY};

use std::sync::Arc;

use modelbind_schema::{ClassBuilder, ClassSchema, EnumType};

/// Commonly used types, for glob import.
pub mod prelude {
    pub use modelbind_bind::{AssignOptions, Binder, FieldSelector};
    pub use modelbind_core::{BindError, BindResult, NamingStyle};
    pub use modelbind_schema::{
        BuiltinType, ClassBuilder, EnumeratorDecl, FieldSchema, Record, TypeRef, Value,
    };
}

/// Registers a class in the global registry.
pub fn register(builder: ClassBuilder) -> BindResult<Arc<ClassSchema>> {
    REGISTRY.register(builder)
}

/// Merges `source` into `target` using the global registry.
pub fn assign<'t>(
    target: &'t mut Record,
    source: &Value,
    options: &AssignOptions,
) -> BindResult<&'t mut Record> {
    Binder::global().assign(target, source, options)
}

/// Creates a record of `class` from `source` using the global registry.
pub fn create(class: &str, source: &Value, options: &AssignOptions) -> BindResult<Option<Record>> {
    Binder::global().create(class, source, options)
}

/// Creates one record of `class` per element of `source` using the global registry.
pub fn create_array(
    class: &str,
    source: &Value,
    options: &AssignOptions,
) -> BindResult<Option<Vec<Option<Record>>>> {
    Binder::global().create_array(class, source, options)
}

/// Normalizes the selected fields of `target` using the global registry.
pub fn normalize<'t>(target: &'t mut Record, fields: &FieldSelector) -> &'t mut Record {
    Binder::global().normalize(target, fields)
}

/// Returns a handle on a globally registered enum class.
pub fn enum_type(name: &str) -> BindResult<EnumType> {
    REGISTRY.enum_type(name)
}

/// Validates every field of `record` using the global registry.
pub fn full_clean(record: &Record) -> BindResult<()> {
    Binder::global().full_clean(record)
}
