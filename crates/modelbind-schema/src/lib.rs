//! # modelbind-schema
//!
//! The data model of the binding engine: dynamic [`Value`]s, typed
//! [`Record`]s, per-class [`ClassSchema`]s with their [`FieldSchema`]s,
//! frozen [`Enumerator`] singletons, and the thread-safe [`SchemaRegistry`]
//! that owns them.
//!
//! ## Module Overview
//!
//! - [`value`] - The dynamic [`Value`] enum and JSON conversions
//! - [`record`] - [`Record`], an instance of a registered class
//! - [`fields`] - Field declarations, type references, and normalizers
//! - [`class`] - [`ClassSchema`] and the [`ClassBuilder`] declaration surface
//! - [`enums`] - Enumerators and token resolution
//! - [`registry`] - The [`SchemaRegistry`] and default-instance cache
//! - [`validators`] - Field validators

#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::result_large_err)]

pub mod class;
pub mod enums;
pub mod fields;
pub mod record;
pub mod registry;
pub mod validators;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use class::{ClassBuilder, ClassCategory, ClassSchema};
pub use enums::{EnumTable, EnumType, Enumerator, EnumeratorDecl};
pub use fields::{
    BuiltinType, FieldDefault, FieldSchema, NormalizeContext, NormalizeFn, Normalizer, TypeRef,
};
pub use record::Record;
pub use registry::{SchemaRegistry, REGISTRY};
pub use validators::Validator;
pub use value::Value;
