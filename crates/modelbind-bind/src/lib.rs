//! # modelbind-bind
//!
//! The engines that operate on registered schemas: recursive assignment of
//! source data into typed records, normalization of field values, and the
//! invocation of field validators.
//!
//! All three are methods on [`Binder`], which pairs a
//! [`SchemaRegistry`](modelbind_schema::SchemaRegistry) with a
//! [`DiagnosticSink`](modelbind_core::DiagnosticSink).
//!
//! ## Modules
//!
//! - [`assign`] - `assign`, `create`, and `create_array`
//! - [`normalize`] - Field normalization
//! - [`validate`] - `validate_field` and `full_clean`
//! - [`options`] - [`AssignOptions`] and [`FieldSelector`]

#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::result_large_err)]

pub mod assign;
pub mod normalize;
pub mod options;
pub mod validate;

pub use assign::Binder;
pub use options::{AssignOptions, FieldSelector};
pub use validate::ValidationOutcome;
