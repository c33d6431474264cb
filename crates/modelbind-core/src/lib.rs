//! # modelbind-core
//!
//! Core types, settings, naming styles, and error types for the modelbind
//! binding engine. This crate has no dependency on the schema or binding layers
//! and provides the foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`naming`] - Identifier conversion between naming styles
//! - [`diagnostics`] - Pluggable sink for non-fatal binding diagnostics
//! - [`settings`] - Engine settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod naming;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NullSink, TracingSink};
pub use error::{BindError, BindResult, ErrorKind, ValidationError};
pub use naming::NamingStyle;
pub use settings::{Settings, SETTINGS};
