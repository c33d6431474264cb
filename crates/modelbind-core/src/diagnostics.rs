//! Non-fatal diagnostics emitted while binding.
//!
//! The binding engine never fails on naming or built-in type drift; it reports
//! a [`Diagnostic`] to a [`DiagnosticSink`] and carries on. The default sink
//! forwards to `tracing`; tests and tools can swap in a [`CollectingSink`].

use std::fmt;
use std::sync::{Arc, RwLock};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// A hint for the developer; the result is unaffected.
    Warning,
    /// Source data was discarded and replaced by a default.
    Error,
}

/// A single diagnostic produced during binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The expected source key was absent but a differently styled key exists.
    NamingMismatch {
        /// The class whose field was being bound.
        class: String,
        /// The field name on the target.
        field: String,
        /// The key that was looked up on the source.
        expected_key: String,
        /// The similar key that was found instead.
        found_key: String,
    },
    /// A value did not match the built-in type declared for its field.
    TypeMismatch {
        /// Dotted path of the field.
        path: String,
        /// The declared type.
        expected: String,
        /// The runtime kind of the value.
        found: String,
    },
    /// A collection field received something other than an array.
    ArrayExpected {
        /// Dotted path of the field.
        path: String,
        /// The runtime kind of the value.
        found: String,
    },
}

impl Diagnostic {
    /// Returns the severity of this diagnostic.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NamingMismatch { .. } | Self::TypeMismatch { .. } => Severity::Warning,
            Self::ArrayExpected { .. } => Severity::Error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamingMismatch {
                class,
                field,
                expected_key,
                found_key,
            } => write!(
                f,
                "{class}.{field}: source has no key '{expected_key}' but has '{found_key}'; check the naming style options"
            ),
            Self::TypeMismatch {
                path,
                expected,
                found,
            } => write!(f, "{path}: declared as {expected} but the value is {found}"),
            Self::ArrayExpected { path, found } => write!(
                f,
                "{path}: expected an array but the value is {found}; the default was used"
            ),
        }
    }
}

/// Receives diagnostics from the binding engine.
pub trait DiagnosticSink: Send + Sync {
    /// Handles one diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing` at `warn` or `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => tracing::warn!(target: "modelbind::diagnostics", "{diagnostic}"),
            Severity::Error => tracing::error!(target: "modelbind::diagnostics", "{diagnostic}"),
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: RwLock<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty sink wrapped in an `Arc`, ready to hand to a binder.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns a snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.read().expect("diagnostics lock poisoned").clone()
    }

    /// Returns the number of diagnostics reported so far.
    pub fn len(&self) -> usize {
        self.entries.read().expect("diagnostics lock poisoned").len()
    }

    /// Returns `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all collected diagnostics.
    pub fn clear(&self) {
        self.entries.write().expect("diagnostics lock poisoned").clear();
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.entries
            .write()
            .expect("diagnostics lock poisoned")
            .push(diagnostic.clone());
    }
}
