//! Settings for the modelbind engine.
//!
//! This module provides the [`Settings`] struct, which holds engine-wide
//! configuration, and [`LazySettings`], a globally-accessible, lazily-initialized
//! settings instance.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::naming::NamingStyle;

/// Defaults applied to every assignment unless the caller overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignSettings {
    /// Whether records are normalized after assignment.
    pub normalize: bool,
    /// Whether source keys are translated between naming styles.
    pub convert_naming: bool,
    /// The naming style of incoming source data.
    pub source_naming: NamingStyle,
    /// The naming style of record field names.
    pub target_naming: NamingStyle,
}

impl Default for AssignSettings {
    fn default() -> Self {
        Self {
            normalize: true,
            convert_naming: false,
            source_naming: NamingStyle::LowerUnderscore,
            target_naming: NamingStyle::LowerCamel,
        }
    }
}

/// Controls where binding diagnostics go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsSettings {
    /// When `false`, the default binder discards naming and type hints.
    pub enabled: bool,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// The complete set of engine settings.
///
/// # Examples
///
/// ```
/// use modelbind_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.assign.normalize);
/// assert!(!settings.assign.convert_naming);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "modelbind=debug").
    pub log_level: String,

    // ── Binding ──────────────────────────────────────────────────────

    /// Assignment defaults.
    pub assign: AssignSettings,
    /// Diagnostic output.
    pub diagnostics: DiagnosticsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            assign: AssignSettings::default(),
            diagnostics: DiagnosticsSettings::default(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Unlike a web
/// framework, a binding library must work without setup, so
/// [`get`](LazySettings::get) falls back to [`Settings::default`].
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called at most once, before first use.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured or read.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns the configured settings, initializing them with defaults if needed.
    pub fn get(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if settings have been configured or read.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
