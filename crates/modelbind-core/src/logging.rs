//! Logging integration for modelbind.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-assignment spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`. In debug mode a pretty,
/// human-readable format is used; otherwise a structured JSON format.
/// Installing a subscriber twice is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one top-level assignment.
///
/// # Examples
///
/// ```
/// use modelbind_core::logging::assign_span;
///
/// let span = assign_span("Person");
/// let _guard = span.enter();
/// tracing::debug!("binding");
/// ```
pub fn assign_span(class: &str) -> tracing::Span {
    tracing::debug_span!("assign", class = class)
}
