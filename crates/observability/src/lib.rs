//! Tracing/logging setup shared by every dashboard entry point.

/// Initialize process-wide observability with the default settings.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&tracing::LogSettings::default());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};
