//! Process-wide logging setup shared by Expensa binaries.

/// Tracing subscriber configuration (filters, formatting).
pub mod tracing;

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

pub use tracing::{LogFormat, init_with};
