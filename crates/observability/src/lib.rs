//! `stockroom-observability` — shared tracing setup.
//!
//! One entry point so every binary (and test harness) configures logging
//! the same way.

pub mod tracing;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
