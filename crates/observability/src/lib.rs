//! Tracing and logging setup shared by the formbook binaries and tests.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize human-readable logging for tests.
///
/// Output goes through the test writer so it is captured per test.
pub fn init_for_tests() {
    tracing::init_pretty_for_tests();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
