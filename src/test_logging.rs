//! Test logging helpers.
//!
//! Available in unit tests and, behind the `test-internals` feature, to the
//! integration suites. Tests announce their phases and assert through the
//! logging macros so a failing run carries its own narrative.

use std::fmt;
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the test subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `trace` for this crate so the drive loop's
/// events show up in failing test output.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("entigen=trace"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Backs [`test_phase!`](crate::test_phase).
pub fn phase(name: &str) {
    tracing::info!(phase = %name, "test phase");
}

/// Backs the passing arm of [`assert_with_log!`](crate::assert_with_log).
pub fn check_passed(label: &str) {
    tracing::debug!(check = %label, "check passed");
}

/// Backs the failing arm of [`assert_with_log!`](crate::assert_with_log).
///
/// # Panics
///
/// Always: that is the point.
pub fn check_failed(label: &str, expected: &dyn fmt::Debug, actual: &dyn fmt::Debug) -> ! {
    tracing::error!(check = %label, ?expected, ?actual, "check failed");
    panic!("check failed: {label} (expected {expected:?}, got {actual:?})");
}

/// Backs [`test_complete!`](crate::test_complete).
pub fn complete(name: &str) {
    tracing::info!(test = %name, "test complete");
}

/// Logs the start of a named test phase.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        $crate::test_logging::phase($name);
    };
}

/// Asserts `$cond`, logging the check either way.
///
/// `$expected` and `$actual` are only rendered on failure.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $label:expr, $expected:expr, $actual:expr) => {
        if $cond {
            $crate::test_logging::check_passed($label);
        } else {
            $crate::test_logging::check_failed($label, &$expected, &$actual);
        }
    };
}

/// Logs the successful end of a named test.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        $crate::test_logging::complete($name);
    };
}
