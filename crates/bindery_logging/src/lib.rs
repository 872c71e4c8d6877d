#![deny(missing_docs)]
//! Shared logging utilities for the bindery workspace.
//!
//! Every crate logs through the `bindery_*` macros below so that the target
//! filter and the backing facade can be changed in one place.

#[doc(hidden)]
pub use log as __log;

/// Log target used by all `bindery_*` macros.
pub const TARGET: &str = "bindery";

/// Logs a trace-level message under the bindery target.
#[macro_export]
macro_rules! bindery_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the bindery target.
#[macro_export]
macro_rules! bindery_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the bindery target.
#[macro_export]
macro_rules! bindery_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the bindery target.
#[macro_export]
macro_rules! bindery_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the bindery target.
#[macro_export]
macro_rules! bindery_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from many tests: a second initialization is ignored.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
