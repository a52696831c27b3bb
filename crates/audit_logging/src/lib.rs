#![deny(missing_docs)]
//! Shared logging utilities for the audit workspace.
//!
//! This crate provides the `audit_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.
//!
//! Every macro accepts an optional leading `workflow: <expr>,` argument. When
//! present, the message is prefixed with `[<workflow>]` so log lines from the
//! four audit workflows can be told apart in a shared log file.

#[doc(hidden)]
pub use log as __log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! audit_trace {
    (workflow: $workflow:expr, $($arg:tt)+) => {{
        $crate::__log::trace!("[{}] {}", $workflow, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::trace!($($arg)+);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! audit_debug {
    (workflow: $workflow:expr, $($arg:tt)+) => {{
        $crate::__log::debug!("[{}] {}", $workflow, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::debug!($($arg)+);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! audit_info {
    (workflow: $workflow:expr, $($arg:tt)+) => {{
        $crate::__log::info!("[{}] {}", $workflow, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::info!($($arg)+);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! audit_warn {
    (workflow: $workflow:expr, $($arg:tt)+) => {{
        $crate::__log::warn!("[{}] {}", $workflow, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::warn!($($arg)+);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! audit_error {
    (workflow: $workflow:expr, $($arg:tt)+) => {{
        $crate::__log::error!("[{}] {}", $workflow, format_args!($($arg)+));
    }};
    ($($arg:tt)+) => {{
        $crate::__log::error!($($arg)+);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test may already have installed the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
