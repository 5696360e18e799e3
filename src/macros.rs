//! Logging macros for ergonomic log message formatting.
//!
//! These macros capture the call site (file, line and enclosing function)
//! and accept `format!`-style arguments. The level switch is checked before
//! the message is formatted, so disabled levels cost almost nothing.
//!
//! An optional `module = <id>` argument tags the record with a module id;
//! without it the record belongs to module `0`.
//!
//! # Examples
//!
//! ```
//! use fanout_logger::prelude::*;
//! use fanout_logger::{info, warn};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let logger = Logger::builder().base_dir(dir.path()).module(2, "db").build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! warn!(logger, module = 2, "Slow query took {} ms", 1200);
//! ```

/// Name of the enclosing function, without its module path.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// Log a terminated line at the given level.
///
/// # Examples
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let dir = tempfile::tempdir().unwrap();
/// # let logger = Logger::builder().base_dir(dir.path()).build();
/// use fanout_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, module = 3, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, module = $module:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_level_on(level) {
            logger.submit(
                $crate::core::LogRecord::new(level, $module, ::std::format!($($arg)+))
                    .with_location(::std::file!(), ::std::line!(), $crate::__function_name!()),
            );
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::log!($logger, $level, module = 0, $($arg)+)
    };
}

/// Continuation write: like [`log!`] but without a line terminator.
///
/// # Examples
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let dir = tempfile::tempdir().unwrap();
/// # let logger = Logger::builder().base_dir(dir.path()).build();
/// use fanout_logger::log_append;
/// log_append!(logger, LogLevel::Info, "progress: {}%", 40);
/// ```
#[macro_export]
macro_rules! log_append {
    ($logger:expr, $level:expr, module = $module:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_level_on(level) {
            logger.submit(
                $crate::core::LogRecord::new(level, $module, ::std::format!($($arg)+))
                    .with_location(::std::file!(), ::std::line!(), $crate::__function_name!())
                    .with_mode($crate::core::WriteMode::Append),
            );
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $crate::log_append!($logger, $level, module = 0, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, module = $module:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, module = $module, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, module = $module:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, module = $module, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, module = $module:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, module = $module, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, module = $module:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, module = $module, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, module = $module:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, module = $module, $($arg)+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
