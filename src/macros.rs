//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The message is
//! only rendered when at least one sink of the logger accepts the level.
//!
//! # Examples
//!
//! ```
//! use rust_logger_facade::prelude::*;
//! use rust_logger_facade::info;
//!
//! let logger = Logger::default_console();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Derived handles carry their fields into every record
//! let session = logger.with_field(&["user_id", "42"]);
//! info!(session, "User performed action: {}", "login");
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::default_console();
/// use rust_logger_facade::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, ::std::format_args!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::new(&Config::new(vec![
/// #     OutputConfig::console().with_level(LogLevel::Trace),
/// # ])).unwrap();
/// use rust_logger_facade::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $logger.tracef(::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::default_console();
/// use rust_logger_facade::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(::std::format_args!($($arg)+))
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::default_console();
/// use rust_logger_facade::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::default_console();
/// use rust_logger_facade::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(::std::format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::default_console();
/// use rust_logger_facade::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::std::format_args!($($arg)+))
    };
}

/// Log a fatal-level message, sync every sink and exit the process with
/// status 1.
///
/// # Examples
///
/// ```no_run
/// # use rust_logger_facade::prelude::*;
/// # let logger = Logger::default_console();
/// use rust_logger_facade::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::std::format_args!($($arg)+))
    };
}
