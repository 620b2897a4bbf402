//! # Rust Logger Facade
//!
//! A structured logging facade that fans every record out to several
//! independently configured sinks.
//!
//! ## Features
//!
//! - **Per-sink filtering**: each sink has its own level threshold and comparison
//! - **Two layouts**: tab-separated console lines or one JSON object per line
//! - **Rotating files**: size-triggered rotation with age/count pruning and gzip
//! - **Contextual fields**: derived handles carry immutable key-value pairs
//! - **Thread Safe**: a record reaches each sink whole, never interleaved
//!
//! ## Example
//!
//! ```
//! use rust_logger_facade::prelude::*;
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     [[output]]
//!     writer = "console"
//!     formatter = "json"
//!     level = "info"
//!     "#,
//! )
//! .unwrap();
//!
//! let logger = Logger::new(&config).unwrap();
//! let logger = logger.with_field(&["service", "api"]);
//! rust_logger_facade::info!(logger, "listening on {}", 8080);
//! logger.sync().unwrap();
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        default_logger, set_default_logger, Appender, Config, Fields, LevelFilter, LevelOp,
        LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, OutputConfig, OutputFormat,
        Result, Sink, WriteConfig,
    };
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    default_logger, set_default_logger, Appender, Caller, Config, ConsoleEncoder, Core, Encoder,
    EncoderConfig, Fields, JsonEncoder, LevelFilter, LevelOp, LogEntry, LogLevel, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, OutputConfig, OutputFormat, Result, Sink,
    TimestampFormat, WriteConfig, WriterKind, FATAL_EXIT_CODE,
};
