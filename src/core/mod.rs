//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod encoder;
pub mod error;
pub mod fields;
pub mod global;
pub mod level_filter;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod timestamp;

pub use appender::Appender;
pub use config::{Config, OutputConfig, WriteConfig, WriterKind};
pub use encoder::{ConsoleEncoder, Encoder, EncoderConfig, JsonEncoder, OutputFormat};
pub use error::{LoggerError, Result};
pub use fields::Fields;
pub use global::{default_logger, set_default_logger};
pub use level_filter::{LevelFilter, LevelOp};
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::LoggerMetrics;
pub use sink::{Core, Sink};
pub use timestamp::TimestampFormat;
