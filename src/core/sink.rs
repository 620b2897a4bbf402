//! Independently filtered, independently encoded log destinations

use super::appender::Appender;
use super::config::{OutputConfig, WriterKind};
use super::encoder::{Encoder, EncoderConfig};
use super::error::Result;
use super::level_filter::LevelFilter;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use crate::appenders::{ConsoleAppender, RotatingFileAppender};
use parking_lot::Mutex;

/// One emission unit of the fan-out.
///
/// A logger offers every record to each of its sinks; the sink alone decides
/// whether the record's level passes and how it is rendered.
pub trait Sink: Send + Sync {
    fn enabled(&self, level: LogLevel) -> bool;

    /// Encode and write a record that already passed [`Sink::enabled`].
    fn write(&self, entry: &LogEntry) -> Result<()>;

    /// Push buffered bytes to durable storage.
    fn sync(&self) -> Result<()>;

    fn name(&self) -> &str;

    /// Filter, then write. Returns whether the record was emitted.
    fn maybe_emit(&self, entry: &LogEntry) -> Result<bool> {
        if !self.enabled(entry.level) {
            return Ok(false);
        }
        self.write(entry)?;
        Ok(true)
    }
}

/// The standard sink: an encoder, a level filter and an appender.
///
/// The appender sits behind a mutex, so concurrent records reach it one
/// whole record at a time and file rotation never races with a write.
///
/// # Example
///
/// ```
/// use rust_logger_facade::appenders::ConsoleAppender;
/// use rust_logger_facade::{Core, EncoderConfig, LevelFilter, LogLevel, OutputFormat, Sink};
///
/// let core = Core::new(
///     OutputFormat::Json.encoder(EncoderConfig::default()),
///     LevelFilter::at_least(LogLevel::Warn),
///     Box::new(ConsoleAppender::new()),
/// );
/// assert!(!core.enabled(LogLevel::Info));
/// ```
pub struct Core {
    encoder: Box<dyn Encoder>,
    filter: LevelFilter,
    appender: Mutex<Box<dyn Appender>>,
    name: String,
}

impl Core {
    pub fn new(encoder: Box<dyn Encoder>, filter: LevelFilter, appender: Box<dyn Appender>) -> Self {
        let name = format!("{}/{}", appender.name(), encoder.name());
        Self {
            encoder,
            filter,
            appender: Mutex::new(appender),
            name,
        }
    }

    /// Build a sink from one configuration entry.
    ///
    /// # Errors
    ///
    /// Returns error if a file sink's log file cannot be created or opened.
    pub fn from_config(output: &OutputConfig) -> Result<Self> {
        let appender: Box<dyn Appender> = match output.writer_kind() {
            WriterKind::Console => Box::new(ConsoleAppender::new()),
            WriterKind::File => Box::new(RotatingFileAppender::from_config(&output.write_config)?),
        };
        Ok(Self::new(
            output.output_format().encoder(EncoderConfig::default()),
            output.level_filter(),
            appender,
        ))
    }

    pub fn filter(&self) -> LevelFilter {
        self.filter
    }
}

impl Sink for Core {
    #[inline]
    fn enabled(&self, level: LogLevel) -> bool {
        self.filter.enabled(level)
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        let encoded = self.encoder.encode(entry)?;
        self.appender.lock().append(&encoded)
    }

    fn sync(&self) -> Result<()> {
        self.appender.lock().flush()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
