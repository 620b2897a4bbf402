//! Fan-out logger handle

use super::{
    config::{Config, OutputConfig},
    error::{LoggerError, Result},
    fields::Fields,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::{Core, Sink},
};
use crate::appenders::ConsoleAppender;
use crate::core::encoder::{ConsoleEncoder, EncoderConfig};
use crate::core::level_filter::LevelFilter;
use std::fmt;
use std::sync::Arc;

/// Exit status used after a fatal record has been emitted.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Logger handle that fans every record out to its sinks.
///
/// The sink list is fixed at construction and shared by reference between a
/// logger and all handles derived from it with [`Logger::with_field`];
/// handles differ only in their field set. Cloning is cheap and every handle
/// is safe to use from many threads at once.
///
/// # Example
///
/// ```
/// use rust_logger_facade::{Config, LevelOp, LogLevel, Logger, OutputConfig};
///
/// let config = Config::new(vec![OutputConfig::console()
///     .with_level(LogLevel::Info)
///     .with_level_op(LevelOp::Ge)]);
/// let logger = Logger::new(&config).unwrap();
///
/// let request = logger.with_field(&["request_id", "abc-123"]);
/// request.debugf(format_args!("not emitted: {}", 1));
/// request.infof(format_args!("x={}", 5));
/// request.sync().unwrap();
/// ```
#[derive(Clone)]
pub struct Logger {
    sinks: Arc<Vec<Box<dyn Sink>>>,
    fields: Fields,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Build one sink per configuration entry, in order.
    ///
    /// # Errors
    ///
    /// Returns error if a file sink cannot open its log file.
    pub fn new(config: &Config) -> Result<Self> {
        let sinks = config
            .outputs()
            .iter()
            .map(|output| Core::from_config(output).map(|core| Box::new(core) as Box<dyn Sink>))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_sinks(sinks))
    }

    pub fn from_sinks(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self {
            sinks: Arc::new(sinks),
            fields: Fields::new(),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// A logger with no sinks; every call except `fatal` is a no-op.
    pub fn noop() -> Self {
        Self::from_sinks(Vec::new())
    }

    /// Single stdout sink, console layout, `>=debug`.
    pub fn default_console() -> Self {
        let core = Core::new(
            Box::new(ConsoleEncoder::new(EncoderConfig::default())),
            LevelFilter::at_least(LogLevel::Debug),
            Box::new(ConsoleAppender::new()),
        );
        Self::from_sinks(vec![Box::new(core)])
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Whether at least one sink would emit a record at `level`.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.sinks.iter().any(|sink| sink.enabled(level))
    }

    /// Derive a handle whose fields are this handle's followed by the flat
    /// `[k1, v1, k2, v2, ...]` pairs. A dangling trailing key is ignored.
    #[must_use]
    pub fn with_field<S: AsRef<str>>(&self, pairs: &[S]) -> Logger {
        Logger {
            sinks: Arc::clone(&self.sinks),
            fields: self.fields.extended(pairs),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Derive a handle carrying `fields` after this handle's own.
    #[must_use]
    pub fn with_fields(&self, fields: &Fields) -> Logger {
        Logger {
            sinks: Arc::clone(&self.sinks),
            fields: self.fields.concat(fields),
            metrics: Arc::clone(&self.metrics),
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every sink, continuing past failures.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::SyncFailed`] listing every sink that failed.
    pub fn sync(&self) -> Result<()> {
        let failures: Vec<String> = self
            .sinks
            .iter()
            .filter_map(|sink| sink.sync().err().map(|e| format!("{}: {}", sink.name(), e)))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            self.metrics.record_sync_failure();
            Err(LoggerError::SyncFailed { failures })
        }
    }

    /// Log a message built from any `Display` value.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(level, message.to_string(), Caller::capture());
    }

    /// Log pre-captured format arguments (see the `info!` family of macros).
    #[track_caller]
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let message = match args.as_str() {
            Some(literal) => literal.to_string(),
            None => fmt::format(args),
        };
        self.dispatch(level, message, Caller::capture());
    }

    /// Offer one record to every sink. A failing or panicking sink does not
    /// keep the record from the others.
    fn dispatch(&self, level: LogLevel, message: String, caller: Caller) {
        let entry = LogEntry::new(level, message)
            .with_caller(caller)
            .with_fields(self.fields.clone());

        let mut emitted = false;
        for (idx, sink) in self.sinks.iter().enumerate() {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.maybe_emit(&entry)));

            match result {
                Ok(Ok(written)) => emitted |= written,
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink #{} ({}) failed: {}", idx, sink.name(), e);
                    self.metrics.record_write_failure();
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Sink #{} ({}) panicked: {}. \
                         Other sinks continue to function.",
                        idx,
                        sink.name(),
                        panic_msg
                    );
                    self.metrics.record_write_failure();
                }
            }
        }

        if emitted {
            self.metrics.record_logged();
        }
    }

    #[track_caller]
    fn terminate(&self, message: String) -> ! {
        if self.enabled(LogLevel::Fatal) {
            self.dispatch(LogLevel::Fatal, message, Caller::capture());
        }
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to sync before exit: {}", e);
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    #[track_caller]
    #[inline]
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(LogLevel::Trace, message);
    }

    #[track_caller]
    #[inline]
    pub fn tracef(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Trace, args);
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    #[inline]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Debug, args);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    #[inline]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Info, args);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    #[inline]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Warn, args);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    #[inline]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Error, args);
    }

    /// Emit at fatal level to every sink that accepts it, sync, then exit the
    /// process with status 1. Never returns.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.terminate(message.to_string())
    }

    /// Formatted form of [`Logger::fatal`]. Never returns.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.terminate(fmt::format(args))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field(
                "sinks",
                &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("fields", &self.fields)
            .finish()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::default_console()
    }
}

enum Pending {
    Sink(Box<dyn Sink>),
    Output(OutputConfig),
}

/// Builder for constructing a Logger with a fluent API
///
/// Sinks keep the order in which they were added, whether given directly or
/// as configuration entries.
///
/// # Example
/// ```
/// use rust_logger_facade::prelude::*;
///
/// let logger = Logger::builder()
///     .output(OutputConfig::console().with_level(LogLevel::Warn))
///     .field("service", "billing")
///     .build()
///     .unwrap();
/// assert_eq!(logger.sink_count(), 1);
/// ```
pub struct LoggerBuilder {
    pending: Vec<Pending>,
    fields: Fields,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            fields: Fields::new(),
        }
    }

    /// Add a ready-made sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.pending.push(Pending::Sink(Box::new(sink)));
        self
    }

    /// Add a sink described by a configuration entry
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: OutputConfig) -> Self {
        self.pending.push(Pending::Output(output));
        self
    }

    /// Add every entry of a configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: Config) -> Self {
        self.pending
            .extend(config.output.into_iter().map(Pending::Output));
        self
    }

    /// Add a field carried by every record of the built logger
    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields = self.fields.with(key, value);
        self
    }

    /// # Errors
    ///
    /// Returns error if a configured file sink cannot open its log file.
    pub fn build(self) -> Result<Logger> {
        let sinks = self
            .pending
            .into_iter()
            .map(|pending| match pending {
                Pending::Sink(sink) => Ok(sink),
                Pending::Output(output) => {
                    Core::from_config(&output).map(|core| Box::new(core) as Box<dyn Sink>)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let mut logger = Logger::from_sinks(sinks);
        logger.fields = self.fields;
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
