//! Declarative sink configuration
//!
//! A [`Config`] is an ordered list of [`OutputConfig`] entries, one per sink.
//! It can be built in code or loaded from TOML/JSON documents using the
//! schema below:
//!
//! ```toml
//! [[output]]
//! writer = "console"
//! formatter = "console"
//! level = "info"
//! level_op = ">="
//!
//! [[output]]
//! writer = "file"
//! formatter = "json"
//! level = "debug"
//!
//! [output.write_config]
//! filename = "/var/log/app/app.log"
//! max_size = 100
//! max_age = 7
//! max_backups = 10
//! compress = true
//! ```
//!
//! Every string-valued knob is interpreted leniently: unknown writers and
//! formatters fall back to console, unknown or empty levels to `debug` (the
//! lowest filtering tier, shared with `trace`) and
//! unknown operators to `>=`.

use super::encoder::OutputFormat;
use super::error::{LoggerError, Result};
use super::level_filter::{LevelFilter, LevelOp};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONSOLE_WRITER: &str = "console";
pub const FILE_WRITER: &str = "file";
pub const CONSOLE_FORMATTER: &str = "console";
pub const JSON_FORMATTER: &str = "json";

/// Destination kind of a sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriterKind {
    #[default]
    Console,
    File,
}

impl WriterKind {
    /// Lenient parse: anything but exactly `file` is a console writer.
    #[must_use]
    pub fn from_config(s: &str) -> Self {
        if s == FILE_WRITER {
            WriterKind::File
        } else {
            WriterKind::Console
        }
    }
}

/// Rotating-file settings, used when `writer = "file"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteConfig {
    /// Path of the active log file
    pub filename: String,
    /// Rotation threshold in megabytes (0 selects the 100 MB default)
    pub max_size: u64,
    /// Days to keep rotated files (0 keeps them regardless of age)
    pub max_age: u64,
    /// Number of rotated files to keep (0 keeps all)
    pub max_backups: usize,
    /// Gzip rotated files
    pub compress: bool,
}

impl WriteConfig {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_size(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes;
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, days: u64) -> Self {
        self.max_age = days;
        self
    }

    #[must_use]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// One sink's declarative configuration.
///
/// The string fields mirror the external schema verbatim; the typed
/// accessors apply the lenient interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `console` or `file`
    pub writer: String,
    pub write_config: WriteConfig,
    /// `console` or `json`
    pub formatter: String,
    /// `trace`, `debug`, `info`, `warn`, `error` or `fatal`
    pub level: String,
    /// `<`, `<=`, `>` or `>=`; empty means `>=`
    pub level_op: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            writer: CONSOLE_WRITER.to_string(),
            write_config: WriteConfig::default(),
            formatter: CONSOLE_FORMATTER.to_string(),
            level: LogLevel::Debug.as_str().to_string(),
            level_op: LevelOp::Ge.as_str().to_string(),
        }
    }
}

impl OutputConfig {
    /// Console sink, console layout, `>=debug`.
    pub fn console() -> Self {
        Self::default()
    }

    /// File sink, console layout, `>=debug`.
    pub fn file(write_config: WriteConfig) -> Self {
        Self {
            writer: FILE_WRITER.to_string(),
            write_config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, format: OutputFormat) -> Self {
        self.formatter = match format {
            OutputFormat::Console => CONSOLE_FORMATTER,
            OutputFormat::Json => JSON_FORMATTER,
        }
        .to_string();
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level.as_str().to_string();
        self
    }

    #[must_use]
    pub fn with_level_op(mut self, op: LevelOp) -> Self {
        self.level_op = op.as_str().to_string();
        self
    }

    pub fn writer_kind(&self) -> WriterKind {
        WriterKind::from_config(&self.writer)
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_config(&self.formatter)
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_config(&self.level, &self.level_op)
    }
}

/// Ordered list of sink configurations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: Vec<OutputConfig>,
}

impl Config {
    pub fn new(outputs: Vec<OutputConfig>) -> Self {
        Self { output: outputs }
    }

    /// The zero-configuration setup: a single console sink at `>=debug`.
    pub fn default_console() -> Self {
        Self::new(vec![OutputConfig::console()])
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output.push(output);
        self
    }

    pub fn outputs(&self) -> &[OutputConfig] {
        &self.output
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| LoggerError::config_parse("TOML", e.to_string()))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| LoggerError::config_parse("JSON", e.to_string()))
    }

    /// Load a `.toml` or `.json` file, picked by extension (TOML otherwise).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }
}

impl From<Vec<OutputConfig>> for Config {
    fn from(outputs: Vec<OutputConfig>) -> Self {
        Self::new(outputs)
    }
}
