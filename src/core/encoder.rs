//! Record encoders
//!
//! Two layouts are provided:
//! - Console: tab-separated, human-readable, one record per line
//! - Json: one JSON object per line with fixed keys
//!
//! Both render the same information (timestamp, level, caller, message and
//! every field pair); they only differ in framing.

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Output layout selected per sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable layout
    ///
    /// Example: `2025-01-08T10:30:45.123+0000	info	api/handler.rs:42	Request processed	{"user":"alice"}`
    #[default]
    Console,

    /// JSON layout
    ///
    /// Example: `{"L":"info","T":"2025-01-08T10:30:45.123+0000","C":"api/handler.rs:42","M":"Request processed","user":"alice"}`
    Json,
}

impl OutputFormat {
    /// Lenient parse: anything but exactly `json` selects the console layout.
    #[must_use]
    pub fn from_config(s: &str) -> Self {
        if s == "json" {
            OutputFormat::Json
        } else {
            OutputFormat::Console
        }
    }

    /// Build the encoder for this layout
    pub fn encoder(&self, config: EncoderConfig) -> Box<dyn Encoder> {
        match self {
            OutputFormat::Console => Box::new(ConsoleEncoder::new(config)),
            OutputFormat::Json => Box::new(JsonEncoder::new(config)),
        }
    }
}

/// Key names and rendering options shared by both encoders.
///
/// An empty key omits that element from JSON output and from the console
/// layout alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub line_ending: String,
    pub timestamp_format: TimestampFormat,
    /// Colorize the level name in console output
    pub color_level: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "T".to_string(),
            level_key: "L".to_string(),
            caller_key: "C".to_string(),
            message_key: "M".to_string(),
            line_ending: "\n".to_string(),
            timestamp_format: TimestampFormat::default(),
            color_level: false,
        }
    }
}

impl EncoderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An invalid custom format is replaced by the default layout.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        if format.is_valid() {
            self.timestamp_format = format;
        } else {
            eprintln!("[WARN] Invalid timestamp format {:?}, using ISO-8601", format);
            self.timestamp_format = TimestampFormat::default();
        }
        self
    }

    #[must_use]
    pub fn with_line_ending(mut self, ending: impl Into<String>) -> Self {
        self.line_ending = ending.into();
        self
    }

    #[must_use]
    pub fn with_color_level(mut self, enabled: bool) -> Self {
        self.color_level = enabled;
        self
    }

    #[must_use]
    pub fn with_keys(
        mut self,
        time: impl Into<String>,
        level: impl Into<String>,
        caller: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.time_key = time.into();
        self.level_key = level.into();
        self.caller_key = caller.into();
        self.message_key = message.into();
        self
    }
}

/// Turns a record into the bytes written to a destination.
pub trait Encoder: Send + Sync {
    fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>>;
    fn name(&self) -> &str;
}

/// Tab-separated human-readable encoder
#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Keep one record per line by escaping line breaks and tabs.
    fn sanitize(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    fn level_str(&self, entry: &LogEntry) -> String {
        #[cfg(feature = "color")]
        if self.config.color_level {
            use colored::Colorize;
            return entry
                .level
                .as_str()
                .color(entry.level.color_code())
                .to_string();
        }
        entry.level.as_str().to_string()
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let config = &self.config;
        let mut columns: Vec<String> = Vec::with_capacity(5);

        if !config.time_key.is_empty() {
            columns.push(config.timestamp_format.format(&entry.timestamp));
        }
        if !config.level_key.is_empty() {
            columns.push(self.level_str(entry));
        }
        if !config.caller_key.is_empty() {
            if let Some(caller) = entry.caller {
                columns.push(caller.short());
            }
        }
        if !config.message_key.is_empty() {
            columns.push(Self::sanitize(&entry.message));
        }

        let mut buf = columns.join("\t").into_bytes();

        if !entry.fields.is_empty() {
            if !buf.is_empty() {
                buf.push(b'\t');
            }
            buf.push(b'{');
            for (i, (key, value)) in entry.fields.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_json_pair(&mut buf, key, value)?;
            }
            buf.push(b'}');
        }

        buf.extend_from_slice(config.line_ending.as_bytes());
        Ok(buf)
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// One JSON object per record
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let config = &self.config;
        let mut buf = Vec::with_capacity(128 + entry.message.len());
        let mut first = true;
        let mut sep = |buf: &mut Vec<u8>| {
            if !first {
                buf.push(b',');
            }
            first = false;
        };

        buf.push(b'{');

        if !config.level_key.is_empty() {
            sep(&mut buf);
            write_json_pair(&mut buf, &config.level_key, entry.level.as_str())?;
        }
        if !config.time_key.is_empty() {
            sep(&mut buf);
            let rendered = config.timestamp_format.format(&entry.timestamp);
            if config.timestamp_format.is_numeric() {
                serde_json::to_writer(&mut buf, config.time_key.as_str())?;
                buf.push(b':');
                buf.extend_from_slice(rendered.as_bytes());
            } else {
                write_json_pair(&mut buf, &config.time_key, &rendered)?;
            }
        }
        if !config.caller_key.is_empty() {
            if let Some(caller) = entry.caller {
                sep(&mut buf);
                write_json_pair(&mut buf, &config.caller_key, &caller.short())?;
            }
        }
        if !config.message_key.is_empty() {
            sep(&mut buf);
            write_json_pair(&mut buf, &config.message_key, &entry.message)?;
        }
        for (key, value) in entry.fields.iter() {
            sep(&mut buf);
            write_json_pair(&mut buf, key, value)?;
        }

        buf.push(b'}');
        buf.extend_from_slice(config.line_ending.as_bytes());
        Ok(buf)
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// `"key":"value"` with JSON string escaping. Emitted pair by pair, so field
/// order and duplicate keys are preserved.
fn write_json_pair(buf: &mut Vec<u8>, key: &str, value: &str) -> Result<()> {
    serde_json::to_writer(&mut *buf, key)?;
    buf.write_all(b":")?;
    serde_json::to_writer(&mut *buf, value)?;
    Ok(())
}
