//! Timestamp formatting utilities
//!
//! Record timestamps are captured in local time; each encoder renders them
//! through a [`TimestampFormat`].

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const ISO8601_LOCAL: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Timestamp layouts an encoder can render.
///
/// # Examples
///
/// ```
/// use rust_logger_facade::TimestampFormat;
/// use chrono::Local;
///
/// let rendered = TimestampFormat::Iso8601.format(&Local::now());
/// assert!(rendered.contains('T'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local time, milliseconds and numeric offset: `2025-01-08T18:30:45.123+0800`
    #[default]
    Iso8601,

    /// UTC with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601Utc,

    /// RFC 3339 with offset: `2025-01-08T18:30:45.123456789+08:00`
    Rfc3339,

    /// Milliseconds since the Unix epoch: `1736332245123`
    UnixMillis,

    /// Custom strftime format, rendered in local time. An invalid format
    /// renders as [`TimestampFormat::Iso8601`].
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format(ISO8601_LOCAL).to_string(),
            TimestampFormat::Iso8601Utc => datetime
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut rendered = String::new();
                match write!(rendered, "{}", datetime.format(format_str)) {
                    Ok(()) => rendered,
                    Err(_) => datetime.format(ISO8601_LOCAL).to_string(),
                }
            }
        }
    }

    /// Whether every specifier of a custom format is recognized.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            TimestampFormat::Custom(format_str) => {
                !StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error))
            }
            _ => true,
        }
    }

    /// Numeric formats are emitted unquoted by the JSON encoder.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}
