//! Log entry structure

use super::fields::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt;
use std::panic::Location;

/// Source location of a logging call.
///
/// Captured with `#[track_caller]` on every public logging method, so the
/// location is the user's call site rather than a frame inside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    /// Location of the innermost caller not marked `#[track_caller]`.
    #[track_caller]
    #[inline]
    pub fn capture() -> Self {
        Location::caller().into()
    }

    /// `dir/file.rs:line`, keeping only the last directory component.
    pub fn short(&self) -> String {
        let file = self.file;
        let trimmed = match file.rfind(['/', '\\']) {
            Some(last) => match file[..last].rfind(['/', '\\']) {
                Some(prev) => &file[prev + 1..],
                None => file,
            },
            None => file,
        };
        format!("{}:{}", trimmed, self.line)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One log record, built once per call and offered to every sink.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub caller: Option<Caller>,
    pub fields: Fields,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            caller: None,
            fields: Fields::new(),
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_caller_keeps_last_directory() {
        let caller = Caller {
            file: "/home/dev/project/src/server/handler.rs",
            line: 42,
        };
        assert_eq!(caller.short(), "server/handler.rs:42");

        let bare = Caller {
            file: "main.rs",
            line: 7,
        };
        assert_eq!(bare.short(), "main.rs:7");

        let one_dir = Caller {
            file: "src/lib.rs",
            line: 1,
        };
        assert_eq!(one_dir.short(), "src/lib.rs:1");
    }

    #[test]
    fn test_capture_points_at_this_file() {
        let caller = Caller::capture();
        assert!(caller.file.ends_with("log_entry.rs"));
        assert!(caller.line > 0);
    }

    #[test]
    fn test_builder() {
        let entry = LogEntry::new(LogLevel::Warn, "disk almost full")
            .with_fields(Fields::from_flat(&["mount", "/var"]));
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.fields.len(), 1);
        assert!(entry.caller.is_none());
    }
}
