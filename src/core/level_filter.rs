//! Per-sink level predicates

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied between a record's level and a sink's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    /// At or above the threshold. Also used for empty or unknown operators.
    #[default]
    #[serde(rename = ">=")]
    Ge,
}

impl LevelOp {
    /// Lenient parse: anything other than `<`, `<=`, `>` means `>=`.
    #[must_use]
    pub fn from_config(s: &str) -> Self {
        match s.trim() {
            "<" => LevelOp::Lt,
            "<=" => LevelOp::Le,
            ">" => LevelOp::Gt,
            _ => LevelOp::Ge,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelOp::Lt => "<",
            LevelOp::Le => "<=",
            LevelOp::Gt => ">",
            LevelOp::Ge => ">=",
        }
    }
}

impl fmt::Display for LevelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a sink emits records of a given level.
///
/// # Example
///
/// ```
/// use rust_logger_facade::{LevelFilter, LevelOp, LogLevel};
///
/// let only_chatter = LevelFilter::new(LogLevel::Info, LevelOp::Lt);
/// assert!(only_chatter.enabled(LogLevel::Debug));
/// assert!(!only_chatter.enabled(LogLevel::Info));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    threshold: LogLevel,
    op: LevelOp,
}

impl LevelFilter {
    #[must_use]
    pub const fn new(threshold: LogLevel, op: LevelOp) -> Self {
        Self { threshold, op }
    }

    /// `>=` filter, the usual "this severity and above".
    #[must_use]
    pub const fn at_least(threshold: LogLevel) -> Self {
        Self::new(threshold, LevelOp::Ge)
    }

    /// Build from raw configuration strings, applying the lenient defaults.
    #[must_use]
    pub fn from_config(level: &str, op: &str) -> Self {
        Self::new(LogLevel::from_config(level), LevelOp::from_config(op))
    }

    /// Compares [`LogLevel::severity`], so trace passes wherever debug does.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        let (l, t) = (level.severity(), self.threshold.severity());
        match self.op {
            LevelOp::Lt => l < t,
            LevelOp::Le => l <= t,
            LevelOp::Gt => l > t,
            LevelOp::Ge => l >= t,
        }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn op(&self) -> LevelOp {
        self.op
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::at_least(LogLevel::Debug)
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_operator() {
        let lt = LevelFilter::new(LogLevel::Warn, LevelOp::Lt);
        assert!(lt.enabled(LogLevel::Info));
        assert!(!lt.enabled(LogLevel::Warn));

        let le = LevelFilter::new(LogLevel::Warn, LevelOp::Le);
        assert!(le.enabled(LogLevel::Warn));
        assert!(!le.enabled(LogLevel::Error));

        let gt = LevelFilter::new(LogLevel::Warn, LevelOp::Gt);
        assert!(!gt.enabled(LogLevel::Warn));
        assert!(gt.enabled(LogLevel::Error));

        let ge = LevelFilter::new(LogLevel::Warn, LevelOp::Ge);
        assert!(ge.enabled(LogLevel::Warn));
        assert!(!ge.enabled(LogLevel::Info));
    }

    #[test]
    fn test_unknown_operator_means_at_least() {
        assert_eq!(LevelOp::from_config(""), LevelOp::Ge);
        assert_eq!(LevelOp::from_config("=="), LevelOp::Ge);
        assert_eq!(LevelOp::from_config(" <= "), LevelOp::Le);

        let filter = LevelFilter::from_config("info", "!=");
        assert!(filter.enabled(LogLevel::Info));
        assert!(filter.enabled(LogLevel::Fatal));
        assert!(!filter.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_unknown_level_lets_everything_through() {
        let filter = LevelFilter::from_config("noisy", ">=");
        for level in LogLevel::ALL {
            assert!(filter.enabled(level));
        }
    }

    #[test]
    fn test_trace_passes_debug_filter() {
        let default = LevelFilter::default();
        assert!(default.enabled(LogLevel::Trace));
        assert!(default.enabled(LogLevel::Debug));

        let below_info = LevelFilter::new(LogLevel::Info, LevelOp::Lt);
        assert!(below_info.enabled(LogLevel::Trace));

        let above_debug = LevelFilter::new(LogLevel::Debug, LevelOp::Gt);
        assert!(!above_debug.enabled(LogLevel::Trace));
        assert!(above_debug.enabled(LogLevel::Info));
    }

    #[test]
    fn test_empty_and_missing_level_agree() {
        assert_eq!(LevelFilter::from_config("", ""), LevelFilter::default());
        assert_eq!(LevelFilter::from_config("loud", ">="), LevelFilter::default());
    }

    #[test]
    fn test_display() {
        assert_eq!(LevelFilter::at_least(LogLevel::Info).to_string(), ">=info");
    }
}
