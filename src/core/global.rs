//! Process-wide default logger

use super::error::{LoggerError, Result};
use super::logger::Logger;
use std::sync::OnceLock;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger.
///
/// Returns the logger installed with [`set_default_logger`], or installs a
/// stdout console logger at `>=debug` on first use.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(Logger::default_console)
}

/// Install the process-wide logger. Only the first installation wins.
///
/// # Errors
///
/// Returns [`LoggerError::DefaultLoggerAlreadySet`] if a default logger was
/// already installed or [`default_logger`] was already called.
pub fn set_default_logger(logger: Logger) -> Result<()> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::DefaultLoggerAlreadySet)
}
