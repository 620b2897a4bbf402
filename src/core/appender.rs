//! Appender trait for byte destinations

use super::error::Result;

/// Destination for encoded records.
///
/// A sink holds its appender behind a mutex, so implementations see one
/// record at a time and never need their own locking.
pub trait Appender: Send {
    /// Write one fully encoded record.
    fn append(&mut self, record: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
