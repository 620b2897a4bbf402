//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::{self, Write};

enum Target {
    Stdout,
    Writer(Box<dyn Write + Send>),
}

/// Writes encoded records to standard output.
///
/// Every record is written while holding the process-wide stdout lock, so
/// records from concurrent threads (and from several console sinks) never
/// interleave mid-line.
pub struct ConsoleAppender {
    target: Target,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            target: Target::Stdout,
        }
    }

    /// Console-style appender over an arbitrary stream.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logger_facade::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::with_writer(std::io::stderr());
    /// ```
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            target: Target::Writer(Box::new(writer)),
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        match &mut self.target {
            Target::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(record)?;
            }
            Target::Writer(writer) => writer.write_all(record)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match &mut self.target {
            Target::Stdout => io::stdout().flush()?,
            Target::Writer(writer) => writer.flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
