//! Basic logger usage example
//!
//! Demonstrates per-sink level filtering, the two encoders and derived
//! handles carrying fields.
//!
//! Run with: cargo run --example basic_usage

use rust_logger_facade::prelude::*;
use rust_logger_facade::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Logger Facade - Basic Usage Example ===\n");

    // A console logger that lets everything through
    let config = Config::new(vec![OutputConfig::console().with_level(LogLevel::Trace)]);
    let logger = Logger::new(&config)?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Two sinks with their own thresholds:");
    let config = Config::new(vec![
        OutputConfig::console().with_level(LogLevel::Warn),
        OutputConfig::console()
            .with_formatter(OutputFormat::Json)
            .with_level(LogLevel::Info)
            .with_level_op(LevelOp::Lt),
    ]);
    let logger = Logger::new(&config)?;
    logger.debug("Debug goes to the JSON sink only");
    logger.info("Info is dropped by both sinks");
    logger.error("Error goes to the console sink only");

    println!("\n3. Derived handles carry fields:");
    let logger = Logger::new(&Config::default_console())?;
    let request = logger.with_field(&["request_id", "abc-123"]);
    let user = request.with_field(&["user_id", "42"]);
    info!(request, "Request received from {}", "10.0.0.1");
    warn!(user, "Quota at {}%", 93);
    info!(logger, "Parent handle has no fields");

    logger.sync()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
