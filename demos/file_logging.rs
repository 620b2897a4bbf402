//! File logging example
//!
//! Demonstrates a console sink next to a rotating JSON file sink, loaded
//! from a TOML configuration.
//!
//! Run with: cargo run --example file_logging

use rust_logger_facade::prelude::*;
use rust_logger_facade::{error, info};

const CONFIG: &str = r#"
[[output]]
writer = "console"
formatter = "console"
level = "info"

[[output]]
writer = "file"
formatter = "json"
level = "debug"

[output.write_config]
filename = "application.log"
max_size = 1
max_age = 7
max_backups = 3
compress = true
"#;

fn main() -> Result<()> {
    println!("=== Rust Logger Facade - File Logging Example ===\n");

    let config = Config::from_toml_str(CONFIG)?;
    let logger = Logger::new(&config)?.with_field(&["service", "file_logging"]);

    println!("1. Logging to both console and file:");
    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.warn("Using default settings for some options");
    error!(logger, "Failed to load optional plugin: {}", "metrics");

    println!("\n2. Writing enough to trigger rotation:");
    let payload = "x".repeat(1024);
    for i in 1..=3000 {
        logger.debugf(format_args!("Processing item {} {}", i, payload));
        if i % 1000 == 0 {
            info!(logger, "Processed {} items", i);
        }
    }

    logger.sync()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and its rotated backups for the full output");

    Ok(())
}
