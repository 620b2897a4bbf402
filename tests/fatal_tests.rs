//! Fatal records terminate the process, so these tests re-run the test
//! binary as a child and inspect its exit status and output.

use rust_logger_facade::prelude::*;
use rust_logger_facade::{fatal, FATAL_EXIT_CODE};
use std::env;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const CHILD_LOG_ENV: &str = "RUST_LOGGER_FACADE_FATAL_LOG";

/// Re-run `test_name` in a child process with the given log path.
fn run_child(test_name: &str, log_file: &std::path::Path) -> std::process::Output {
    Command::new(env::current_exe().expect("test binary path"))
        .args(["--exact", test_name, "--nocapture", "--test-threads=1"])
        .env(CHILD_LOG_ENV, log_file)
        .output()
        .expect("Failed to spawn child")
}

fn child_logger(log_file: &str, file_level: LogLevel) -> Logger {
    let config = Config::new(vec![
        OutputConfig::console().with_formatter(OutputFormat::Json),
        OutputConfig::file(WriteConfig::new(log_file))
            .with_formatter(OutputFormat::Json)
            .with_level(file_level),
    ]);
    Logger::new(&config).expect("Failed to create logger")
}

#[test]
fn test_fatal_emits_syncs_and_exits() {
    if let Ok(path) = env::var(CHILD_LOG_ENV) {
        let logger = child_logger(&path, LogLevel::Debug).with_field(&["stage", "boot"]);
        logger.info("about to fail");
        fatal!(logger, "unrecoverable: {}", "disk full");
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fatal.log");
    let output = run_child("test_fatal_emits_syncs_and_exits", &log_file);

    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r#""L":"fatal""#), "stdout: {}", stdout);
    assert!(stdout.contains("unrecoverable: disk full"));

    let content = fs::read_to_string(&log_file).expect("file sink was synced before exit");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let record: serde_json::Value = serde_json::from_str(lines[1]).expect("valid JSON");
    assert_eq!(record["L"], "fatal");
    assert_eq!(record["stage"], "boot");
}

#[test]
fn test_fatal_exits_even_when_filtered() {
    if let Ok(path) = env::var(CHILD_LOG_ENV) {
        let config = Config::new(vec![OutputConfig::file(WriteConfig::new(path))
            .with_level(LogLevel::Error)
            .with_level_op(LevelOp::Lt)]);
        let logger = Logger::new(&config).expect("Failed to create logger");
        logger.fatal("nobody hears this");
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("filtered.log");
    let output = run_child("test_fatal_exits_even_when_filtered", &log_file);

    assert_eq!(output.status.code(), Some(FATAL_EXIT_CODE));
    let content = fs::read_to_string(&log_file).unwrap_or_default();
    assert!(!content.contains("nobody hears this"));
}
