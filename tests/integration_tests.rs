//! Integration tests for the logger facade
//!
//! These tests verify:
//! - Per-sink level filtering across a fan-out
//! - Field inheritance on derived handles
//! - Size-triggered file rotation and backup pruning
//! - Thread safety (whole records, never interleaved)
//! - Configuration loading from TOML and JSON

use parking_lot::Mutex;
use rust_logger_facade::prelude::*;
use rust_logger_facade::{info, ConsoleEncoder, Core, EncoderConfig, JsonEncoder};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().clone())
            .expect("records are UTF-8")
            .lines()
            .map(String::from)
            .collect()
    }
}

fn console_core(filter: LevelFilter) -> (Core, SharedBuf) {
    let buf = SharedBuf::default();
    let core = Core::new(
        Box::new(ConsoleEncoder::new(EncoderConfig::default())),
        filter,
        Box::new(ConsoleAppender::with_writer(buf.clone())),
    );
    (core, buf)
}

fn json_core(filter: LevelFilter) -> (Core, SharedBuf) {
    let buf = SharedBuf::default();
    let core = Core::new(
        Box::new(JsonEncoder::new(EncoderConfig::default())),
        filter,
        Box::new(ConsoleAppender::with_writer(buf.clone())),
    );
    (core, buf)
}

fn rotated_files(dir: &Path, stem: &str) -> Vec<String> {
    let active = format!("{}.log", stem);
    fs::read_dir(dir)
        .expect("Failed to read log dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(stem) && *name != active)
        .collect()
}

#[test]
fn test_console_sink_filters_below_threshold() {
    let (core, buf) = console_core(LevelFilter::new(LogLevel::Info, LevelOp::Ge));
    let logger = Logger::builder().sink(core).build().expect("Failed to build logger");

    logger.debugf(format_args!("hidden {}", 1));
    logger.infof(format_args!("x={}", 5));
    logger.sync().expect("Failed to sync");

    let lines = buf.lines();
    assert_eq!(lines.len(), 1);
    let columns: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(columns[1], "info");
    assert!(columns[2].starts_with("tests/integration_tests.rs:"));
    assert_eq!(columns[3], "x=5");
}

#[test]
fn test_each_sink_has_its_own_threshold() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fanout.log");

    let (console, console_buf) = console_core(LevelFilter::at_least(LogLevel::Warn));
    let file_output = OutputConfig::file(WriteConfig::new(log_file.to_string_lossy()))
        .with_formatter(OutputFormat::Json)
        .with_level(LogLevel::Debug)
        .with_level_op(LevelOp::Ge);

    let logger = Logger::builder()
        .sink(console)
        .output(file_output)
        .build()
        .expect("Failed to build logger");

    logger.infof(format_args!("hello"));
    logger.sync().expect("Failed to sync");

    assert!(console_buf.lines().is_empty());
    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    let record: serde_json::Value = serde_json::from_str(lines[0]).expect("valid JSON");
    assert_eq!(record["L"], "info");
    assert_eq!(record["M"], "hello");
}

#[test]
fn test_chained_fields_appear_in_order() {
    let (core, buf) = json_core(LevelFilter::default());
    let logger = Logger::from_sinks(vec![Box::new(core)])
        .with_field(&["k1", "v1"])
        .with_field(&["k2", "v2"]);

    assert_eq!(logger.fields().to_flat(), vec!["k1", "v1", "k2", "v2"]);

    logger.info("first");
    logger.warn("second");

    for line in buf.lines() {
        assert!(line.contains(r#""k1":"v1","k2":"v2""#), "line: {}", line);
    }
}

#[test]
fn test_derived_handle_leaves_parent_untouched() {
    let (core, buf) = json_core(LevelFilter::default());
    let parent = Logger::from_sinks(vec![Box::new(core)]).with_field(&["base", "1"]);
    let left = parent.with_field(&["side", "left"]);
    let right = parent.with_field(&["side", "right"]);

    parent.info("p");
    left.info("l");
    right.info("r");

    let records: Vec<serde_json::Value> = buf
        .lines()
        .iter()
        .map(|l| serde_json::from_str(l).expect("valid JSON"))
        .collect();
    assert!(records[0].get("side").is_none());
    assert_eq!(records[1]["side"], "left");
    assert_eq!(records[2]["side"], "right");
    assert_eq!(parent.fields().len(), 1);
}

#[test]
fn test_size_rotation_respects_max_backups() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("rotate.log");

    let config = Config::new(vec![OutputConfig::file(
        WriteConfig::new(log_file.to_string_lossy())
            .with_max_size(1)
            .with_max_backups(2),
    )
    .with_formatter(OutputFormat::Json)]);
    let logger = Logger::new(&config).expect("Failed to create logger");

    let payload = "x".repeat(64 * 1024);
    for i in 0..60 {
        logger.infof(format_args!("{} {}", i, payload));
    }
    logger.sync().expect("Failed to sync");

    assert!(log_file.exists());
    let backups = rotated_files(temp_dir.path(), "rotate");
    assert!(!backups.is_empty(), "expected at least one rotated file");
    assert!(backups.len() <= 2, "too many backups: {:?}", backups);
    assert!(fs::metadata(&log_file).expect("metadata").len() <= 1024 * 1024);
}

#[test]
fn test_concurrent_records_never_interleave() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("concurrent.log");

    let config = Config::new(vec![OutputConfig::file(WriteConfig::new(
        log_file.to_string_lossy(),
    ))
    .with_formatter(OutputFormat::Json)]);
    let logger = Logger::new(&config).expect("Failed to create logger");

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = logger.with_field(&["thread", t.to_string().as_str()]);
            thread::spawn(move || {
                for i in 0..200 {
                    info!(logger, "thread {} message {} {}", t, i, "y".repeat(256));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }
    logger.sync().expect("Failed to sync");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 8 * 200);
    for line in lines {
        let record: serde_json::Value = serde_json::from_str(line).expect("whole JSON record");
        assert!(record["M"].as_str().expect("message").starts_with("thread "));
    }
    assert_eq!(logger.metrics().total_logged(), 8 * 200);
}

#[test]
fn test_concurrent_writers_across_rotation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("churn.log");

    let config = Config::new(vec![OutputConfig::file(
        WriteConfig::new(log_file.to_string_lossy())
            .with_max_size(1)
            .with_max_backups(3),
    )
    .with_formatter(OutputFormat::Json)]);
    let logger = Logger::new(&config).expect("Failed to create logger");

    // 8 * 200 records of ~4 KiB is ~6.5 MB, several rotations at 1 MB.
    let payload = "z".repeat(4096);
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = logger.with_field(&["thread", t.to_string().as_str()]);
            let payload = payload.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    info!(logger, "thread {} message {} {}", t, i, payload);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked");
    }
    logger.sync().expect("Failed to sync");

    let files: Vec<_> = fs::read_dir(temp_dir.path())
        .expect("Failed to read log dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("churn"))
        })
        .collect();
    let backups = files.iter().filter(|p| **p != log_file).count();
    assert!(backups >= 1, "expected at least one rotation: {:?}", files);
    assert!(backups <= 3, "too many backups kept: {:?}", files);

    for path in &files {
        let content = fs::read_to_string(path).expect("Failed to read log file");
        for line in content.lines() {
            let record: serde_json::Value =
                serde_json::from_str(line).expect("whole JSON record");
            assert!(record["M"].as_str().expect("message").len() > 4096);
        }
    }
    assert_eq!(logger.metrics().write_failures(), 0);
    assert_eq!(logger.metrics().total_logged(), 8 * 200);
}

#[test]
fn test_zero_sinks_is_a_noop() {
    let logger = Logger::new(&Config::default()).expect("empty config is valid");
    assert_eq!(logger.sink_count(), 0);
    assert!(!logger.enabled(LogLevel::Fatal));

    logger.error("dropped");
    logger.with_field(&["k", "v"]).info("dropped");
    assert!(logger.sync().is_ok());
    assert_eq!(logger.metrics().total_logged(), 0);
}

#[test]
fn test_unknown_config_values_fall_back() {
    let config = Config::from_json_str(
        r#"{"output":[{"writer":"smoke-signal","formatter":"xml","level":"loud","level_op":"~"}]}"#,
    )
    .expect("lenient values still parse");
    let output = &config.outputs()[0];

    assert_eq!(output.output_format(), OutputFormat::Console);
    assert_eq!(output.level_filter(), LevelFilter::new(LogLevel::Debug, LevelOp::Ge));

    let logger = Logger::new(&config).expect("unknown writer falls back to console");
    assert!(logger.enabled(LogLevel::Trace));
}

#[test]
fn test_toml_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("from_toml.log");
    let config_path = temp_dir.path().join("logger.toml");
    fs::write(
        &config_path,
        format!(
            r#"
            [[output]]
            writer = "console"
            level = "fatal"

            [[output]]
            writer = "file"
            formatter = "json"
            level = "error"
            level_op = ">="

            [output.write_config]
            filename = "{}"
            max_size = 5
            max_backups = 3
            "#,
            log_file.to_string_lossy().replace('\\', "/")
        ),
    )
    .expect("Failed to write config");

    let config = Config::from_file(&config_path).expect("Failed to load config");
    assert_eq!(config.outputs().len(), 2);
    assert_eq!(config.outputs()[1].write_config.max_backups, 3);

    let logger = Logger::new(&config).expect("Failed to create logger");
    logger.warn("filtered everywhere");
    logger.error("file only");
    logger.sync().expect("Failed to sync");

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains("file only"));
}

#[test]
fn test_malformed_config_is_rejected() {
    let err = Config::from_toml_str("[[output]\nwriter = ").unwrap_err();
    assert!(matches!(err, LoggerError::ConfigParse { .. }));
}
