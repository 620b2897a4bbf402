//! Rotating file appender with automatic log rotation
//!
//! The active file always lives at the configured path. When a write would
//! push it past the size limit, the file is renamed to a timestamped backup
//! (`app-2024-02-24T10-30-45.123.log`) and a fresh file is opened. After each
//! rotation a background thread prunes old backups by count and by age and
//! optionally gzip-compresses the survivors
//! (`app-2024-02-24T10-30-45.123.log.gz`).

use crate::core::appender::Appender;
use crate::core::config::WriteConfig;
use crate::core::error::{LoggerError, Result};
use chrono::{Local, NaiveDateTime, Utc};
use crossbeam_channel::{bounded, unbounded, Sender};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const MEGABYTE: u64 = 1024 * 1024;
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// Size, age and count limits for a rotating file
///
/// # Examples
///
/// ```
/// use rust_logger_facade::appenders::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_bytes(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(14 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_backups, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate before the active file would exceed this many bytes
    pub max_bytes: u64,
    /// Remove backups older than this (`None` keeps them regardless of age)
    pub max_age: Option<Duration>,
    /// Number of backups to keep (0 keeps all)
    pub max_backups: usize,
    /// Whether to gzip rotated files
    pub compress: bool,
    /// Stamp backups with local time rather than UTC
    pub local_time: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_age: None,
            max_backups: 0,
            compress: false,
            local_time: true,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }
}

impl From<&WriteConfig> for RotationPolicy {
    fn from(config: &WriteConfig) -> Self {
        let max_size_mb = if config.max_size == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            config.max_size
        };
        Self {
            max_bytes: max_size_mb.saturating_mul(MEGABYTE),
            max_age: (config.max_age > 0)
                .then(|| Duration::from_secs(config.max_age.saturating_mul(24 * 3600))),
            max_backups: config.max_backups,
            compress: config.compress,
            local_time: true,
        }
    }
}

/// A rotated file found next to the active one
#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    timestamp: NaiveDateTime,
    compressed: bool,
}

impl Backup {
    /// Path without the compression suffix, shared by a backup and its `.gz`.
    fn logical_path(&self) -> PathBuf {
        if self.compressed {
            self.path.with_extension("")
        } else {
            self.path.clone()
        }
    }
}

/// Prunes and compresses the backups of one active file.
///
/// Runs on the appender's maintenance thread, outside the write path.
#[derive(Debug, Clone)]
struct BackupMill {
    base_path: PathBuf,
    policy: RotationPolicy,
}

impl BackupMill {
    /// Whether the policy asks for any maintenance at all
    fn needed(&self) -> bool {
        self.policy.max_backups > 0 || self.policy.max_age.is_some() || self.policy.compress
    }

    fn now(&self) -> NaiveDateTime {
        if self.policy.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }

    /// File stem and extension (with its dot) of the active file
    fn name_parts(&self) -> (String, String) {
        let stem = self
            .base_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string();
        let ext = self
            .base_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (stem, ext)
    }

    /// `<stem>-<timestamp><ext>` next to the active file
    fn backup_path_at(&self, timestamp: NaiveDateTime) -> PathBuf {
        let (stem, ext) = self.name_parts();
        self.base_path.with_file_name(format!(
            "{}-{}{}",
            stem,
            timestamp.format(BACKUP_TIME_FORMAT),
            ext
        ))
    }

    /// Rotated files belonging to the active file, newest first
    fn backups(&self) -> Result<Vec<Backup>> {
        let dir = match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let (stem, ext) = self.name_parts();
        let prefix = format!("{}-", stem);

        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list log backups",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut backups: Vec<Backup> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                let compressed = file_name.ends_with(COMPRESS_SUFFIX);
                let name = if compressed {
                    &file_name[..file_name.len() - COMPRESS_SUFFIX.len()]
                } else {
                    file_name.as_str()
                };
                let stamp = name.strip_prefix(&prefix)?.strip_suffix(ext.as_str())?;
                let timestamp = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()?;
                Some(Backup {
                    path: entry.path(),
                    timestamp,
                    compressed,
                })
            })
            .collect();

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// Apply the count and age limits, then compress what remains.
    ///
    /// Failures are reported on stderr and retried on the next run.
    fn run(&self) {
        let backups = match self.backups() {
            Ok(backups) => backups,
            Err(e) => {
                eprintln!("[WARN] Failed to list log backups: {}", e);
                return;
            }
        };

        let mut keep = Vec::with_capacity(backups.len());
        let mut remove = Vec::new();

        if self.policy.max_backups > 0 {
            let mut seen = HashSet::new();
            for backup in backups {
                seen.insert(backup.logical_path());
                if seen.len() > self.policy.max_backups {
                    remove.push(backup);
                } else {
                    keep.push(backup);
                }
            }
        } else {
            keep = backups;
        }

        if let Some(cutoff) = self.age_cutoff() {
            let (expired, fresh): (Vec<_>, Vec<_>) =
                keep.into_iter().partition(|b| b.timestamp < cutoff);
            remove.extend(expired);
            keep = fresh;
        }

        for backup in &remove {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[WARN] Failed to remove old log backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in keep.iter().filter(|b| !b.compressed) {
                // A backup can already have a compressed twin from an
                // interrupted earlier pass.
                if compressed_path(&backup.path).exists() {
                    let _ = fs::remove_file(&backup.path);
                    continue;
                }
                if let Err(e) = compress_file(&backup.path) {
                    eprintln!("[WARN] Failed to compress log backup: {}", e);
                }
            }
        }
    }

    fn age_cutoff(&self) -> Option<NaiveDateTime> {
        let max_age = chrono::Duration::from_std(self.policy.max_age?).ok()?;
        self.now().checked_sub_signed(max_age)
    }
}

enum MillRequest {
    Run,
    /// Acknowledged once every earlier request has been handled
    Barrier(Sender<()>),
}

/// Maintenance thread owned by one appender
struct MillWorker {
    sender: Option<Sender<MillRequest>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl MillWorker {
    fn spawn(mill: BackupMill) -> Result<Self> {
        let (sender, receiver) = unbounded::<MillRequest>();
        let handle = thread::Builder::new()
            .name("log-backup-mill".to_string())
            .spawn(move || {
                while let Ok(first) = receiver.recv() {
                    // Coalesce everything queued so far into a single pass.
                    let mut run = false;
                    let mut waiters = Vec::new();
                    for request in std::iter::once(first).chain(receiver.try_iter()) {
                        match request {
                            MillRequest::Run => run = true,
                            MillRequest::Barrier(ack) => waiters.push(ack),
                        }
                    }
                    if run {
                        mill.run();
                    }
                    for ack in waiters {
                        let _ = ack.send(());
                    }
                }
            })
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawn backup maintenance thread",
                    "Failed to start log backup thread",
                    e,
                )
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    fn request(&self) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(MillRequest::Run);
        }
    }

    /// Block until every request sent so far has been handled.
    fn wait_idle(&self) {
        if let Some(sender) = &self.sender {
            let (ack_tx, ack_rx) = bounded(1);
            if sender.send(MillRequest::Barrier(ack_tx)).is_ok() {
                let _ = ack_rx.recv();
            }
        }
    }
}

impl Drop for MillWorker {
    fn drop(&mut self) {
        // Closing the channel lets the thread finish queued work and exit.
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Backup maintenance thread panicked: {:?}", e);
            }
        }
    }
}

/// Size-rotated file appender
///
/// Only the rename and reopen happen on the writing thread. Pruning and
/// compression of backups run on a maintenance thread owned by the appender
/// (spawned only when the policy limits backups or compresses them);
/// [`Appender::flush`] waits for that thread to catch up.
///
/// # Examples
///
/// ```no_run
/// use rust_logger_facade::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new()
///     .with_max_bytes(10 * 1024 * 1024)
///     .with_max_backups(5)
///     .with_compression(true);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    mill: BackupMill,
    worker: Option<MillWorker>,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    /// Stamp of the most recent backup made by this appender
    last_backup: Option<NaiveDateTime>,
}

impl RotatingFileAppender {
    /// Create a rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create an appender from a sink's `write_config`.
    ///
    /// An empty filename selects `<process>-logger.log` in the temp dir.
    pub fn from_config(config: &WriteConfig) -> Result<Self> {
        let path = if config.filename.is_empty() {
            default_log_path()
        } else {
            PathBuf::from(&config.filename)
        };
        Self::with_policy(path, RotationPolicy::from(config))
    }

    /// Create a rotating file appender with a custom policy
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or opened, or the
    /// maintenance thread cannot be started
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_append(&base_path)?;

        let mill = BackupMill {
            base_path: base_path.clone(),
            policy,
        };
        let worker = if mill.needed() {
            Some(MillWorker::spawn(mill.clone())?)
        } else {
            None
        };

        Ok(Self {
            base_path,
            mill,
            worker,
            writer: Some(BufWriter::new(file)),
            current_size,
            last_backup: None,
        })
    }

    fn open_append(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Close the active file, move it to a timestamped backup and open a
    /// fresh one. Backup pruning is handed to the maintenance thread.
    pub fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.base_path.exists() {
            let (backup, stamp) = self.next_backup_path();
            fs::rename(&self.base_path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to rename to '{}': {}", backup.display(), e),
                )
            })?;
            self.last_backup = Some(stamp);
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.base_path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.writer = Some(BufWriter::new(file));
        self.current_size = 0;

        if let Some(worker) = &self.worker {
            worker.request();
        }
        Ok(())
    }

    fn backup_path_at(&self, timestamp: NaiveDateTime) -> PathBuf {
        self.mill.backup_path_at(timestamp)
    }

    /// Backup stamps strictly increase: two rotations within the same
    /// millisecond step the later one forward, so name order stays age order.
    fn next_backup_path(&self) -> (PathBuf, NaiveDateTime) {
        let step = chrono::Duration::milliseconds(1);
        let now = self.mill.now();
        let mut timestamp = match self.last_backup {
            Some(last) => now.max(last + step),
            None => now,
        };
        loop {
            let candidate = self.backup_path_at(timestamp);
            if !candidate.exists() && !compressed_path(&candidate).exists() {
                return (candidate, timestamp);
            }
            timestamp += step;
        }
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.mill.policy
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, record: &[u8]) -> Result<()> {
        let len = record.len() as u64;
        let max_bytes = self.mill.policy.max_bytes;
        if len > max_bytes {
            return Err(LoggerError::WriteTooLarge {
                len,
                max: max_bytes,
            });
        }

        // A previous failed rotation may have left us without a file.
        if self.writer.is_none() {
            let (file, size) = Self::open_append(&self.base_path)?;
            self.writer = Some(BufWriter::new(file));
            self.current_size = size;
        }

        if self.current_size + len > max_bytes {
            self.rotate()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(record).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += len;
        Ok(())
    }

    /// Flush and fsync the active file, then wait for pending backup
    /// maintenance to finish.
    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
            writer.get_ref().sync_data().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to sync: {}", e),
                )
            })?;
        }
        if let Some(worker) = &self.worker {
            worker.wait_idle();
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
        // Dropping the worker joins its thread after queued maintenance.
        self.worker.take();
    }
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

fn default_log_path() -> PathBuf {
    let process = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "app".to_string());
    std::env::temp_dir().join(format!("{}-logger.log", process))
}

/// Gzip `path` into `path.gz`, removing the original only once the
/// compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, Read};

    let gz_path = compressed_path(path);
    let mut temp_name = gz_path.as_os_str().to_os_string();
    temp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(temp_name);

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(64 * 1024, output),
        flate2::Compression::default(),
    );

    let mut buffer = vec![0u8; 64 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to read from file: {}", path.display()),
                e,
            )
        })?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read]).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to compress data chunk", e)
        })?;
    }

    encoder
        .finish()
        .and_then(|mut out| out.flush())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("compress log file", "Failed to finish compression", e)
        })?;

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}
