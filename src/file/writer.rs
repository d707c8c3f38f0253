//! File writer with rotation
//!
//! A [`FileWriter`] owns one open log file, the wall-clock time it was
//! opened, and the number of lines written since then. Every append runs
//! under the writer's exclusive lock and first evaluates the three rotation
//! policies in a fixed order: calendar slice, line count, file size. A check
//! that fires renames the active file to its backup name and reopens a fresh
//! file before the next check runs, so at most one rotation happens per
//! append.

use crate::core::error::{Result, SinkError};
use crate::core::record::LogRecord;
use crate::core::template;
use crate::file::cleanup::clean_up_backups;
use crate::file::config::{DateSlice, FileSinkConfig};
use crate::file::pattern::BackupScheme;
use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    state: RwLock<WriterState>,
}

#[derive(Debug)]
struct WriterState {
    /// `None` once the writer has been closed
    file: Option<File>,
    /// Wall-clock time the active file was opened or last rotated
    start_time: DateTime<Local>,
    /// Lines in the active file, seeded from pre-existing content
    line_count: u64,
}

impl WriterState {
    /// Open `path` for appending, creating it if absent, and seed the line
    /// counter from whatever the file already contains.
    fn open(path: &Path) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o766);
        }
        let file = options.open(path).map_err(|e| {
            SinkError::io_operation(
                "opening log file",
                format!("cannot open '{}'", path.display()),
                e,
            )
        })?;

        let line_count = count_lines(path).map_err(|e| {
            SinkError::io_operation(
                "counting existing lines",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;

        Ok(Self {
            file: Some(file),
            start_time: Local::now(),
            line_count,
        })
    }

    fn rotate_by_date(&mut self, path: &Path, slice: DateSlice, max_backups: u64) -> Result<()> {
        let scheme = BackupScheme::from(slice);
        // The start stamp must be compared against the current time at the
        // same granularity, including for the hour slice.
        let start_stamp = scheme.render(&self.start_time);
        if start_stamp == scheme.render(&Local::now()) {
            return Ok(());
        }
        let backup = backup_path(path, scheme, &start_stamp);
        self.rotate_to(path, &backup, scheme, max_backups)
    }

    fn rotate_by_lines(
        &mut self,
        path: &Path,
        pending_lines: u64,
        max_lines: u64,
        max_backups: u64,
    ) -> Result<()> {
        if self.line_count + pending_lines < max_lines {
            return Ok(());
        }
        let scheme = BackupScheme::Timestamp;
        let backup = backup_path(path, scheme, &scheme.render(&Local::now()));
        self.rotate_to(path, &backup, scheme, max_backups)
    }

    fn rotate_by_size(&mut self, path: &Path, max_size_kib: u64, max_backups: u64) -> Result<()> {
        let size = fs::metadata(path)
            .map_err(|e| {
                SinkError::io_operation(
                    "checking log file size",
                    format!("cannot stat '{}'", path.display()),
                    e,
                )
            })?
            .len();
        if size / 1024 < max_size_kib {
            return Ok(());
        }
        let scheme = BackupScheme::Timestamp;
        let backup = backup_path(path, scheme, &scheme.render(&Local::now()));
        self.rotate_to(path, &backup, scheme, max_backups)
    }

    /// Close, rename to `backup`, reopen a fresh file at `path`.
    ///
    /// A failed rename or reopen leaves the handle closed; the writer is
    /// unusable until recreated.
    fn rotate_to(
        &mut self,
        path: &Path,
        backup: &Path,
        scheme: BackupScheme,
        max_backups: u64,
    ) -> Result<()> {
        if max_backups > 0 {
            // A backup that cannot be deleted must not hold up the rotation
            // itself; the next rotation retries the cleanup.
            if let Err(err) = clean_up_backups(path, max_backups, scheme) {
                eprintln!(
                    "[WARN] backup cleanup failed for '{}': {}",
                    path.display(),
                    err
                );
            }
        }

        self.file.take();
        fs::rename(path, backup).map_err(|e| {
            SinkError::rotation(
                path.display().to_string(),
                format!("cannot rename to '{}': {}", backup.display(), e),
            )
        })?;
        *self = WriterState::open(path)?;
        Ok(())
    }
}

impl FileWriter {
    /// Open (creating if absent) the log file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = WriterState::open(&path)?;
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written to the active file since it was opened or rotated
    pub fn line_count(&self) -> u64 {
        self.state.read().line_count
    }

    /// Render the record per `config` and append it, rotating first if any
    /// configured policy fires. The whole sequence holds the writer's lock.
    pub fn write_by_config(&self, config: &FileSinkConfig, record: &LogRecord) -> Result<()> {
        let mut state = self.state.write();

        let mut payload = if config.json {
            record.to_json()?
        } else {
            template::render(config.template_or_default(), record)
        };
        payload.push_str("\r\n");
        // a JSON record is always a single line
        let pending_lines = if config.json {
            1
        } else {
            payload.bytes().filter(|&b| b == b'\n').count() as u64
        };

        if let Some(slice) = config.date_slice {
            state.rotate_by_date(&self.path, slice, config.max_backups)?;
        }
        if config.max_lines > 0 {
            state.rotate_by_lines(&self.path, pending_lines, config.max_lines, config.max_backups)?;
        }
        if config.max_size_kib > 0 {
            state.rotate_by_size(&self.path, config.max_size_kib, config.max_backups)?;
        }

        let file = state.file.as_mut().ok_or_else(|| {
            SinkError::writer(format!("writer for '{}' is closed", self.path.display()))
        })?;
        file.write_all(payload.as_bytes()).map_err(|e| {
            SinkError::io_operation(
                "appending log record",
                format!("write to '{}' failed", self.path.display()),
                e,
            )
        })?;

        if config.max_lines > 0 {
            state.line_count += pending_lines;
        }
        Ok(())
    }

    /// Flush and close the handle. Closing twice is a no-op; appends after
    /// close fail until the writer is recreated.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.write();
        if let Some(mut file) = state.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

/// `<stem><connector><stamp><ext>` next to the active file
fn backup_path(path: &Path, scheme: BackupScheme, stamp: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{}{stamp}{ext}", scheme.connector()))
}

fn count_lines(path: &Path) -> std::io::Result<u64> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut count = 0u64;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        count += buf.iter().filter(|&&b| b == b'\n').count() as u64;
        let len = buf.len();
        reader.consume(len);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::LogLevel;
    use chrono::Duration;
    use tempfile::tempdir;

    fn body_config() -> FileSinkConfig {
        FileSinkConfig::new().with_template("%body%")
    }

    fn list_logs(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_creates_file_and_seeds_line_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");

        let writer = FileWriter::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(writer.line_count(), 0);
        drop(writer);

        fs::write(&path, "one\r\ntwo\r\nthree\r\n").unwrap();
        let writer = FileWriter::new(&path).unwrap();
        assert_eq!(writer.line_count(), 3);
    }

    #[test]
    fn test_append_without_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(&path).unwrap();

        let record = LogRecord::new(LogLevel::Info, "hello");
        writer.write_by_config(&body_config(), &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "hello\r\n");
        assert_eq!(list_logs(dir.path()), vec!["app.log"]);
    }

    #[test]
    fn test_line_rotation_at_threshold() {
        // maxLine=5: the write that reaches the counter rotates first, so
        // the post-rotation active file holds exactly that one record.
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(&path).unwrap();
        let config = body_config().with_max_lines(5);

        for i in 0..5 {
            let record = LogRecord::new(LogLevel::Info, format!("line {i}"));
            writer.write_by_config(&config, &record).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "line 4\r\n");
        assert_eq!(writer.line_count(), 1);

        let backups: Vec<String> = list_logs(dir.path())
            .into_iter()
            .filter(|n| n.starts_with("app.2"))
            .collect();
        assert_eq!(backups.len(), 1);
        let rotated = fs::read_to_string(dir.path().join(&backups[0])).unwrap();
        assert_eq!(rotated.lines().count(), 4);
    }

    #[test]
    fn test_size_rotation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(&path).unwrap();
        let config = body_config().with_max_size_kib(1);

        let big = "x".repeat(2000);
        let record = LogRecord::new(LogLevel::Info, big.clone());
        // first write: file still under 1 KiB, no rotation
        writer.write_by_config(&config, &record).unwrap();
        assert_eq!(list_logs(dir.path()), vec!["app.log"]);

        // second write: on-disk size is now >= 1 KiB, rotate before appending
        writer.write_by_config(&config, &record).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{big}\r\n"));
        assert_eq!(
            list_logs(dir.path())
                .iter()
                .filter(|n| n.starts_with("app.2"))
                .count(),
            1
        );
    }

    #[test]
    fn test_hour_slice_rotates_after_one_hour() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(&path).unwrap();
        let config = body_config().with_date_slice(DateSlice::Hour);

        let record = LogRecord::new(LogLevel::Info, "before");
        writer.write_by_config(&config, &record).unwrap();

        // pretend the file was opened an hour ago
        let backdated = Local::now() - Duration::hours(1);
        writer.state.write().start_time = backdated;

        let record = LogRecord::new(LogLevel::Info, "after");
        writer.write_by_config(&config, &record).unwrap();

        let expected = format!("app_{}.log", backdated.format("%Y%m%d%H"));
        assert!(
            dir.path().join(&expected).exists(),
            "missing backup {expected}, have {:?}",
            list_logs(dir.path())
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "after\r\n");
        assert_eq!(
            fs::read_to_string(dir.path().join(&expected)).unwrap(),
            "before\r\n"
        );
    }

    #[test]
    fn test_day_slice_same_day_never_rotates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(&path).unwrap();
        let config = body_config().with_date_slice(DateSlice::Day);

        for _ in 0..3 {
            let record = LogRecord::new(LogLevel::Info, "same day");
            writer.write_by_config(&config, &record).unwrap();
        }
        assert_eq!(list_logs(dir.path()), vec!["app.log"]);
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_closed_writer_rejects_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(&path).unwrap();

        writer.close().unwrap();
        // double close is a no-op
        writer.close().unwrap();

        let record = LogRecord::new(LogLevel::Info, "too late");
        let err = writer.write_by_config(&body_config(), &record).unwrap_err();
        assert!(matches!(err, SinkError::Writer(_)));
    }

    #[test]
    fn test_rotation_retains_max_backups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let writer = FileWriter::new(&path).unwrap();
        let config = body_config().with_max_lines(1).with_max_backups(2);

        for i in 0..6 {
            let record = LogRecord::new(LogLevel::Info, format!("entry {i}"));
            writer.write_by_config(&config, &record).unwrap();
        }

        let backups = list_logs(dir.path())
            .into_iter()
            .filter(|n| n.starts_with("app.2"))
            .count();
        assert!(backups <= 2, "expected at most 2 backups, got {backups}");
    }
}
