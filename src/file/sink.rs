//! File sink: per-level dispatch over rotating file writers
//!
//! A [`FileSink`] owns one [`FileWriter`] per distinct target: an optional
//! catch-all writer fed by every record, plus one writer per severity level
//! that was given its own file. A record may therefore land in two files,
//! once each. The two appends run as a pair of scoped threads and the caller
//! blocks until both finish, so backpressure is preserved and parallelism per
//! call is bounded by the number of targets.

use crate::core::error::{Result, SinkError};
use crate::core::level::LogLevel;
use crate::core::record::LogRecord;
use crate::core::sink::Sink;
use crate::file::config::FileSinkConfig;
use crate::file::writer::FileWriter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
pub struct FileSink {
    config: FileSinkConfig,
    catch_all: Option<Arc<FileWriter>>,
    level_writers: HashMap<LogLevel, Arc<FileWriter>>,
}

impl FileSink {
    /// Validate `config` and open every target file.
    ///
    /// Fails fast on the first problem: no target configured, a per-level
    /// key that is not a recognized severity value, or a file that cannot
    /// be created or opened.
    pub fn new(config: FileSinkConfig) -> Result<Self> {
        if config.path.is_none() && config.level_paths.is_empty() {
            return Err(SinkError::config(
                "FileSink",
                "either a base path or at least one per-level path must be set",
            ));
        }

        // one writer per distinct filename: targets naming the same file
        // share a writer so its lock serializes them
        let mut by_path: HashMap<PathBuf, Arc<FileWriter>> = HashMap::new();

        let mut level_writers = HashMap::new();
        for (&value, path) in &config.level_paths {
            let level = LogLevel::try_from(value)
                .map_err(|e| SinkError::config("FileSink", format!("level path key: {e}")))?;
            let writer = match by_path.get(path) {
                Some(writer) => Arc::clone(writer),
                None => {
                    let writer = Arc::new(FileWriter::new(path.clone())?);
                    by_path.insert(path.clone(), Arc::clone(&writer));
                    writer
                }
            };
            level_writers.insert(level, writer);
        }

        let catch_all = match &config.path {
            Some(path) => match by_path.get(path) {
                Some(writer) => Some(Arc::clone(writer)),
                None => Some(Arc::new(FileWriter::new(path.clone())?)),
            },
            None => None,
        };

        Ok(Self {
            config,
            catch_all,
            level_writers,
        })
    }

    pub fn config(&self) -> &FileSinkConfig {
        &self.config
    }
}

impl Sink for FileSink {
    /// Fan the record out to the catch-all writer and the record's level
    /// writer. A level with no configured writer is a silent no-op. When
    /// both targets fail, the catch-all error is the one reported.
    fn append(&self, record: &LogRecord) -> Result<()> {
        let config = &self.config;
        let (catch_all_result, level_result) = thread::scope(|s| {
            let catch_all = self
                .catch_all
                .as_ref()
                .map(|writer| s.spawn(move || writer.write_by_config(config, record)));
            let leveled = self
                .level_writers
                .get(&record.level)
                .map(|writer| s.spawn(move || writer.write_by_config(config, record)));
            (
                catch_all.map(|handle| join_writer_task(handle.join())),
                leveled.map(|handle| join_writer_task(handle.join())),
            )
        });

        if let Some(Err(err)) = catch_all_result {
            return Err(err);
        }
        if let Some(Err(err)) = level_result {
            return Err(err);
        }
        Ok(())
    }

    /// Close every owned writer. Safe to call more than once; appends after
    /// the first flush fail with a writer error.
    fn flush(&self) -> Result<()> {
        if let Some(writer) = &self.catch_all {
            writer.close()?;
        }
        for writer in self.level_writers.values() {
            writer.close()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

fn join_writer_task(joined: std::thread::Result<Result<()>>) -> Result<()> {
    joined.unwrap_or_else(|_| Err(SinkError::writer("writer task panicked")))
}
