//! # logslice
//!
//! The write-and-rotate engine of a structured logging library: records are
//! appended to one or more per-level log files, files rotate transparently
//! when a size, line-count, or calendar boundary is crossed, and old rotated
//! copies are pruned beyond a retention limit.
//!
//! ## Features
//!
//! - **Per-level dispatch**: a catch-all file, per-level files, or both
//! - **Three rotation policies**: calendar slice (year/month/day/hour),
//!   line count, and file size, independently configurable
//! - **Backup retention**: timestamp-named backups pruned to a fixed count
//! - **Thread safe**: appends from many threads interleave without tearing
//!
//! ## Example
//!
//! ```no_run
//! use logslice::file::{DateSlice, FileSink, FileSinkConfig};
//! use logslice::{LogLevel, LogRecord, Sink};
//!
//! let sink = FileSink::new(
//!     FileSinkConfig::new()
//!         .with_path("/var/log/app.log")
//!         .with_level_path(LogLevel::Error.value(), "/var/log/app-error.log")
//!         .with_date_slice(DateSlice::Day)
//!         .with_max_backups(7),
//! )?;
//!
//! sink.append(&LogRecord::new(LogLevel::Info, "service started"))?;
//! sink.flush()?;
//! # Ok::<(), logslice::SinkError>(())
//! ```

pub mod core;
pub mod file;

pub mod prelude {
    pub use crate::core::{LogLevel, LogRecord, Result, Sink, SinkError};
    pub use crate::file::{DateSlice, FileSink, FileSinkConfig, FileWriter};
}

pub use crate::core::{
    render, LogLevel, LogRecord, Result, Sink, SinkError, DEFAULT_TEMPLATE, MILLISECOND_FORMAT,
    TIMESTAMP_FORMAT,
};
pub use crate::file::{BackupScheme, DateSlice, FileSink, FileSinkConfig, FileWriter};
