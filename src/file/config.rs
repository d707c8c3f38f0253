//! File sink configuration

use crate::core::error::{Result, SinkError};
use std::collections::HashMap;
use std::path::PathBuf;

/// Calendar granularity for date-based rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSlice {
    Year,
    Month,
    Day,
    Hour,
}

impl DateSlice {
    /// Parse the configuration surface's granularity token.
    ///
    /// The empty string means "no date rotation"; anything other than
    /// `"y"`, `"m"`, `"d"`, `"h"` is a configuration error.
    pub fn from_config_str(s: &str) -> Result<Option<Self>> {
        match s {
            "" => Ok(None),
            "y" => Ok(Some(DateSlice::Year)),
            "m" => Ok(Some(DateSlice::Month)),
            "d" => Ok(Some(DateSlice::Day)),
            "h" => Ok(Some(DateSlice::Hour)),
            other => Err(SinkError::config(
                "FileSink",
                format!("date slice must be one of 'y', 'm', 'd', 'h', got '{}'", other),
            )),
        }
    }
}

/// Configuration for a [`FileSink`](crate::file::FileSink).
///
/// At least one of the base path and the per-level path map must be set;
/// both together are allowed and a record then goes to both targets. The
/// per-level map is keyed by the raw numeric severity value as delivered by
/// the facade's configuration layer and is validated at sink construction.
///
/// # Examples
///
/// ```no_run
/// use logslice::file::FileSinkConfig;
/// use logslice::LogLevel;
///
/// let config = FileSinkConfig::new()
///     .with_path("/var/log/app.log")
///     .with_level_path(LogLevel::Error.value(), "/var/log/app-error.log")
///     .with_max_lines(100_000)
///     .with_max_backups(7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileSinkConfig {
    /// Catch-all target receiving every record
    pub path: Option<PathBuf>,
    /// Per-level targets, keyed by raw numeric severity
    pub level_paths: HashMap<u8, PathBuf>,
    /// Size rotation threshold in KiB (on-disk bytes / 1024); 0 disables
    pub max_size_kib: u64,
    /// Line-count rotation threshold; 0 disables
    pub max_lines: u64,
    /// Rotated files retained per target; 0 disables cleanup
    pub max_backups: u64,
    /// Calendar rotation granularity
    pub date_slice: Option<DateSlice>,
    /// Emit one JSON object per record instead of the textual template
    pub json: bool,
    /// Textual template; `None` selects the default template
    pub template: Option<String>,
}

impl FileSinkConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catch-all file path
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Route one severity level to its own file
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_level_path(mut self, level: u8, path: impl Into<PathBuf>) -> Self {
        self.level_paths.insert(level, path.into());
        self
    }

    /// Set the size rotation threshold in KiB
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_kib(mut self, kib: u64) -> Self {
        self.max_size_kib = kib;
        self
    }

    /// Set the line-count rotation threshold
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_lines(mut self, lines: u64) -> Self {
        self.max_lines = lines;
        self
    }

    /// Set how many rotated backups to retain per target
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: u64) -> Self {
        self.max_backups = count;
        self
    }

    /// Enable calendar rotation at the given granularity
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_date_slice(mut self, slice: DateSlice) -> Self {
        self.date_slice = Some(slice);
        self
    }

    /// Switch to JSON output (one object per line)
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Set the textual output template
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Template actually used for textual output
    pub fn template_or_default(&self) -> &str {
        self.template
            .as_deref()
            .unwrap_or(crate::core::template::DEFAULT_TEMPLATE)
    }
}
