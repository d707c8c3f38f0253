//! Structured log record

use super::level::LogLevel;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Human-readable second-precision stamp used for `%timestamp_format%`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Millisecond-precision stamp used for `%millisecond_format%`
pub const MILLISECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%3f";

/// A single log record as handed over by the logger facade.
///
/// Carries both numeric and pre-rendered forms of the timestamp so that
/// template substitution never needs to re-derive them, plus the call-site
/// location when the facade captured one. Serializes to a single JSON object
/// for the JSON output mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Epoch seconds
    pub timestamp: i64,
    /// Local time rendered with [`TIMESTAMP_FORMAT`]
    pub timestamp_format: String,
    /// Epoch milliseconds
    pub millisecond: i64,
    /// Local time rendered with [`MILLISECOND_FORMAT`]
    pub millisecond_format: String,
    pub level: LogLevel,
    pub level_string: String,
    pub body: String,
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl LogRecord {
    /// Create a record stamped with the current local time
    pub fn new(level: LogLevel, body: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            timestamp: now.timestamp(),
            timestamp_format: now.format(TIMESTAMP_FORMAT).to_string(),
            millisecond: now.timestamp_millis(),
            millisecond_format: now.format(MILLISECOND_FORMAT).to_string(),
            level,
            level_string: level.to_str().to_string(),
            body: body.into(),
            file: String::new(),
            line: 0,
            function: String::new(),
        }
    }

    /// Attach the originating call site
    pub fn with_location(mut self, file: &str, line: u32, function: &str) -> Self {
        self.file = file.to_string();
        self.line = line;
        self.function = function.to_string();
        self
    }

    /// Serialize to a single JSON line (no trailing newline)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
