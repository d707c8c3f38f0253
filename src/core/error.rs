//! Error types for the sink engine

pub type Result<T> = std::result::Result<T, SinkError>;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File rotation error with path
    #[error("File rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Backup filename pattern error
    #[error("Backup pattern error: {message}")]
    Pattern { message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    Writer(String),
}

impl SinkError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        SinkError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a backup pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        SinkError::Pattern {
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        SinkError::Writer(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SinkError::config("FileSink", "no target file configured");
        assert!(matches!(err, SinkError::InvalidConfiguration { .. }));

        let err = SinkError::rotation("/var/log/app.log", "rename failed");
        assert!(matches!(err, SinkError::Rotation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = SinkError::rotation("/var/log/app.log", "disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': disk full"
        );

        let err = SinkError::config("FileSink", "unknown level key 42");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for FileSink: unknown level key 42"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = SinkError::io_operation("opening log file", "cannot open file", io_err);

        assert!(matches!(err, SinkError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open file"));
    }
}
