//! Sink trait for log output destinations

use super::{error::Result, record::LogRecord};

/// A destination that accepts finished log records.
///
/// Implementations serialize their own internal state, so `append` takes
/// `&self` and may be called from many threads at once.
pub trait Sink: Send + Sync {
    fn append(&self, record: &LogRecord) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
