//! Core sink types and traits

pub mod error;
pub mod level;
pub mod record;
pub mod sink;
pub mod template;

pub use error::{Result, SinkError};
pub use level::LogLevel;
pub use record::{LogRecord, MILLISECOND_FORMAT, TIMESTAMP_FORMAT};
pub use sink::Sink;
pub use template::{render, DEFAULT_TEMPLATE};
