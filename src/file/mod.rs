//! Rotating file sink implementation

pub mod cleanup;
pub mod config;
pub mod pattern;
pub mod sink;
pub mod writer;

pub use cleanup::clean_up_backups;
pub use config::{DateSlice, FileSinkConfig};
pub use pattern::BackupScheme;
pub use sink::FileSink;
pub use writer::FileWriter;
