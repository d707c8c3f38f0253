//! Backup retention cleanup
//!
//! Before a rotation creates a new backup, the writer's directory is scanned
//! for earlier backups of the same file and pruned down to `max_backups - 1`
//! entries, leaving room for the one about to be created. Backups are
//! recognized by an anchored match of `<stem><connector><stamp><ext>` built
//! from the same [`BackupScheme`] that named them.

use crate::core::error::{Result, SinkError};
use crate::file::pattern::BackupScheme;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Delete the oldest backups of `active_path` so that at most
/// `max_backups - 1` remain. Does nothing while fewer than `max_backups`
/// matching files exist.
pub fn clean_up_backups(active_path: &Path, max_backups: u64, scheme: BackupScheme) -> Result<()> {
    let dir = match active_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = active_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let ext = active_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let pattern = format!(
        "^{}{}({}){}$",
        regex::escape(stem),
        regex::escape(&scheme.connector().to_string()),
        scheme.digit_pattern(),
        regex::escape(&ext),
    );
    let matcher = Regex::new(&pattern)
        .map_err(|e| SinkError::pattern(format!("cannot compile '{}': {}", pattern, e)))?;

    let entries = fs::read_dir(dir).map_err(|e| {
        SinkError::io_operation(
            "scanning backup directory",
            format!("cannot read '{}'", dir.display()),
            e,
        )
    })?;

    let mut backups: Vec<(i64, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            SinkError::io_operation(
                "scanning backup directory",
                format!("cannot read entry in '{}'", dir.display()),
                e,
            )
        })?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(caps) = matcher.captures(name) else {
            continue;
        };
        // a matched name with an unparseable stamp is not a deletion victim
        let Some(epoch) = scheme.parse_epoch(&caps[1]) else {
            continue;
        };
        backups.push((epoch, entry.path()));
    }

    if (backups.len() as u64) < max_backups {
        return Ok(());
    }

    backups.sort_by_key(|(epoch, _)| *epoch);
    let keep = max_backups.saturating_sub(1) as usize;
    let excess = backups.len() - keep;
    for (_, path) in backups.iter().take(excess) {
        fs::remove_file(path).map_err(|e| {
            SinkError::io_operation(
                "removing old backup",
                format!("cannot remove '{}'", path.display()),
                e,
            )
        })?;
    }

    Ok(())
}
