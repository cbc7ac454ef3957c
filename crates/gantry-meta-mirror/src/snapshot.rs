//! Snapshot directory discovery
//!
//! Ingested snapshots live as `<store_name>_<ordinal>` subdirectories of
//! the configured root; the ordinal is assigned by the sync loop and only
//! ever grows, so the most recent snapshot is the highest ordinal.

use std::io;
use std::path::{Path, PathBuf};

/// Directory name for a snapshot with the given ordinal
#[must_use]
pub fn snapshot_dir_name(store_name: &str, ordinal: u64) -> String {
    format!("{store_name}_{ordinal}")
}

/// Find the most recently ingested snapshot directory under `root`.
///
/// A missing root or a root with no matching subdirectories yields
/// `Ok(None)`; entries that are not directories or do not follow the
/// naming convention are ignored.
pub fn find_most_recent_snapshot_dir(
    root: &Path,
    store_name: &str,
) -> io::Result<Option<PathBuf>> {
    if !root.exists() {
        return Ok(None);
    }
    let prefix = format!("{store_name}_");
    let mut best: Option<(u64, PathBuf)> = None;
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(ordinal) = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.parse::<u64>().ok())
        else {
            continue;
        };
        if best.as_ref().is_none_or(|(b, _)| ordinal > *b) {
            best = Some((ordinal, entry.path()));
        }
    }
    Ok(best.map(|(_, path)| path))
}
