//! The filesystem surface the renamers depend on.

use crate::error::{RenameError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A regular file found directly inside a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// List the regular files directly inside `dir`, sorted by name.
///
/// Directories, symlinks and names that are not valid UTF-8 are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<FileInfo>> {
    let read_dir = fs::read_dir(dir).map_err(|e| RenameError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| RenameError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| RenameError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            tracing::debug!("Skipping non UTF-8 file name {}", entry.path().display());
            continue;
        };
        let size = entry
            .metadata()
            .map_err(|e| RenameError::io(entry.path(), e))?
            .len();

        files.push(FileInfo {
            name,
            path: entry.path(),
            size,
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Rename `from` to `to`, reporting failures as [`RenameError::OsFailure`].
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|source| RenameError::OsFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Format a byte count with binary units and two decimals, e.g. `1.50 KB`.
#[allow(clippy::cast_precision_loss)]
pub fn human_readable_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}
