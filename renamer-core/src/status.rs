use crate::error::Result;
use crate::fs::list_files;
use crate::transaction::TransactionLog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File totals for a directory and the state of its undo log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStatus {
    pub directory: PathBuf,
    pub files: usize,
    pub total_bytes: u64,
    pub has_log: bool,
    pub log_entries: usize,
}

pub fn directory_status(directory: &Path) -> Result<DirectoryStatus> {
    let files = list_files(directory)?;
    let log_entries = if TransactionLog::exists(directory) {
        Some(TransactionLog::load(directory)?.len())
    } else {
        None
    };

    Ok(DirectoryStatus {
        directory: directory.to_path_buf(),
        files: files.len(),
        total_bytes: files.iter().map(|f| f.size).sum(),
        has_log: log_entries.is_some(),
        log_entries: log_entries.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::RenameEntry;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_status_without_log() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.jpg"), "1234567890").unwrap();
        fs::write(temp_dir.path().join("b.txt"), "12345").unwrap();

        let status = directory_status(temp_dir.path()).unwrap();
        assert_eq!(status.files, 2);
        assert_eq!(status.total_bytes, 15);
        assert!(!status.has_log);
    }

    #[test]
    fn test_status_with_log() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let mut log = TransactionLog::new(dir);
        log.push(RenameEntry::new(dir.join("IMG_1.jpg"), dir.join("VAC_1.jpg")));
        log.save().unwrap();

        let status = directory_status(dir).unwrap();
        assert!(status.has_log);
        assert_eq!(status.log_entries, 1);
        assert_eq!(status.files, 1);
    }
}
