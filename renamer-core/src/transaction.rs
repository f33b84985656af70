use crate::error::{RenameError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the transaction log kept inside the renamed directory.
pub const LOG_FILE_NAME: &str = "rename_log.json";

/// One completed rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
}

impl RenameEntry {
    pub fn new(original_path: impl Into<PathBuf>, new_path: impl Into<PathBuf>) -> Self {
        Self {
            original_path: original_path.into(),
            new_path: new_path.into(),
        }
    }

    pub fn original_name(&self) -> String {
        file_name(&self.original_path)
    }

    pub fn new_name(&self) -> String {
        file_name(&self.new_path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Ordered record of the renames applied to one directory.
///
/// On disk the log is a JSON array of `[new_path, original_path]` pairs in the
/// order the renames were applied.
#[derive(Debug, Clone)]
pub struct TransactionLog {
    directory: PathBuf,
    entries: Vec<RenameEntry>,
}

impl TransactionLog {
    /// Start an empty log for `directory`.
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Location of the log file for `directory`.
    pub fn path_for(directory: &Path) -> PathBuf {
        directory.join(LOG_FILE_NAME)
    }

    pub fn exists(directory: &Path) -> bool {
        Self::path_for(directory).is_file()
    }

    /// Load the log for `directory`, failing with [`RenameError::NoLogFound`] if absent.
    pub fn load(directory: &Path) -> Result<Self> {
        let path = Self::path_for(directory);
        if !path.is_file() {
            return Err(RenameError::NoLogFound {
                directory: directory.to_path_buf(),
            });
        }

        let file = File::open(&path).map_err(|e| RenameError::io(&path, e))?;
        let pairs: Vec<(PathBuf, PathBuf)> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| RenameError::Json {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            directory: directory.to_path_buf(),
            entries: pairs
                .into_iter()
                .map(|(new_path, original_path)| RenameEntry::new(original_path, new_path))
                .collect(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path(&self) -> PathBuf {
        Self::path_for(&self.directory)
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: RenameEntry) {
        self.entries.push(entry);
    }

    /// Write the log into its directory, replacing any previous log.
    pub fn save(&self) -> Result<()> {
        let path = self.path();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| RenameError::io(&path, e))?;

        let pairs: Vec<(&Path, &Path)> = self
            .entries
            .iter()
            .map(|e| (e.new_path.as_path(), e.original_path.as_path()))
            .collect();

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &pairs).map_err(|source| RenameError::Json {
            path: path.clone(),
            source,
        })?;
        writer.flush().map_err(|e| RenameError::io(&path, e))?;

        Ok(())
    }

    /// Write one `original -> new` line per entry, in log order.
    pub fn write_text<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(
                writer,
                "{} -> {}",
                entry.original_path.display(),
                entry.new_path.display()
            )?;
        }
        writer.flush()
    }

    fn delete(&self) -> Result<()> {
        let path = self.path();
        fs::remove_file(&path).map_err(|e| RenameError::io(&path, e))
    }
}

/// Outcome of undoing a directory's transaction log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoReport {
    pub count: usize,
    /// Entries renamed back, in log order.
    pub reverted: Vec<RenameEntry>,
    /// Entries whose renamed file no longer exists.
    pub skipped: Vec<RenameEntry>,
}

/// Reverse every logged rename whose new path still exists, then delete the log.
///
/// Missing files are skipped. A failing rename stops the undo and keeps the log;
/// running undo again skips the entries already reversed.
pub fn undo(directory: &Path) -> Result<UndoReport> {
    let log = TransactionLog::load(directory)?;
    let mut report = UndoReport::default();

    for entry in log.entries() {
        if entry.new_path.exists() {
            crate::fs::rename(&entry.new_path, &entry.original_path)?;
            tracing::debug!("Reverted {} -> {}", entry.new_name(), entry.original_name());
            report.count += 1;
            report.reverted.push(entry.clone());
        } else {
            tracing::debug!("Skipping missing {}", entry.new_path.display());
            report.skipped.push(entry.clone());
        }
    }

    log.delete()?;
    tracing::info!(
        "Undid {} of {} renames in {}",
        report.count,
        log.len(),
        directory.display()
    );

    Ok(report)
}

/// Export the log of `directory` as text to `destination`. Returns the number of lines written.
pub fn export_log(directory: &Path, destination: &Path) -> Result<usize> {
    let log = TransactionLog::load(directory)?;

    let file = File::create(destination).map_err(|e| RenameError::io(destination, e))?;
    log.write_text(BufWriter::new(file))
        .map_err(|e| RenameError::io(destination, e))?;

    Ok(log.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_log(dir: &Path) -> TransactionLog {
        let mut log = TransactionLog::new(dir);
        log.push(RenameEntry::new(dir.join("IMG_1.jpg"), dir.join("VAC_1.jpg")));
        log.push(RenameEntry::new(dir.join("IMG_2.jpg"), dir.join("VAC_2.jpg")));
        log
    }

    #[test]
    fn test_save_writes_new_path_first() {
        let temp_dir = TempDir::new().unwrap();
        sample_log(temp_dir.path()).save().unwrap();

        let raw = fs::read_to_string(temp_dir.path().join(LOG_FILE_NAME)).unwrap();
        let pairs: Vec<(String, String)> = serde_json::from_str(&raw).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs[0].0.ends_with("VAC_1.jpg"));
        assert!(pairs[0].1.ends_with("IMG_1.jpg"));
    }

    #[test]
    fn test_load_round_trip_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let log = sample_log(temp_dir.path());
        log.save().unwrap();

        let loaded = TransactionLog::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.entries(), log.entries());
    }

    #[test]
    fn test_load_missing_log() {
        let temp_dir = TempDir::new().unwrap();
        let result = TransactionLog::load(temp_dir.path());
        assert!(matches!(result, Err(RenameError::NoLogFound { .. })));
    }

    #[test]
    fn test_load_corrupt_log() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(LOG_FILE_NAME), "not json").unwrap();
        let result = TransactionLog::load(temp_dir.path());
        assert!(matches!(result, Err(RenameError::Json { .. })));
    }

    #[test]
    fn test_write_text_format() {
        let log = {
            let mut log = TransactionLog::new(Path::new("/d"));
            log.push(RenameEntry::new("/d/IMG_1.jpg", "/d/VAC_1.jpg"));
            log
        };

        let mut out = Vec::new();
        log.write_text(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/d/IMG_1.jpg -> /d/VAC_1.jpg\n");
    }

    #[test]
    fn test_undo_skips_missing_and_deletes_log() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("VAC_1.jpg"), "a").unwrap();
        sample_log(dir).save().unwrap();

        let report = undo(dir).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.reverted[0].original_name(), "IMG_1.jpg");
        assert_eq!(report.skipped[0].new_name(), "VAC_2.jpg");
        assert!(dir.join("IMG_1.jpg").exists());
        assert!(!TransactionLog::exists(dir));
    }
}
