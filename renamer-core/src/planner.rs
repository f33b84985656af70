use crate::error::Result;
use crate::fs::{list_files, FileInfo};
use crate::rule::{apply_prefix_rule, RenameRule};
use crate::transaction::{RenameEntry, LOG_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Renames computed for one directory, plus the scan totals over every file seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub entries: Vec<RenameEntry>,
    pub files_scanned: usize,
    pub total_bytes: u64,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Progress after each scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub scanned: usize,
    pub total: usize,
    pub total_bytes: u64,
    pub planned: usize,
}

impl ScanProgress {
    /// Fraction of the listing scanned so far, in `0.0..=1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.scanned as f64 / self.total as f64
        }
    }
}

/// Compute the renames `rule` implies for `files`, keeping listing order.
///
/// Every file counts toward the scan totals whether or not it is renamed.
/// The transaction log file is never renamed, and nothing is renamed onto it.
pub fn plan(
    files: &[FileInfo],
    rule: &RenameRule,
    mut on_scan: impl FnMut(&ScanProgress),
) -> Plan {
    let mut plan = Plan::default();

    for file in files {
        plan.files_scanned += 1;
        plan.total_bytes += file.size;

        if file.name != LOG_FILE_NAME {
            match apply_prefix_rule(&file.name, rule) {
                Some(new_name) if new_name == LOG_FILE_NAME => {
                    tracing::warn!("Not renaming {} onto the rename log", file.name);
                },
                Some(new_name) => {
                    let new_path = file.path.with_file_name(&new_name);
                    tracing::debug!("Planned {} -> {}", file.name, new_name);
                    plan.entries.push(RenameEntry::new(file.path.clone(), new_path));
                },
                None => {},
            }
        }

        on_scan(&ScanProgress {
            scanned: plan.files_scanned,
            total: files.len(),
            total_bytes: plan.total_bytes,
            planned: plan.entries.len(),
        });
    }

    plan
}

/// List `dir` and plan it without touching the filesystem.
pub fn plan_directory(dir: &Path, rule: &RenameRule) -> Result<Plan> {
    let files = list_files(dir)?;
    Ok(plan(&files, rule, |_| {}))
}
