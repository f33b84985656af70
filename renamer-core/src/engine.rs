use crate::error::{RenameError, Result};
use crate::fs::list_files;
use crate::planner::{plan, ScanProgress};
use crate::rule::RenameRule;
use crate::transaction::{RenameEntry, TransactionLog};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when the filesystem rejects one rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure; renames already committed stay applied.
    #[default]
    #[serde(alias = "abort")]
    AbortOnFirstError,
    /// Record the failure and carry on with the next file.
    #[serde(alias = "continue")]
    SkipAndContinue,
}

/// What a pass with work to do does when the directory already holds a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExistingLogPolicy {
    /// Fail with [`RenameError::LogExists`] before renaming anything.
    #[default]
    Refuse,
    /// Replace the old log; its renames can no longer be undone.
    Overwrite,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub on_failure: FailurePolicy,
    pub existing_log: ExistingLogPolicy,
}

/// A rename the filesystem refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameFailure {
    pub entry: RenameEntry,
    pub reason: String,
}

/// Summary of a pass that renamed at least one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameReport {
    pub count: usize,
    pub files_scanned: usize,
    pub total_bytes: u64,
    pub entries: Vec<RenameEntry>,
    pub failures: Vec<RenameFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// No file needed renaming; no log was written.
    NothingToDo { files_scanned: usize, total_bytes: u64 },
    Completed(RenameReport),
    /// Stopped at `failure`; the renames in `report` were committed and logged.
    Halted {
        report: RenameReport,
        failure: RenameFailure,
    },
}

impl BatchOutcome {
    pub fn report(&self) -> Option<&RenameReport> {
        match self {
            Self::NothingToDo { .. } => None,
            Self::Completed(report) | Self::Halted { report, .. } => Some(report),
        }
    }

    pub fn renamed(&self) -> usize {
        self.report().map_or(0, |r| r.count)
    }
}

/// Run a batch rename pass over `directory`.
pub fn execute(directory: &Path, rule: &RenameRule, options: BatchOptions) -> Result<BatchOutcome> {
    execute_with_progress(directory, rule, options, |_| {})
}

/// Like [`execute`], reporting progress after each scanned file.
pub fn execute_with_progress(
    directory: &Path,
    rule: &RenameRule,
    options: BatchOptions,
    on_scan: impl FnMut(&ScanProgress),
) -> Result<BatchOutcome> {
    let files = list_files(directory)?;
    let plan = plan(&files, rule, on_scan);

    if plan.is_empty() {
        tracing::info!("Nothing to rename in {}", directory.display());
        return Ok(BatchOutcome::NothingToDo {
            files_scanned: plan.files_scanned,
            total_bytes: plan.total_bytes,
        });
    }

    if options.existing_log == ExistingLogPolicy::Refuse && TransactionLog::exists(directory) {
        return Err(RenameError::LogExists {
            path: TransactionLog::path_for(directory),
        });
    }

    let mut log = TransactionLog::new(directory);
    let mut report = RenameReport {
        files_scanned: plan.files_scanned,
        total_bytes: plan.total_bytes,
        ..RenameReport::default()
    };
    let mut halted_on = None;

    for entry in plan.entries {
        match crate::fs::rename(&entry.original_path, &entry.new_path) {
            Ok(()) => {
                tracing::debug!("Renamed {} -> {}", entry.original_name(), entry.new_name());
                report.count += 1;
                log.push(entry.clone());
                report.entries.push(entry);
            },
            Err(err) => {
                let failure = RenameFailure {
                    entry,
                    reason: err.to_string(),
                };
                match options.on_failure {
                    FailurePolicy::AbortOnFirstError => {
                        tracing::warn!("Halting batch: {}", failure.reason);
                        halted_on = Some(failure);
                        break;
                    },
                    FailurePolicy::SkipAndContinue => {
                        tracing::warn!("Skipping: {}", failure.reason);
                        report.failures.push(failure);
                    },
                }
            },
        }
    }

    if !log.is_empty() {
        log.save()?;
    }

    tracing::info!(
        "Renamed {} of {} files in {}",
        report.count,
        report.files_scanned,
        directory.display()
    );

    Ok(match halted_on {
        Some(failure) => BatchOutcome::Halted { report, failure },
        None => BatchOutcome::Completed(report),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vac_rule() -> RenameRule {
        RenameRule::new(["IMG_"], [".jpg"], "VAC_").unwrap()
    }

    #[test]
    fn test_policy_names_in_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            on_failure: FailurePolicy,
            existing_log: ExistingLogPolicy,
        }

        let parsed: Wrapper =
            toml::from_str("on_failure = \"continue\"\nexisting_log = \"overwrite\"").unwrap();
        assert_eq!(parsed.on_failure, FailurePolicy::SkipAndContinue);
        assert_eq!(parsed.existing_log, ExistingLogPolicy::Overwrite);

        let parsed: Wrapper =
            toml::from_str("on_failure = \"abort-on-first-error\"\nexisting_log = \"refuse\"")
                .unwrap();
        assert_eq!(parsed.on_failure, FailurePolicy::AbortOnFirstError);
    }

    #[test]
    fn test_refuses_to_replace_existing_log() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("IMG_001.jpg"), "x").unwrap();
        TransactionLog::new(dir).save().unwrap();

        let result = execute(dir, &vac_rule(), BatchOptions::default());
        assert!(matches!(result, Err(RenameError::LogExists { .. })));
        assert!(dir.join("IMG_001.jpg").exists());
    }

    #[test]
    fn test_overwrite_replaces_existing_log() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("IMG_001.jpg"), "x").unwrap();
        TransactionLog::new(dir).save().unwrap();

        let options = BatchOptions {
            existing_log: ExistingLogPolicy::Overwrite,
            ..BatchOptions::default()
        };
        let outcome = execute(dir, &vac_rule(), options).unwrap();
        assert_eq!(outcome.renamed(), 1);
        assert_eq!(TransactionLog::load(dir).unwrap().len(), 1);
    }

    #[test]
    fn test_nothing_to_do_ignores_existing_log() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("doc.txt"), "12345").unwrap();
        TransactionLog::new(dir).save().unwrap();

        let outcome = execute(dir, &vac_rule(), BatchOptions::default()).unwrap();
        assert!(matches!(outcome, BatchOutcome::NothingToDo { files_scanned: 2, .. }));
    }

    #[test]
    fn test_skip_policy_with_every_rename_failing() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        for n in ["001", "002"] {
            fs::write(dir.join(format!("IMG_{n}.jpg")), n).unwrap();
            // A non-empty directory cannot be replaced by a file.
            fs::create_dir(dir.join(format!("VAC_{n}.jpg"))).unwrap();
            fs::write(dir.join(format!("VAC_{n}.jpg")).join("keep"), "x").unwrap();
        }

        let options = BatchOptions {
            on_failure: FailurePolicy::SkipAndContinue,
            ..BatchOptions::default()
        };
        let outcome = execute(dir, &vac_rule(), options).unwrap();
        let BatchOutcome::Completed(report) = outcome else {
            panic!("expected a completed batch");
        };
        assert_eq!(report.count, 0);
        assert!(report.entries.is_empty());
        assert_eq!(report.failures.len(), 2);
        assert!(!TransactionLog::exists(dir));
    }
}
