//! Canonical filenames for `.eml` messages: `{date} {subject}.eml`.

pub mod headers;

use crate::engine::FailurePolicy;
use crate::error::{RenameError, Result};
use crate::fs::list_files;
use crate::sanitize::{collapse_underscores, SubjectSanitizer};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub use headers::Headers;

/// Used in place of the date when the header is missing or unparsable.
pub const UNKNOWN_DATE: &str = "Unknown_Date";
/// Used when a message has no `Subject` header.
pub const NO_SUBJECT: &str = "No Subject";
/// Default civil time zone for formatted dates (India Standard Time, no DST).
pub const DEFAULT_TIMEZONE: &str = "+05:30";
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H_%M_%S";

static TIMEZONE_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-])(\d{2}):?(\d{2})$").expect("valid regex"));
static TRAILING_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("valid regex"));

/// Parse a fixed UTC offset such as `+05:30`, `-0800`, `Z` or `UTC`.
pub fn parse_timezone(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let caps = TIMEZONE_OFFSET.captures(value)?;
    let hours: i32 = caps[2].parse().ok()?;
    let minutes: i32 = caps[3].parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    let seconds = (hours * 60 + minutes) * 60;
    FixedOffset::east_opt(if &caps[1] == "-" { -seconds } else { seconds })
}

/// Result of processing one message file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EmlOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    /// Already carries its canonical name.
    Skipped { path: PathBuf },
    Failed { path: PathBuf, reason: String },
}

impl EmlOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Renames `.eml` files to `{date} {subject}.eml`.
#[derive(Debug, Clone)]
pub struct EmlRenamer {
    sanitizer: SubjectSanitizer,
    timezone: FixedOffset,
    on_failure: FailurePolicy,
}

impl Default for EmlRenamer {
    fn default() -> Self {
        Self {
            sanitizer: SubjectSanitizer::default(),
            timezone: parse_timezone(DEFAULT_TIMEZONE).unwrap_or_else(|| Utc.fix()),
            on_failure: FailurePolicy::SkipAndContinue,
        }
    }
}

impl EmlRenamer {
    pub fn new(sanitizer: SubjectSanitizer, timezone: FixedOffset, on_failure: FailurePolicy) -> Self {
        Self {
            sanitizer,
            timezone,
            on_failure,
        }
    }

    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Format a `Date` header in the target zone, or [`UNKNOWN_DATE`].
    pub fn format_date(&self, header: Option<&str>) -> String {
        let Some(header) = header else {
            return UNKNOWN_DATE.to_string();
        };

        let header = TRAILING_COMMENT.replace(header.trim(), "");
        match DateTime::parse_from_rfc2822(&header) {
            Ok(date) => date.with_timezone(&self.timezone).format(DATE_FORMAT).to_string(),
            Err(err) => {
                tracing::debug!("Unparsable date {:?}: {}", header, err);
                UNKNOWN_DATE.to_string()
            },
        }
    }

    /// Sanitized subject with spaces turned into underscores.
    pub fn canonical_subject(&self, raw_subject: &str) -> String {
        self.sanitizer.sanitize(raw_subject.trim()).replace(' ', "_")
    }

    /// Build the canonical file name from a formatted date and canonical subject.
    pub fn canonical_name(formatted_date: &str, subject: &str) -> String {
        let name = format!("{} {}.eml", formatted_date, subject);
        collapse_underscores(&name).trim_end_matches('.').to_string()
    }

    /// Whether `file_name` already is the canonical name for this date and subject.
    pub fn is_canonical(file_name: &str, formatted_date: &str, subject: &str) -> bool {
        let expected = format!("{} {}.eml", formatted_date, collapse_underscores(subject));
        file_name == expected
    }

    /// Canonical file name for the message in `raw`.
    pub fn name_for_message(&self, raw: &[u8]) -> (String, String) {
        let headers = Headers::parse(raw);
        let subject = self.canonical_subject(headers.get("Subject").unwrap_or(NO_SUBJECT));
        let date = self.format_date(headers.get("Date"));
        (date, subject)
    }

    /// Rename one message file. Failures are reported in the outcome, never raised.
    pub fn rename_one(&self, path: &Path) -> EmlOutcome {
        match self.try_rename_one(path) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("Error renaming '{}': {}", display_name(path), err);
                EmlOutcome::Failed {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                }
            },
        }
    }

    fn try_rename_one(&self, path: &Path) -> Result<EmlOutcome> {
        let raw = std::fs::read(path).map_err(|e| RenameError::io(path, e))?;
        let (date, subject) = self.name_for_message(&raw);
        let current = display_name(path);

        if Self::is_canonical(&current, &date, &subject) {
            tracing::debug!("Skipped '{}' (already in correct format)", current);
            return Ok(EmlOutcome::Skipped {
                path: path.to_path_buf(),
            });
        }

        let new_path = path.with_file_name(Self::canonical_name(&date, &subject));
        crate::fs::rename(path, &new_path)?;
        tracing::info!("Renamed '{}' to '{}'", current, display_name(&new_path));

        Ok(EmlOutcome::Renamed {
            from: path.to_path_buf(),
            to: new_path,
        })
    }

    /// Rename every `.eml` file directly inside a directory, or a single `.eml` file.
    pub fn rename_all(&self, path: &Path) -> Result<Vec<EmlOutcome>> {
        if path.is_dir() {
            let mut outcomes = Vec::new();
            for file in list_files(path)? {
                if !file.name.ends_with(".eml") {
                    continue;
                }

                let outcome = self.rename_one(&file.path);
                let failed = outcome.is_failed();
                outcomes.push(outcome);
                if failed && self.on_failure == FailurePolicy::AbortOnFirstError {
                    break;
                }
            }
            Ok(outcomes)
        } else if path.is_file() && path.to_string_lossy().ends_with(".eml") {
            Ok(vec![self.rename_one(path)])
        } else {
            Err(RenameError::InvalidTarget {
                path: path.to_path_buf(),
            })
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned())
}

/// Counts over a set of outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmlReport {
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<EmlOutcome>,
}

impl From<Vec<EmlOutcome>> for EmlReport {
    fn from(outcomes: Vec<EmlOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in &outcomes {
            match outcome {
                EmlOutcome::Renamed { .. } => report.renamed += 1,
                EmlOutcome::Skipped { .. } => report.skipped += 1,
                EmlOutcome::Failed { .. } => report.failed += 1,
            }
        }
        report.outcomes = outcomes;
        report
    }
}
