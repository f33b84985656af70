use crate::email::{EmlOutcome, EmlReport};
use crate::engine::{BatchOutcome, RenameFailure, RenameReport};
use crate::fs::human_readable_size;
use crate::planner::Plan;
use crate::status::DirectoryStatus;
use crate::transaction::UndoReport;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

/// `"{n} item|items    {size}"`, the directory status line.
pub fn items_line(files: usize, total_bytes: u64) -> String {
    format!(
        "{} {}    {}",
        files,
        if files == 1 { "item" } else { "items" },
        human_readable_size(total_bytes)
    )
}

fn name_of(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// Result of a batch rename pass
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameResult {
    pub directory: PathBuf,
    pub outcome: BatchOutcome,
}

impl RenameResult {
    fn write_renamed(output: &mut String, report: &RenameReport) {
        if report.entries.is_empty() {
            return;
        }
        output.push_str("Renamed files:\n");
        for (i, entry) in report.entries.iter().enumerate() {
            writeln!(output, "{}. {} -> {}", i + 1, entry.original_name(), entry.new_name())
                .unwrap();
        }
    }

    fn write_failure(output: &mut String, failure: &RenameFailure) {
        writeln!(
            output,
            "✗ {} -> {}: {}",
            failure.entry.original_name(),
            failure.entry.new_name(),
            failure.reason
        )
        .unwrap();
    }
}

impl OutputFormatter for RenameResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": !matches!(self.outcome, BatchOutcome::Halted { .. }),
            "operation": "rename",
            "directory": self.directory,
            "renamed": self.outcome.renamed(),
            "result": self.outcome,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        match &self.outcome {
            BatchOutcome::NothingToDo {
                files_scanned,
                total_bytes,
            } => {
                output.push_str(
                    "No files need to be renamed. All files are already in the desired format.\n",
                );
                writeln!(output, "{}", items_line(*files_scanned, *total_bytes)).unwrap();
            },
            BatchOutcome::Completed(report) => {
                Self::write_renamed(&mut output, report);
                if !report.failures.is_empty() {
                    writeln!(output, "Failed to rename {} files:", report.failures.len()).unwrap();
                    for failure in &report.failures {
                        Self::write_failure(&mut output, failure);
                    }
                }
                writeln!(output, "{}", items_line(report.files_scanned, report.total_bytes))
                    .unwrap();
                if report.count > 0 {
                    writeln!(
                        output,
                        "✓ Renamed {} of {} files. Run `renamer undo` to revert.",
                        report.count, report.files_scanned
                    )
                    .unwrap();
                }
            },
            BatchOutcome::Halted { report, failure } => {
                Self::write_renamed(&mut output, report);
                output.push_str("Renaming halted:\n");
                Self::write_failure(&mut output, failure);
                writeln!(
                    output,
                    "{} renames were applied before the failure and remain in the undo log.",
                    report.count
                )
                .unwrap();
            },
        }

        output
    }
}

/// Result of a dry-run pass
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResult {
    pub directory: PathBuf,
    pub plan: Plan,
}

impl PlanResult {
    /// Render the planned renames as a two-column table.
    pub fn render_table(&self, use_color: bool) -> String {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if use_color {
            table.enforce_styling();
            table.set_header(vec![
                Cell::new("Original").fg(Color::Cyan),
                Cell::new("New").fg(Color::Cyan),
            ]);
        } else {
            table.set_header(vec!["Original", "New"]);
        }

        for entry in &self.plan.entries {
            table.add_row(vec![entry.original_name(), entry.new_name()]);
        }

        table.to_string()
    }

    /// Summary text with an optionally colored table.
    pub fn render_summary(&self, use_color: bool) -> String {
        let mut output = String::new();
        if self.plan.is_empty() {
            output.push_str(
                "No files need to be renamed. All files are already in the desired format.\n",
            );
        } else {
            writeln!(output, "{}", self.render_table(use_color)).unwrap();
            writeln!(output, "Would rename {} files", self.plan.entries.len()).unwrap();
        }
        writeln!(
            output,
            "{}",
            items_line(self.plan.files_scanned, self.plan.total_bytes)
        )
        .unwrap();
        output
    }
}

impl OutputFormatter for PlanResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "plan",
            "directory": self.directory,
            "dry_run": true,
            "plan": self.plan,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        self.render_summary(false)
    }
}

/// Result of an undo operation
#[derive(Debug, Serialize, Deserialize)]
pub struct UndoResult {
    pub directory: PathBuf,
    pub report: UndoReport,
}

impl OutputFormatter for UndoResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "undo",
            "directory": self.directory,
            "reverted": self.report.count,
            "skipped": self.report.skipped.len(),
            "result": self.report,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if !self.report.reverted.is_empty() {
            output.push_str("Undone renaming:\n");
            for (i, entry) in self.report.reverted.iter().enumerate() {
                writeln!(output, "{}. {} -> {}", i + 1, entry.new_name(), entry.original_name())
                    .unwrap();
            }
        }
        if !self.report.skipped.is_empty() {
            writeln!(
                output,
                "Skipped {} entries whose renamed file no longer exists",
                self.report.skipped.len()
            )
            .unwrap();
        }
        writeln!(output, "✓ Renaming has been undone ({} reverted)", self.report.count).unwrap();

        output
    }
}

/// Result of exporting a log as text
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResult {
    pub directory: PathBuf,
    pub destination: PathBuf,
    pub entries: usize,
}

impl OutputFormatter for ExportResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "save-log",
            "directory": self.directory,
            "destination": self.destination,
            "entries": self.entries,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!(
            "Rename log has been saved to {} ({} entries)\n",
            self.destination.display(),
            self.entries
        )
    }
}

/// Result of renaming email files
#[derive(Debug, Serialize, Deserialize)]
pub struct EmlResult {
    pub target: PathBuf,
    pub report: EmlReport,
}

impl OutputFormatter for EmlResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.report.failed == 0,
            "operation": "eml",
            "target": self.target,
            "summary": {
                "renamed": self.report.renamed,
                "skipped": self.report.skipped,
                "failed": self.report.failed,
            },
            "outcomes": self.report.outcomes,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        for outcome in &self.report.outcomes {
            match outcome {
                EmlOutcome::Renamed { from, to } => {
                    writeln!(output, "Renamed '{}' to '{}'", name_of(from), name_of(to)).unwrap();
                },
                EmlOutcome::Skipped { path } => writeln!(
                    output,
                    "Skipped renaming for '{}' (already in correct format)",
                    name_of(path)
                )
                .unwrap(),
                EmlOutcome::Failed { path, reason } => {
                    writeln!(output, "Error renaming '{}': {}", name_of(path), reason).unwrap();
                },
            }
        }
        writeln!(
            output,
            "{} renamed, {} skipped, {} failed",
            self.report.renamed, self.report.skipped, self.report.failed
        )
        .unwrap();

        output
    }
}

impl OutputFormatter for DirectoryStatus {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "status",
            "status": self,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        writeln!(output, "{}", items_line(self.files, self.total_bytes)).unwrap();
        if self.has_log {
            writeln!(output, "Undo log: {} renames can be undone", self.log_entries).unwrap();
        } else {
            output.push_str("Undo log: none\n");
        }
        output
    }
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "name": self.name,
            "version": self.version,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}\n", self.name, self.version)
    }
}
