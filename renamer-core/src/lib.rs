#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod email;
pub mod engine;
pub mod error;
pub mod fs;
pub mod output;
pub mod planner;
pub mod rule;
pub mod sanitize;
pub mod status;
pub mod transaction;

pub use config::Config;
pub use email::{EmlOutcome, EmlRenamer, EmlReport};
pub use engine::{
    execute, execute_with_progress, BatchOptions, BatchOutcome, ExistingLogPolicy, FailurePolicy,
    RenameFailure, RenameReport,
};
pub use error::{RenameError, Result};
pub use fs::{human_readable_size, list_files, FileInfo};
pub use output::{
    EmlResult, ExportResult, OutputFormat, OutputFormatter, PlanResult, RenameResult, UndoResult,
    VersionResult,
};
pub use planner::{plan, plan_directory, Plan, ScanProgress};
pub use rule::{apply_prefix_rule, RenameRule};
pub use sanitize::{sanitize_subject, SubjectSanitizer};
pub use status::{directory_status, DirectoryStatus};
pub use transaction::{export_log, undo, RenameEntry, TransactionLog, UndoReport, LOG_FILE_NAME};
