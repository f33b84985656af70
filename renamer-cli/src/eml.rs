use anyhow::{Context, Result};
use renamer_core::config::EmlConfig;
use renamer_core::{EmlReport, EmlResult, FailurePolicy};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::{print_result, CliError};

pub fn handle_eml(
    path: &Path,
    config: &EmlConfig,
    timezone: Option<String>,
    fail_fast: bool,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(timezone) = timezone {
        config.timezone = timezone;
    }
    if fail_fast {
        config.failure_policy = FailurePolicy::AbortOnFirstError;
    }

    let renamer = config.renamer()?;
    let outcomes = renamer
        .rename_all(path)
        .with_context(|| format!("Failed to rename email files in {}", path.display()))?;
    let report = EmlReport::from(outcomes);
    let failed = report.failed;

    let result = EmlResult {
        target: path.to_path_buf(),
        report,
    };
    print_result(&result, output, quiet);

    if failed > 0 && config.failure_policy == FailurePolicy::AbortOnFirstError {
        return Err(CliError::EmlHalted.into());
    }
    Ok(())
}
