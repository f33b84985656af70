use anyhow::{Context, Result};
use renamer_core::{export_log, ExportResult};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::print_result;

pub fn handle_save_log(
    directory: &Path,
    destination: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let entries = export_log(directory, destination)
        .with_context(|| format!("Failed to save the rename log of {}", directory.display()))?;
    let result = ExportResult {
        directory: directory.to_path_buf(),
        destination: destination.to_path_buf(),
        entries,
    };

    print_result(&result, output, quiet);
    Ok(())
}
