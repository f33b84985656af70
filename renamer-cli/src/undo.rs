use anyhow::{Context, Result};
use renamer_core::{undo, UndoResult};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::print_result;

pub fn handle_undo(directory: &Path, output: OutputFormat, quiet: bool) -> Result<()> {
    let report = undo(directory)
        .with_context(|| format!("Failed to undo renames in {}", directory.display()))?;
    let result = UndoResult {
        directory: directory.to_path_buf(),
        report,
    };

    print_result(&result, output, quiet);
    Ok(())
}
