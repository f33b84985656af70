use anyhow::{Context, Result};
use renamer_core::directory_status;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::print_result;

pub fn handle_status(directory: &Path, output: OutputFormat, quiet: bool) -> Result<()> {
    let status = directory_status(directory)
        .with_context(|| format!("Failed to get status of {}", directory.display()))?;

    print_result(&status, output, quiet);
    Ok(())
}
