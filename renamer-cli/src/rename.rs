use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use renamer_core::config::RenameConfig;
use renamer_core::{
    execute_with_progress, plan_directory, BatchOptions, BatchOutcome, ExistingLogPolicy,
    FailurePolicy, PlanResult, RenameResult, RenameRule,
};
use std::path::Path;

use crate::cli::{OutputFormat, RuleArgs};
use crate::{print_result, CliError};

/// Build the rule from CLI arguments, falling back to the config for anything unset.
pub fn resolve_rule(config: &RenameConfig, args: &RuleArgs) -> Result<RenameRule> {
    let prefixes = if args.remove_prefixes.is_empty() {
        &config.remove_prefixes
    } else {
        &args.remove_prefixes
    };
    let extensions = if args.extensions.is_empty() {
        &config.match_extensions
    } else {
        &args.extensions
    };
    let insert_prefix = args.insert_prefix.as_deref().unwrap_or(&config.insert_prefix);

    Ok(RenameRule::new(prefixes, extensions, insert_prefix)?)
}

pub fn resolve_options(config: &RenameConfig, overwrite_log: bool, keep_going: bool) -> BatchOptions {
    let mut options = config.batch_options();
    if overwrite_log {
        options.existing_log = ExistingLogPolicy::Overwrite;
    }
    if keep_going {
        options.on_failure = FailurePolicy::SkipAndContinue;
    }
    options
}

fn scan_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Scanning [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(bar)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_rename(
    directory: &Path,
    rule: &RenameRule,
    options: BatchOptions,
    dry_run: bool,
    show_progress: bool,
    use_color: bool,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    if dry_run {
        let plan = plan_directory(directory, rule)
            .with_context(|| format!("Failed to plan renames in {}", directory.display()))?;
        let result = PlanResult {
            directory: directory.to_path_buf(),
            plan,
        };
        if output == OutputFormat::Summary && !quiet {
            print!("{}", result.render_summary(use_color));
        } else {
            print_result(&result, output, quiet);
        }
        return Ok(());
    }

    let bar = if show_progress && output == OutputFormat::Summary && !quiet {
        scan_bar()?
    } else {
        ProgressBar::hidden()
    };

    let outcome = execute_with_progress(directory, rule, options, |progress| {
        bar.set_length(progress.total as u64);
        bar.set_position(progress.scanned as u64);
        bar.set_message(format!("{} to rename", progress.planned));
    });
    bar.finish_and_clear();
    let outcome =
        outcome.with_context(|| format!("Failed to rename files in {}", directory.display()))?;

    let halted = match &outcome {
        BatchOutcome::Halted { report, .. } => Some(report.count),
        _ => None,
    };

    let result = RenameResult {
        directory: directory.to_path_buf(),
        outcome,
    };
    print_result(&result, output, quiet);

    match halted {
        Some(renamed) => Err(CliError::Halted { renamed }.into()),
        None => Ok(()),
    }
}
