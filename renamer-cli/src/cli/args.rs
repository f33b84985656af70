use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Reversible prefix batch renames and canonical email filenames
#[derive(Parser, Debug)]
#[command(name = "renamer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of .renamer/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Rule arguments; anything left unset falls back to the config file
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    /// Prefixes to remove (comma-separated, e.g. "IMG_,VID_")
    #[arg(long = "remove-prefix", value_delimiter = ',')]
    pub remove_prefixes: Vec<String>,

    /// Extensions to match, case-insensitive (comma-separated, e.g. ".jpg,.mp4")
    #[arg(long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Prefix to put in place of the removed one
    #[arg(long)]
    pub insert_prefix: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Swap file name prefixes in a directory and record an undo log
    Rename {
        /// Directory whose files are renamed (not recursive)
        directory: PathBuf,

        #[command(flatten)]
        rule: RuleArgs,

        /// Show the planned renames without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Replace an existing undo log instead of refusing to run
        #[arg(long)]
        overwrite_log: bool,

        /// Record failed renames and continue with the remaining files
        #[arg(long)]
        keep_going: bool,

        /// Don't show the progress bar
        #[arg(long)]
        no_progress: bool,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output
        #[arg(long)]
        quiet: bool,
    },

    /// Revert the renames recorded in a directory's undo log
    Undo {
        directory: PathBuf,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output
        #[arg(long)]
        quiet: bool,
    },

    /// Write a directory's undo log as "original -> new" text lines
    SaveLog {
        directory: PathBuf,

        /// Text file to write
        destination: PathBuf,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output
        #[arg(long)]
        quiet: bool,
    },

    /// Rename .eml files to "{date} {subject}.eml"
    Eml {
        /// A directory of .eml files or a single .eml file
        path: PathBuf,

        /// Fixed UTC offset for formatted dates (e.g. "+05:30", "-08:00", "UTC")
        #[arg(long, allow_hyphen_values = true)]
        timezone: Option<String>,

        /// Stop at the first file that cannot be renamed
        #[arg(long)]
        fail_fast: bool,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output
        #[arg(long)]
        quiet: bool,
    },

    /// Show file totals and undo log state for a directory
    Status {
        directory: PathBuf,

        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Suppress all output
        #[arg(long)]
        quiet: bool,
    },

    /// Show version information
    Version {
        /// Output format for machine consumption
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rename_args() {
        let cli = Cli::parse_from([
            "renamer",
            "rename",
            "photos",
            "--remove-prefix",
            "IMG_,VID_",
            "--ext",
            ".jpg",
            "--insert-prefix",
            "VAC_",
            "--keep-going",
        ]);
        let Commands::Rename {
            directory,
            rule,
            keep_going,
            dry_run,
            ..
        } = cli.command
        else {
            panic!("expected rename command");
        };
        assert_eq!(directory, PathBuf::from("photos"));
        assert_eq!(rule.remove_prefixes, ["IMG_", "VID_"]);
        assert_eq!(rule.extensions, [".jpg"]);
        assert_eq!(rule.insert_prefix.as_deref(), Some("VAC_"));
        assert!(keep_going);
        assert!(!dry_run);
    }

    #[test]
    fn test_eml_negative_timezone() {
        let cli = Cli::parse_from(["renamer", "eml", "mail", "--timezone", "-08:00"]);
        let Commands::Eml { timezone, .. } = cli.command else {
            panic!("expected eml command");
        };
        assert_eq!(timezone.as_deref(), Some("-08:00"));
    }
}
