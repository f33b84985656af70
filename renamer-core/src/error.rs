use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by rename, undo, export and email operations.
#[derive(Debug, Error)]
pub enum RenameError {
    /// Undo or export was requested but the directory holds no transaction log.
    #[error("No rename log found in {}. Nothing to undo.", directory.display())]
    NoLogFound { directory: PathBuf },

    /// The filesystem rejected a rename.
    #[error("Failed to rename {} -> {}: {source}", from.display(), to.display())]
    OsFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The email renamer was pointed at something other than a directory or `.eml` file.
    #[error("Invalid path {}: expected a directory or a .eml file", path.display())]
    InvalidTarget { path: PathBuf },

    #[error("Invalid rename rule: {0}")]
    InvalidRule(String),

    /// A rename pass would replace a log that has not been undone yet.
    #[error(
        "A rename log already exists at {}. Undo it first or allow overwriting it.",
        path.display()
    )]
    LogExists { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse rename log {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl RenameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by what the caller asked for rather than by the filesystem.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NoLogFound { .. }
                | Self::InvalidTarget { .. }
                | Self::InvalidRule(_)
                | Self::LogExists { .. }
                | Self::Config { .. }
        )
    }
}

pub type Result<T, E = RenameError> = std::result::Result<T, E>;
