use crate::email::{parse_timezone, EmlRenamer, DEFAULT_TIMEZONE};
use crate::engine::{BatchOptions, ExistingLogPolicy, FailurePolicy};
use crate::error::{RenameError, Result};
use crate::rule::RenameRule;
use crate::sanitize::{SubjectSanitizer, DEFAULT_PROTECTED_TERMS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding the config file, relative to the working directory.
pub const CONFIG_DIR: &str = ".renamer";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub rename: RenameConfig,

    #[serde(default)]
    pub eml: EmlConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameConfig {
    /// Prefixes a file name must start with to be renamed
    #[serde(default = "default_prefixes")]
    pub remove_prefixes: Vec<String>,

    /// Extensions (with the dot) a file name must end with, case-insensitive
    #[serde(default = "default_extensions")]
    pub match_extensions: Vec<String>,

    /// Prefix substituted for the removed one
    #[serde(default)]
    pub insert_prefix: String,

    /// "refuse" or "overwrite" when an undo log already exists
    #[serde(default)]
    pub existing_log: ExistingLogPolicy,

    /// "abort" or "continue" when a rename fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            remove_prefixes: default_prefixes(),
            match_extensions: default_extensions(),
            insert_prefix: String::new(),
            existing_log: ExistingLogPolicy::default(),
            failure_policy: FailurePolicy::AbortOnFirstError,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmlConfig {
    /// Fixed UTC offset dates are converted to, e.g. "+05:30"
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Terms whose dots survive subject sanitization
    #[serde(default = "default_protected_terms")]
    pub protected_terms: Vec<String>,

    #[serde(default = "default_eml_failure_policy")]
    pub failure_policy: FailurePolicy,
}

impl Default for EmlConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            protected_terms: default_protected_terms(),
            failure_policy: default_eml_failure_policy(),
        }
    }
}

fn default_prefixes() -> Vec<String> {
    vec!["IMG_".to_string(), "VID_".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec![".jpg".to_string(), ".mp4".to_string()]
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_protected_terms() -> Vec<String> {
    DEFAULT_PROTECTED_TERMS.iter().map(ToString::to_string).collect()
}

fn default_eml_failure_policy() -> FailurePolicy {
    FailurePolicy::SkipAndContinue
}

impl Config {
    /// Load `.renamer/config.toml` from the current directory if it exists.
    pub fn load() -> Result<Self> {
        if let Ok(cwd) = std::env::current_dir() {
            let config_path = cwd.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RenameError::io(path, e))?;
        toml::from_str(&content).map_err(|e| RenameError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save config to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| RenameError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RenameError::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| RenameError::io(path, e))
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_DIR).join(CONFIG_FILE)
    }
}

impl RenameConfig {
    pub fn rule(&self) -> Result<RenameRule> {
        RenameRule::new(&self.remove_prefixes, &self.match_extensions, &self.insert_prefix)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            on_failure: self.failure_policy,
            existing_log: self.existing_log,
        }
    }
}

impl EmlConfig {
    pub fn renamer(&self) -> Result<EmlRenamer> {
        let timezone = parse_timezone(&self.timezone).ok_or_else(|| RenameError::Config {
            path: Config::default_path(),
            message: format!("invalid timezone offset '{}'", self.timezone),
        })?;

        Ok(EmlRenamer::new(
            SubjectSanitizer::new(&self.protected_terms),
            timezone,
            self.failure_policy,
        ))
    }
}
