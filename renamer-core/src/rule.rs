use crate::error::{RenameError, Result};
use serde::{Deserialize, Serialize};

/// Prefix substitution rule for a batch rename pass.
///
/// A file is eligible when its name starts with one of `remove_prefixes` and its
/// lowercased name ends with one of `match_extensions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRule {
    remove_prefixes: Vec<String>,
    match_extensions: Vec<String>,
    insert_prefix: String,
}

impl RenameRule {
    /// Build a rule, dropping empty prefixes and blank extensions.
    ///
    /// Prefixes are literal, surrounding whitespace included. Extensions are
    /// stored trimmed and lowercased so the suffix test is case-insensitive.
    pub fn new<P, E>(remove_prefixes: P, match_extensions: E, insert_prefix: &str) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let remove_prefixes: Vec<String> = remove_prefixes
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        let mut extensions: Vec<String> = Vec::new();
        for ext in match_extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            if !ext.is_empty() && !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }

        if remove_prefixes.is_empty() {
            return Err(RenameError::InvalidRule(
                "at least one prefix to remove is required".to_string(),
            ));
        }
        if extensions.is_empty() {
            return Err(RenameError::InvalidRule(
                "at least one file extension is required".to_string(),
            ));
        }
        if insert_prefix.contains(['/', '\\']) {
            return Err(RenameError::InvalidRule(format!(
                "prefix to insert must not contain path separators: '{}'",
                insert_prefix
            )));
        }

        Ok(Self {
            remove_prefixes,
            match_extensions: extensions,
            insert_prefix: insert_prefix.to_string(),
        })
    }

    pub fn remove_prefixes(&self) -> &[String] {
        &self.remove_prefixes
    }

    pub fn match_extensions(&self) -> &[String] {
        &self.match_extensions
    }

    pub fn insert_prefix(&self) -> &str {
        &self.insert_prefix
    }

    /// Whether `filename` starts with a configured prefix and carries a configured extension.
    pub fn is_eligible(&self, filename: &str) -> bool {
        let lowered = filename.to_lowercase();
        self.remove_prefixes.iter().any(|p| filename.starts_with(p.as_str()))
            && self.match_extensions.iter().any(|e| lowered.ends_with(e.as_str()))
    }
}

/// Compute the new name for `filename`, or `None` when the rule leaves it unchanged.
///
/// Prefixes are tried in order against the working name, so a later prefix can match
/// the output of an earlier substitution.
pub fn apply_prefix_rule(filename: &str, rule: &RenameRule) -> Option<String> {
    if !rule.is_eligible(filename) {
        return None;
    }

    let mut working = filename.to_string();
    for prefix in &rule.remove_prefixes {
        if let Some(rest) = working.strip_prefix(prefix.as_str()) {
            working = format!("{}{}", rule.insert_prefix, rest);
        }
    }

    // "." and ".." name the directory itself or its parent
    if working == filename || working == "." || working == ".." {
        None
    } else {
        Some(working)
    }
}
