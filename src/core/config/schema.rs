//! core::config::schema
//!
//! Configuration schema types.
//!
//! Global and repo files share one schema. Every field is optional so a
//! file only needs to mention what it overrides.
//!
//! # Validation
//!
//! Values are validated after parsing: numeric bounds on the diff and
//! lineage tables, and a non-empty `git_binary`.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Largest accepted `diff.context_lines`.
pub const MAX_CONTEXT_LINES: u32 = 1000;

/// A configuration file (global or repo scope).
///
/// # Example
///
/// ```toml
/// git_binary = "/usr/local/bin/git"
///
/// [diff]
/// context_lines = 5
/// concurrent_queries = true
///
/// [lineage]
/// batch_size = 20
/// max_commits = 100
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Path or name of the git executable
    pub git_binary: Option<String>,

    /// Diff computation settings
    pub diff: Option<DiffConfig>,

    /// Base-branch resolution settings
    pub lineage: Option<LineageConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(binary) = &self.git_binary {
            if binary.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "git_binary cannot be empty".to_string(),
                ));
            }
        }

        if let Some(diff) = &self.diff {
            diff.validate()?;
        }
        if let Some(lineage) = &self.lineage {
            lineage.validate()?;
        }

        Ok(())
    }
}

/// `[diff]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Lines of context in the unified diff
    pub context_lines: Option<u32>,

    /// Run the three diff queries concurrently
    pub concurrent_queries: Option<bool>,
}

impl DiffConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(lines) = self.context_lines {
            if lines > MAX_CONTEXT_LINES {
                return Err(ConfigError::InvalidValue(format!(
                    "diff.context_lines must be at most {}, got {}",
                    MAX_CONTEXT_LINES, lines
                )));
            }
        }
        Ok(())
    }
}

/// `[lineage]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LineageConfig {
    /// Commits fetched per page
    pub batch_size: Option<usize>,

    /// Cap on commits examined
    pub max_commits: Option<usize>,
}

impl LineageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == Some(0) {
            return Err(ConfigError::InvalidValue(
                "lineage.batch_size must be at least 1".to_string(),
            ));
        }
        if self.max_commits == Some(0) {
            return Err(ConfigError::InvalidValue(
                "lineage.max_commits must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
