//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! forkpoint has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! `git_binary` is honored from the global scope only. A repo file naming an
//! executable is ignored with a warning, so cloning a repository never
//! changes which program runs.
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$FORKPOINT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/forkpoint/config.toml`
//! 3. `~/.forkpoint/config.toml`
//!
//! # Repo Config Location
//!
//! `forkpoint/config.toml` inside the common git directory: `.git/` for a
//! regular checkout, the main repository's `.git/` for a linked worktree.
//!
//! # Example
//!
//! ```no_run
//! use forkpoint::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! let settings = result.config.engine_settings();
//! println!("context lines: {}", settings.diff.context_lines);
//! ```

pub mod schema;

pub use schema::{ConfigFile, DiffConfig, LineageConfig, MAX_CONTEXT_LINES};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::diff::{DiffSettings, DEFAULT_CONTEXT_LINES};
use crate::engine::walker::{LineageSettings, DEFAULT_BATCH_SIZE, DEFAULT_MAX_COMMITS};
use crate::engine::EngineSettings;
use crate::git::DEFAULT_GIT_BINARY;

/// Repo config location relative to the common git directory.
const REPO_CONFIG_FILE: &str = "forkpoint/config.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence rules; repo values override global ones.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Repository configuration (if in a repo)
    pub repo: Option<ConfigFile>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_path` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated. Missing files are not an error.
    pub fn load(repo_path: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        Self::load_from(&Self::global_candidates(), repo_path)
    }

    /// Load configuration, taking the first existing global candidate.
    pub fn load_from(
        global_candidates: &[PathBuf],
        repo_path: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = match global_candidates.iter().find(|p| p.exists()) {
            Some(path) => (Self::read_config(path)?, Some(path.clone())),
            None => (ConfigFile::default(), None),
        };

        let (mut repo, repo_path_found) = match repo_path {
            Some(path) => Self::load_repo(path)?,
            None => (None, None),
        };

        global.validate()?;
        if let Some(r) = &repo {
            r.validate()?;
        }

        if let (Some(r), Some(path)) = (repo.as_mut(), repo_path_found.as_ref()) {
            if r.git_binary.take().is_some() {
                warnings.push(ConfigWarning {
                    message: "git_binary is only honored in the global config; ignoring"
                        .to_string(),
                    path: path.clone(),
                });
            }
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                repo,
                global_path,
                repo_path: repo_path_found,
            },
            warnings,
        })
    }

    /// Global config locations in search order.
    pub fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("FORKPOINT_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("forkpoint/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".forkpoint/config.toml"));
        }
        candidates
    }

    fn load_repo(repo_path: &Path) -> Result<(Option<ConfigFile>, Option<PathBuf>), ConfigError> {
        let path = Self::repo_config_path(repo_path);
        if !path.exists() {
            return Ok((None, None));
        }
        let config = Self::read_config(&path)?;
        Ok((Some(config), Some(path)))
    }

    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Canonical repo config path for the repository rooted at `repo_path`.
    ///
    /// The file lives in the common git directory, so every linked worktree
    /// of a repository shares it. Outside a repository this falls back to
    /// `<repo_path>/.git/forkpoint/config.toml`.
    pub fn repo_config_path(repo_path: &Path) -> PathBuf {
        match git2::Repository::open(repo_path) {
            Ok(repo) => repo.commondir().join(REPO_CONFIG_FILE),
            Err(_) => repo_path.join(".git").join(REPO_CONFIG_FILE),
        }
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    fn diff_value<T>(&self, field: impl Fn(&DiffConfig) -> Option<T>) -> Option<T> {
        [self.repo.as_ref(), Some(&self.global)]
            .into_iter()
            .flatten()
            .find_map(|c| c.diff.as_ref().and_then(&field))
    }

    fn lineage_value<T>(&self, field: impl Fn(&LineageConfig) -> Option<T>) -> Option<T> {
        [self.repo.as_ref(), Some(&self.global)]
            .into_iter()
            .flatten()
            .find_map(|c| c.lineage.as_ref().and_then(&field))
    }

    /// The git executable.
    ///
    /// Defaults to `git` (resolved through `PATH`).
    pub fn git_binary(&self) -> &str {
        self.global
            .git_binary
            .as_deref()
            .unwrap_or(DEFAULT_GIT_BINARY)
    }

    /// Lines of unified-diff context.
    pub fn context_lines(&self) -> u32 {
        self.diff_value(|d| d.context_lines)
            .unwrap_or(DEFAULT_CONTEXT_LINES)
    }

    /// Whether the three diff queries may run concurrently.
    ///
    /// Defaults to `true`.
    pub fn concurrent_queries(&self) -> bool {
        self.diff_value(|d| d.concurrent_queries).unwrap_or(true)
    }

    pub fn batch_size(&self) -> usize {
        self.lineage_value(|l| l.batch_size)
            .unwrap_or(DEFAULT_BATCH_SIZE)
    }

    pub fn max_commits(&self) -> usize {
        self.lineage_value(|l| l.max_commits)
            .unwrap_or(DEFAULT_MAX_COMMITS)
    }

    /// Resolved settings for the engine components.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            git_binary: self.git_binary().to_string(),
            diff: DiffSettings {
                context_lines: self.context_lines(),
                concurrent_queries: self.concurrent_queries(),
            },
            lineage: LineageSettings {
                batch_size: self.batch_size(),
                max_commits: self.max_commits(),
            },
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
