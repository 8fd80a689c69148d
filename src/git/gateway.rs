//! git::gateway
//!
//! The gateway trait and its error type.
//!
//! # Error Handling
//!
//! Gateway failures are expected at runtime and are always returned as
//! [`VcsError`] values, never panics. The [`VcsErrorCode`] identifies the
//! failure category:
//! - [`VcsErrorCode::NotARepository`]: directory missing or not under git
//! - [`VcsErrorCode::BranchNotFound`]: unknown or ambiguous revision
//! - [`VcsErrorCode::CommandFailed`]: non-zero exit or spawn failure
//! - [`VcsErrorCode::ParseError`]: output did not have the expected shape

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Failure category of a [`VcsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VcsErrorCode {
    NotARepository,
    BranchNotFound,
    CommandFailed,
    ParseError,
}

impl VcsErrorCode {
    /// Wire name of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            VcsErrorCode::NotARepository => "NOT_A_REPOSITORY",
            VcsErrorCode::BranchNotFound => "BRANCH_NOT_FOUND",
            VcsErrorCode::CommandFailed => "COMMAND_FAILED",
            VcsErrorCode::ParseError => "PARSE_ERROR",
        }
    }
}

impl fmt::Display for VcsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from a gateway operation.
///
/// Carries the command line and stderr when available so callers can show
/// what git actually said.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct VcsError {
    /// Failure category
    pub code: VcsErrorCode,
    /// Human-readable description
    pub message: String,
    /// The command that failed, e.g. `git diff --numstat main`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Captured stderr of the failed command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl VcsError {
    pub fn new(code: VcsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            command: None,
            stderr: None,
        }
    }

    /// Directory missing or not a git working tree.
    pub fn not_a_repository(message: impl Into<String>) -> Self {
        Self::new(VcsErrorCode::NotARepository, message)
    }

    /// Unknown or ambiguous revision.
    pub fn ref_not_found(message: impl Into<String>) -> Self {
        Self::new(VcsErrorCode::BranchNotFound, message)
    }

    /// Non-zero exit or spawn failure.
    pub fn command_failed(message: impl Into<String>) -> Self {
        Self::new(VcsErrorCode::CommandFailed, message)
    }

    /// Unexpected output shape.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(VcsErrorCode::ParseError, message)
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        let stderr = stderr.into();
        if !stderr.is_empty() {
            self.stderr = Some(stderr);
        }
        self
    }
}

/// Executes git subcommands against a working directory.
///
/// Implementations must be safe to call concurrently for read-only commands
/// on the same directory; the diff engine issues its three queries in
/// parallel.
#[async_trait]
pub trait VcsGateway: Send + Sync {
    /// Run `git <args>` in `dir` and return stdout verbatim.
    ///
    /// Stdout must not be trimmed: leading whitespace is significant in
    /// porcelain status output.
    async fn execute(&self, args: &[String], dir: &Path) -> Result<String, VcsError>;

    /// Whether `dir` is inside a non-bare git repository.
    async fn is_repository(&self, dir: &Path) -> bool;
}

/// Build an owned argument list from string slices.
///
/// ```
/// assert_eq!(forkpoint::git::args(&["diff", "--numstat"]), vec!["diff", "--numstat"]);
/// ```
pub fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
