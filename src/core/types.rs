//! core::types
//!
//! Value types produced by the diff and lineage engine.
//!
//! # Types
//!
//! - [`DiffStatus`] / [`FileDiffSummary`] / [`DiffResult`] - Structured diff output
//! - [`FileStatus`] / [`FileStatusMap`] / [`RepoStatus`] - Working tree status
//! - [`CommitNode`] - A commit and its first parent
//! - [`BranchComparison`] - Ahead/behind counts between two branches
//! - [`BaseBranch`] - The closest ancestor branch of a target branch
//!
//! # Ownership
//!
//! Everything here is a request-scoped value. Nothing carries identity past
//! the call that produced it.
//!
//! # Serialization
//!
//! Field names serialize in camelCase (`filePath`, `rawDiff`, `isGitRepo`)
//! because UI callers consume these shapes directly as JSON.
//!
//! # Examples
//!
//! ```
//! use forkpoint::core::types::{DiffResult, DiffStatus, FileDiffSummary};
//!
//! let result = DiffResult::from_parts(
//!     String::new(),
//!     vec![FileDiffSummary::new("src/lib.rs", 3, 1, DiffStatus::Modified)],
//! );
//! assert_eq!(result.summary.total_files, 1);
//! assert_eq!(result.summary.total_additions, 3);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Change type of a file within a diff between two refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    Untracked,
}

impl DiffStatus {
    /// Whether this status carries an old path.
    pub fn has_old_path(&self) -> bool {
        matches!(self, DiffStatus::Renamed | DiffStatus::Copied)
    }

    /// Lowercase name used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Added => "added",
            DiffStatus::Deleted => "deleted",
            DiffStatus::Modified => "modified",
            DiffStatus::Renamed => "renamed",
            DiffStatus::Copied => "copied",
            DiffStatus::Untracked => "untracked",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-file entry of a [`DiffResult`].
///
/// `old_file_path` is set only for renamed and copied files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiffSummary {
    /// Current path of the file
    pub file_path: String,
    /// Lines added (0 for binary files)
    pub additions: u64,
    /// Lines deleted (0 for binary files)
    pub deletions: u64,
    /// Change type
    pub status: DiffStatus,
    /// Previous path for renames and copies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_file_path: Option<String>,
}

impl FileDiffSummary {
    /// Create an entry without an old path.
    pub fn new(
        file_path: impl Into<String>,
        additions: u64,
        deletions: u64,
        status: DiffStatus,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            additions,
            deletions,
            status,
            old_file_path: None,
        }
    }

    /// Attach an old path. Ignored unless the status is renamed or copied.
    pub fn with_old_path(mut self, old: impl Into<String>) -> Self {
        if self.status.has_old_path() {
            self.old_file_path = Some(old.into());
        }
        self
    }
}

/// Totals across all files of a [`DiffResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub total_files: usize,
    pub total_additions: u64,
    pub total_deletions: u64,
}

/// Structured diff between two refs.
///
/// The summary always agrees with `files`: use [`DiffResult::from_parts`]
/// to build one so the totals are derived rather than supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Unified diff text, verbatim from git
    pub raw_diff: String,
    /// Per-file entries
    pub files: Vec<FileDiffSummary>,
    /// Totals over `files`
    pub summary: DiffSummary,
}

impl DiffResult {
    /// The canonical empty diff (no files, empty text, zero totals).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a result, computing the summary from `files`.
    pub fn from_parts(raw_diff: String, files: Vec<FileDiffSummary>) -> Self {
        let summary = DiffSummary {
            total_files: files.len(),
            total_additions: files.iter().map(|f| f.additions).sum(),
            total_deletions: files.iter().map(|f| f.deletions).sum(),
        };
        Self {
            raw_diff,
            files,
            summary,
        }
    }

    /// Whether the diff contains no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Working tree status of a single path.
///
/// Coarser than [`DiffStatus`]: copies are reported as `Added`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
}

impl FileStatus {
    /// Lowercase name used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Renamed => "renamed",
            FileStatus::Untracked => "untracked",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Path → status map. Ordered so output is stable.
pub type FileStatusMap = BTreeMap<String, FileStatus>;

/// Result of a status query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    /// Whether the directory is inside a git working tree
    pub is_git_repo: bool,
    /// Status per path
    pub files: FileStatusMap,
}

impl RepoStatus {
    /// Status for a directory that is not a repository.
    pub fn not_a_repo() -> Self {
        Self::default()
    }

    /// Status for a repository whose status could not be read.
    pub fn unknown() -> Self {
        Self {
            is_git_repo: true,
            files: FileStatusMap::new(),
        }
    }
}

/// A commit and its first parent.
///
/// Root commits have no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    pub hash: String,
    #[serde(rename = "parentHash")]
    pub parent: Option<String>,
}

impl CommitNode {
    pub fn new(hash: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            hash: hash.into(),
            parent,
        }
    }
}

/// Divergence between two branches `a` and `b`.
///
/// For `compare(a, b)`:
/// - `behind` counts commits reachable from `a` but not from `b`
/// - `ahead` counts commits reachable from `b` but not from `a`
///
/// So `behind > 0` means `a` has work that `b` lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BranchComparison {
    pub ahead: u64,
    pub behind: u64,
}

impl BranchComparison {
    pub fn new(ahead: u64, behind: u64) -> Self {
        Self { ahead, behind }
    }

    /// Whether the two branches point at equivalent history.
    pub fn is_even(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

/// The closest ancestor branch and the commit where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseBranch {
    pub branch: String,
    pub hash: String,
}

impl BaseBranch {
    pub fn new(branch: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            hash: hash.into(),
        }
    }
}

impl fmt::Display for BaseBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.branch, self.hash)
    }
}
