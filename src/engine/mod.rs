//! engine
//!
//! Diff computation and branch-lineage resolution.
//!
//! # Architecture
//!
//! Every component reads the repository through a [`VcsGateway`] handed to
//! its constructor, and none keeps state between calls:
//!
//! - [`diff::DiffComputer`] - numstat, name-status, and unified diff merged
//!   into a [`DiffResult`], with transient intent-to-add staging for
//!   untracked files ([`staging`])
//! - [`status::StatusReader`] - porcelain status as a path map
//! - [`walker::CommitGraphWalker`] - bounded, paginated history
//! - [`lineage`] - the pure base-branch algorithm
//! - [`base_branch::BaseBranchFinder`] - the algorithm over git, with
//!   call-scoped memoization
//!
//! Text parsers for git's output formats live in [`parse`].
//!
//! [`Engine`] bundles the components behind one gateway and one set of
//! [`EngineSettings`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use forkpoint::engine::{Engine, EngineSettings};
//! use forkpoint::git::GitCli;
//!
//! let engine = Engine::new(Arc::new(GitCli::new()), EngineSettings::default());
//! let diff = engine.diff(Path::new("."), "base:main", "working").await?;
//! let base = engine.base_branch(Path::new("."), "feature").await?;
//! ```

pub mod base_branch;
pub mod diff;
pub mod lineage;
pub mod parse;
pub mod staging;
pub mod status;
pub mod walker;

pub use base_branch::{BaseBranchFinder, ResolutionScope};
pub use diff::{merge_diff, DiffComputer, DiffSettings};
pub use lineage::{find_base_branch_from_data, LineageOracle};
pub use staging::IntentToAdd;
pub use status::StatusReader;
pub use walker::{CommitGraphWalker, LineageSettings};

use std::path::Path;
use std::sync::Arc;

use crate::core::refs::RefSpec;
use crate::core::types::{BaseBranch, BranchComparison, DiffResult, RepoStatus};
use crate::git::{VcsError, VcsGateway, DEFAULT_GIT_BINARY};

/// Resolved settings for all engine components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// git executable for the CLI gateway
    pub git_binary: String,
    /// Diff tuning
    pub diff: DiffSettings,
    /// History pagination
    pub lineage: LineageSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            git_binary: DEFAULT_GIT_BINARY.to_string(),
            diff: DiffSettings::default(),
            lineage: LineageSettings::default(),
        }
    }
}

/// All engine operations over one gateway.
pub struct Engine {
    diff: DiffComputer,
    status: StatusReader,
    lineage: BaseBranchFinder,
}

impl Engine {
    pub fn new(gateway: Arc<dyn VcsGateway>, settings: EngineSettings) -> Self {
        Self {
            diff: DiffComputer::with_settings(Arc::clone(&gateway), settings.diff),
            status: StatusReader::new(Arc::clone(&gateway)),
            lineage: BaseBranchFinder::with_settings(gateway, settings.lineage),
        }
    }

    /// See [`DiffComputer::compute_diff`].
    pub async fn diff(&self, dir: &Path, from: &str, to: &str) -> Result<DiffResult, VcsError> {
        self.diff.compute_diff(dir, from, to).await
    }

    /// See [`DiffComputer::compute`].
    pub async fn diff_refs(
        &self,
        dir: &Path,
        from: &RefSpec,
        to: &RefSpec,
    ) -> Result<DiffResult, VcsError> {
        self.diff.compute(dir, from, to).await
    }

    /// See [`StatusReader::status`].
    pub async fn status(&self, dir: &Path) -> RepoStatus {
        self.status.status(dir).await
    }

    /// See [`BaseBranchFinder::find_base_branch`].
    pub async fn base_branch(
        &self,
        dir: &Path,
        target: &str,
    ) -> Result<Option<BaseBranch>, VcsError> {
        self.lineage.find_base_branch(dir, target).await
    }

    /// See [`BaseBranchFinder::compare_branches`].
    pub async fn compare(
        &self,
        dir: &Path,
        a: &str,
        b: &str,
    ) -> Result<BranchComparison, VcsError> {
        self.lineage.compare_branches(dir, a, b).await
    }

    /// See [`BaseBranchFinder::branches_containing`].
    pub async fn branches_containing(
        &self,
        dir: &Path,
        hash: &str,
    ) -> Result<Vec<String>, VcsError> {
        self.lineage.branches_containing(dir, hash).await
    }
}
