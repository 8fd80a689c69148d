//! engine::base_branch
//!
//! Base-branch resolution backed by git.
//!
//! # Design
//!
//! [`BaseBranchFinder::find_base_branch`] fetches a bounded window of the
//! target's history and runs [`find_base_branch_from_data`] against a
//! [`ResolutionScope`]: a git-backed [`LineageOracle`] that memoizes
//! containment answers per commit hash and comparisons per ordered branch
//! pair.
//!
//! A scope lives for exactly one resolution. Concurrent resolutions each get
//! their own, so nothing is shared and nothing needs locking.
//!
//! Any gateway failure aborts the resolution with that error. There is no
//! retry and no best-guess answer.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::lineage::{find_base_branch_from_data, LineageOracle};
use super::parse::{parse_branch_list, parse_left_right};
use super::walker::{CommitGraphWalker, LineageSettings};
use crate::core::types::{BaseBranch, BranchComparison};
use crate::git::{VcsError, VcsGateway};

/// Names of local branches whose history contains `hash`.
///
/// # Errors
///
/// Returns the gateway failure, e.g. `BRANCH_NOT_FOUND` for an unknown hash.
pub async fn branches_containing(
    gateway: &dyn VcsGateway,
    dir: &Path,
    hash: &str,
) -> Result<Vec<String>, VcsError> {
    let args = vec![
        "branch".to_string(),
        "--format=%(refname:short)".to_string(),
        "--contains".to_string(),
        hash.to_string(),
    ];
    let output = gateway.execute(&args, dir).await?;
    Ok(parse_branch_list(&output))
}

/// Compare branch `a` against branch `b`.
///
/// `behind` counts commits only reachable from `a`, `ahead` those only
/// reachable from `b`.
///
/// # Errors
///
/// Returns the gateway failure, or `PARSE_ERROR` if git's counts are
/// unreadable.
pub async fn compare_branches(
    gateway: &dyn VcsGateway,
    dir: &Path,
    a: &str,
    b: &str,
) -> Result<BranchComparison, VcsError> {
    let args = vec![
        "rev-list".to_string(),
        "--left-right".to_string(),
        "--count".to_string(),
        format!("{a}...{b}"),
        "--".to_string(),
    ];
    let output = gateway.execute(&args, dir).await?;
    parse_left_right(&output).map_err(|e| e.with_command(format!("git {}", args.join(" "))))
}

/// Memoizing git-backed oracle for a single resolution.
pub struct ResolutionScope<'a> {
    gateway: &'a dyn VcsGateway,
    dir: &'a Path,
    containing: HashMap<String, Vec<String>>,
    comparisons: HashMap<(String, String), BranchComparison>,
}

impl<'a> ResolutionScope<'a> {
    pub fn new(gateway: &'a dyn VcsGateway, dir: &'a Path) -> Self {
        Self {
            gateway,
            dir,
            containing: HashMap::new(),
            comparisons: HashMap::new(),
        }
    }

    /// Number of distinct commits queried so far.
    pub fn cached_commits(&self) -> usize {
        self.containing.len()
    }

    /// Number of distinct branch pairs compared so far.
    pub fn cached_comparisons(&self) -> usize {
        self.comparisons.len()
    }
}

#[async_trait]
impl LineageOracle for ResolutionScope<'_> {
    type Error = VcsError;

    async fn branches_containing(&mut self, hash: &str) -> Result<Vec<String>, VcsError> {
        if let Some(branches) = self.containing.get(hash) {
            return Ok(branches.clone());
        }
        let branches = branches_containing(self.gateway, self.dir, hash).await?;
        self.containing.insert(hash.to_string(), branches.clone());
        Ok(branches)
    }

    async fn compare(&mut self, a: &str, b: &str) -> Result<BranchComparison, VcsError> {
        let key = (a.to_string(), b.to_string());
        if let Some(comparison) = self.comparisons.get(&key) {
            return Ok(*comparison);
        }
        let comparison = compare_branches(self.gateway, self.dir, a, b).await?;
        self.comparisons.insert(key, comparison);
        Ok(comparison)
    }
}

/// Resolves base branches through the gateway.
pub struct BaseBranchFinder {
    gateway: Arc<dyn VcsGateway>,
    settings: LineageSettings,
}

impl BaseBranchFinder {
    pub fn new(gateway: Arc<dyn VcsGateway>) -> Self {
        Self::with_settings(gateway, LineageSettings::default())
    }

    pub fn with_settings(gateway: Arc<dyn VcsGateway>, settings: LineageSettings) -> Self {
        Self { gateway, settings }
    }

    /// The closest ancestor branch of `target`, if any.
    ///
    /// # Errors
    ///
    /// Returns the first gateway failure while reading history, containment,
    /// or comparisons.
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display(), branch = %target))]
    pub async fn find_base_branch(
        &self,
        dir: &Path,
        target: &str,
    ) -> Result<Option<BaseBranch>, VcsError> {
        let walker = CommitGraphWalker::new(Arc::clone(&self.gateway), self.settings);
        let commits = walker.fetch(dir, target).await?;

        let mut scope = ResolutionScope::new(self.gateway.as_ref(), dir);
        let result = find_base_branch_from_data(target, &commits, &mut scope).await?;

        debug!(
            commits = commits.len(),
            queried = scope.cached_commits(),
            compared = scope.cached_comparisons(),
            base = ?result,
            "base branch resolved"
        );
        Ok(result)
    }

    /// See [`branches_containing`].
    pub async fn branches_containing(
        &self,
        dir: &Path,
        hash: &str,
    ) -> Result<Vec<String>, VcsError> {
        branches_containing(self.gateway.as_ref(), dir, hash).await
    }

    /// See [`compare_branches`].
    pub async fn compare_branches(
        &self,
        dir: &Path,
        a: &str,
        b: &str,
    ) -> Result<BranchComparison, VcsError> {
        compare_branches(self.gateway.as_ref(), dir, a, b).await
    }
}
