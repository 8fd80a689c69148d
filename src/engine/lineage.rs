//! engine::lineage
//!
//! Closest-ancestor ("base") branch inference over commit data.
//!
//! # Algorithm
//!
//! Walk the target branch's commits from newest to oldest. At the first
//! commit that the target shares with some other branch, ask whether that
//! branch is an ancestor: `compare(target, candidate).behind > 0` means the
//! target has commits the candidate lacks. The first qualifying candidate
//! wins. Whether the candidate has also moved on since the fork (`ahead > 0`)
//! does not matter, so diverged branches still resolve.
//!
//! Walking newest-first yields the *closest* ancestor rather than the branch
//! at the root of history.
//!
//! # Ties
//!
//! When several candidates qualify at the same commit, the first one in the
//! oracle's order wins. The git-backed oracle lists branches in git's sorted
//! order, which makes the choice deterministic for a given repository.
//!
//! The function performs no I/O of its own; everything it learns comes from
//! the [`LineageOracle`].

use std::collections::HashSet;

use async_trait::async_trait;

use crate::core::types::{BaseBranch, BranchComparison, CommitNode};

/// Source of branch containment and comparison facts.
#[async_trait]
pub trait LineageOracle: Send {
    type Error: Send;

    /// Names of the branches whose history contains `hash`.
    async fn branches_containing(&mut self, hash: &str) -> Result<Vec<String>, Self::Error>;

    /// Compare branch `a` against branch `b`.
    ///
    /// `behind` counts commits only in `a`; `ahead` counts commits only in `b`.
    async fn compare(&mut self, a: &str, b: &str) -> Result<BranchComparison, Self::Error>;
}

/// Find the closest ancestor branch of `target`.
///
/// `commits` must be ordered newest first.
///
/// # Errors
///
/// Returns the first oracle error unchanged; no partial result is produced.
pub async fn find_base_branch_from_data<O>(
    target: &str,
    commits: &[CommitNode],
    oracle: &mut O,
) -> Result<Option<BaseBranch>, O::Error>
where
    O: LineageOracle + ?Sized,
{
    for commit in commits {
        let branches = oracle.branches_containing(&commit.hash).await?;
        if !branches.iter().any(|b| b == target) {
            continue;
        }

        let mut seen = HashSet::new();
        let others: Vec<&String> = branches
            .iter()
            .filter(|b| b.as_str() != target && seen.insert(b.as_str()))
            .collect();

        for candidate in others {
            let comparison = oracle.compare(target, candidate).await?;
            if comparison.behind > 0 {
                return Ok(Some(BaseBranch::new(candidate.as_str(), commit.hash.as_str())));
            }
        }
    }

    Ok(None)
}
