//! engine::walker
//!
//! Bounded, paginated commit history retrieval.
//!
//! History is read newest-first in fixed-size pages so that resolving a base
//! branch on a deep repository costs at most `max_commits` commits.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::parse::parse_commit_lines;
use crate::core::types::CommitNode;
use crate::git::{VcsError, VcsGateway};

/// Default commits fetched per page.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Default cap on commits examined per resolution.
pub const DEFAULT_MAX_COMMITS: usize = 100;

/// Pagination bounds for history walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineageSettings {
    /// Commits per page
    pub batch_size: usize,
    /// Hard cap on commits returned
    pub max_commits: usize,
}

impl Default for LineageSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_commits: DEFAULT_MAX_COMMITS,
        }
    }
}

/// Reads `(commit, first parent)` pairs reachable from a branch.
pub struct CommitGraphWalker {
    gateway: Arc<dyn VcsGateway>,
    settings: LineageSettings,
}

impl CommitGraphWalker {
    pub fn new(gateway: Arc<dyn VcsGateway>, settings: LineageSettings) -> Self {
        Self { gateway, settings }
    }

    /// Commits reachable from `branch`, newest first, at most `max_commits`.
    ///
    /// # Errors
    ///
    /// Returns the first gateway failure; no partial history is returned.
    pub async fn fetch(&self, dir: &Path, branch: &str) -> Result<Vec<CommitNode>, VcsError> {
        let batch = self.settings.batch_size.max(1);
        let cap = self.settings.max_commits;
        let mut commits: Vec<CommitNode> = Vec::new();

        while commits.len() < cap {
            let page = self.page(dir, branch, commits.len(), batch).await?;
            let short = page.len() < batch;
            commits.extend(page);
            if short {
                break;
            }
        }

        commits.truncate(cap);
        debug!(branch, count = commits.len(), "fetched commit window");
        Ok(commits)
    }

    async fn page(
        &self,
        dir: &Path,
        branch: &str,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<CommitNode>, VcsError> {
        let args = vec![
            "log".to_string(),
            "--format=%H %P".to_string(),
            format!("--skip={skip}"),
            "-n".to_string(),
            limit.to_string(),
            branch.to_string(),
            "--".to_string(),
        ];
        let output = self.gateway.execute(&args, dir).await?;
        Ok(parse_commit_lines(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockGateway;
    use crate::git::VcsErrorCode;

    fn page_output(range: std::ops::Range<usize>) -> String {
        range
            .map(|i| format!("c{} c{}\n", i, i + 1))
            .collect::<String>()
    }

    fn walker(mock: &MockGateway, batch_size: usize, max_commits: usize) -> CommitGraphWalker {
        CommitGraphWalker::new(
            Arc::new(mock.clone()),
            LineageSettings {
                batch_size,
                max_commits,
            },
        )
    }

    #[tokio::test]
    async fn stops_on_short_page() {
        let mock = MockGateway::new();
        mock.respond(&["log", "--format=%H %P", "--skip=0"], &page_output(0..3));

        let commits = walker(&mock, 20, 100)
            .fetch(Path::new("/repo"), "feature")
            .await
            .unwrap();

        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0], CommitNode::new("c0", Some("c1".into())));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn pages_until_exhausted() {
        let mock = MockGateway::new();
        mock.respond(&["log", "--format=%H %P", "--skip=0"], &page_output(0..2))
            .respond(&["log", "--format=%H %P", "--skip=2"], &page_output(2..4))
            .respond(&["log", "--format=%H %P", "--skip=4"], "");

        let commits = walker(&mock, 2, 100)
            .fetch(Path::new("/repo"), "feature")
            .await
            .unwrap();

        let hashes: Vec<&str> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["c0", "c1", "c2", "c3"]);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn respects_the_cap() {
        let mock = MockGateway::new();
        for skip in (0..100).step_by(20) {
            let prefix = format!("--skip={skip}");
            mock.respond(
                &["log", "--format=%H %P", prefix.as_str()],
                &page_output(skip..skip + 20),
            );
        }

        let commits = walker(&mock, 20, 50)
            .fetch(Path::new("/repo"), "main")
            .await
            .unwrap();

        assert_eq!(commits.len(), 50);
        assert_eq!(commits.last().unwrap().hash, "c49");
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn passes_branch_and_page_bounds() {
        let mock = MockGateway::new();
        walker(&mock, 20, 100)
            .fetch(Path::new("/repo"), "feature/x")
            .await
            .unwrap();

        assert_eq!(
            mock.executed()[0],
            vec!["log", "--format=%H %P", "--skip=0", "-n", "20", "feature/x", "--"]
        );
    }

    #[tokio::test]
    async fn failure_aborts_the_walk() {
        let mock = MockGateway::new();
        mock.respond(&["log", "--format=%H %P", "--skip=0"], &page_output(0..2))
            .fail(
                &["log", "--format=%H %P", "--skip=2"],
                VcsError::command_failed("interrupted"),
            );

        let err = walker(&mock, 2, 100)
            .fetch(Path::new("/repo"), "main")
            .await
            .unwrap_err();
        assert_eq!(err.code, VcsErrorCode::CommandFailed);
    }

    #[tokio::test]
    async fn unknown_branch_propagates() {
        let mock = MockGateway::new();
        mock.fail(&["log"], VcsError::ref_not_found("unknown revision 'ghost'"));

        let err = walker(&mock, 20, 100)
            .fetch(Path::new("/repo"), "ghost")
            .await
            .unwrap_err();
        assert_eq!(err.code, VcsErrorCode::BranchNotFound);
    }
}
