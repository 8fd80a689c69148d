//! engine::status
//!
//! Working tree status as a path → status map.
//!
//! Status display is best-effort: a directory outside git reports
//! `is_git_repo: false` without running anything, and a failed status
//! command degrades to an empty map instead of an error.

use std::path::Path;
use std::sync::Arc;

use tracing::{instrument, warn};

use super::parse::{parse_status_record, status_records};
use crate::core::types::{FileStatusMap, RepoStatus};
use crate::git::{args, VcsError, VcsGateway};

/// Reads porcelain status through the gateway.
pub struct StatusReader {
    gateway: Arc<dyn VcsGateway>,
}

impl StatusReader {
    pub fn new(gateway: Arc<dyn VcsGateway>) -> Self {
        Self { gateway }
    }

    /// Status of every changed path under `dir`.
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    pub async fn status(&self, dir: &Path) -> RepoStatus {
        if !self.gateway.is_repository(dir).await {
            return RepoStatus::not_a_repo();
        }

        match self.porcelain(dir).await {
            Ok(output) => RepoStatus {
                is_git_repo: true,
                files: parse_status(&output),
            },
            Err(err) => {
                warn!(error = %err, "git status failed; reporting no changes");
                RepoStatus::unknown()
            }
        }
    }

    async fn porcelain(&self, dir: &Path) -> Result<String, VcsError> {
        self.gateway
            .execute(&args(&["status", "--porcelain", "-z"]), dir)
            .await
    }
}

/// Build the status map from `status --porcelain -z` output.
///
/// Records this layer does not report (conflicts, ignored files) are dropped.
pub fn parse_status(output: &str) -> FileStatusMap {
    status_records(output)
        .into_iter()
        .filter_map(parse_status_record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FileStatus;
    use crate::git::mock::MockGateway;

    fn reader(mock: &MockGateway) -> StatusReader {
        StatusReader::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn non_repository_runs_no_commands() {
        let mock = MockGateway::not_a_repository();
        let status = reader(&mock).status(Path::new("/not/a/repo")).await;

        assert_eq!(status, RepoStatus::not_a_repo());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn parses_porcelain_output() {
        let mock = MockGateway::new();
        mock.respond(
            &["status", "--porcelain"],
            " M src/lib.rs\0A  src/new.rs\0?? my notes.txt\0R  renamed.rs\0old.rs\0UU conflict.rs\0",
        );

        let status = reader(&mock).status(Path::new("/repo")).await;

        assert!(status.is_git_repo);
        assert_eq!(status.files.len(), 4);
        assert_eq!(status.files["src/lib.rs"], FileStatus::Modified);
        assert_eq!(status.files["src/new.rs"], FileStatus::Added);
        assert_eq!(status.files["my notes.txt"], FileStatus::Untracked);
        assert_eq!(status.files["renamed.rs"], FileStatus::Renamed);
        assert!(!status.files.contains_key("old.rs"));
    }

    #[tokio::test]
    async fn command_failure_degrades_to_empty() {
        let mock = MockGateway::new();
        mock.fail(
            &["status"],
            VcsError::command_failed("index.lock exists"),
        );

        let status = reader(&mock).status(Path::new("/repo")).await;

        assert_eq!(status, RepoStatus::unknown());
        assert_eq!(mock.count_matching(&["status", "--porcelain", "-z"]), 1);
    }

    #[test]
    fn staged_addition_with_worktree_edit_is_added() {
        let files = parse_status("AM path\0");
        assert_eq!(files["path"], FileStatus::Added);
    }
}
