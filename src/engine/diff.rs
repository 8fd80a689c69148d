//! engine::diff
//!
//! Structured diff between two refs.
//!
//! # Algorithm
//!
//! 1. Resolve both ref descriptors. Equal refs produce an empty result
//!    without touching git.
//! 2. The `from` side must be a revision; the working tree is only valid as
//!    the `to` side.
//! 3. For a working-tree diff, untracked files are marked intent-to-add so
//!    their content appears as additions (see [`super::staging`]).
//! 4. numstat, name-status, and the unified diff are fetched for the same
//!    ref pair, concurrently when enabled. Against the working tree rename
//!    detection is off: an untracked copy of a deleted file must diff as a
//!    full addition next to the deletion, not fold into a rename.
//! 5. The marks are reverted whatever the queries returned.
//! 6. Results are merged per path, keyed by numstat. Untracked files always
//!    report [`DiffStatus::Untracked`].

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::parse::{parse_name_status, parse_numstat, parse_untracked};
use super::staging::IntentToAdd;
use crate::core::refs::RefSpec;
use crate::core::types::{DiffResult, DiffStatus, FileDiffSummary};
use crate::git::{args, VcsError, VcsGateway};

/// Default lines of context around each hunk of the unified diff.
pub const DEFAULT_CONTEXT_LINES: u32 = 5;

/// Tuning for [`DiffComputer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSettings {
    /// Context lines in the unified diff (`-U<n>`)
    pub context_lines: u32,
    /// Issue the three diff queries concurrently
    pub concurrent_queries: bool,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            concurrent_queries: true,
        }
    }
}

/// Raw output of the three diff queries.
#[derive(Debug, Default)]
struct DiffOutputs {
    numstat: String,
    name_status: String,
    unified: String,
}

/// Computes [`DiffResult`]s through the gateway.
pub struct DiffComputer {
    gateway: Arc<dyn VcsGateway>,
    settings: DiffSettings,
}

impl DiffComputer {
    pub fn new(gateway: Arc<dyn VcsGateway>) -> Self {
        Self::with_settings(gateway, DiffSettings::default())
    }

    pub fn with_settings(gateway: Arc<dyn VcsGateway>, settings: DiffSettings) -> Self {
        Self { gateway, settings }
    }

    /// Diff two ref descriptors (`label:value`, `HEAD`, or `working`).
    ///
    /// # Panics
    ///
    /// Panics if either descriptor is malformed; see [`RefSpec::resolve`].
    ///
    /// # Errors
    ///
    /// Returns the first gateway failure.
    pub async fn compute_diff(
        &self,
        dir: &Path,
        from: &str,
        to: &str,
    ) -> Result<DiffResult, VcsError> {
        let from = RefSpec::resolve(from);
        let to = RefSpec::resolve(to);
        self.compute(dir, &from, &to).await
    }

    /// Diff two parsed refs.
    ///
    /// # Errors
    ///
    /// - `from` is the working tree
    /// - any gateway failure while listing, staging, or querying
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display(), from = %from, to = %to))]
    pub async fn compute(
        &self,
        dir: &Path,
        from: &RefSpec,
        to: &RefSpec,
    ) -> Result<DiffResult, VcsError> {
        if from.same_target(to) {
            return Ok(DiffResult::empty());
        }

        let Some(from_rev) = from.revision() else {
            return Err(VcsError::command_failed(
                "cannot diff from the working tree; the 'from' side must be a revision",
            ));
        };
        let to_rev = to.revision();

        let untracked = if to.is_working_tree() {
            self.untracked_files(dir).await?
        } else {
            Vec::new()
        };

        let staging = IntentToAdd::acquire(self.gateway.as_ref(), dir, &untracked).await?;
        let outputs = self.query(dir, from_rev, to_rev).await;
        staging.release().await;
        let outputs = outputs?;

        let result = merge_diff(
            &outputs.numstat,
            &outputs.name_status,
            outputs.unified,
            &untracked,
        );
        debug!(
            files = result.summary.total_files,
            additions = result.summary.total_additions,
            deletions = result.summary.total_deletions,
            "diff computed"
        );
        Ok(result)
    }

    /// Untracked files, one path per file (directories are expanded).
    async fn untracked_files(&self, dir: &Path) -> Result<Vec<String>, VcsError> {
        let output = self
            .gateway
            .execute(
                &args(&["status", "--porcelain", "-z", "--untracked-files=all"]),
                dir,
            )
            .await?;
        Ok(parse_untracked(&output))
    }

    async fn query(
        &self,
        dir: &Path,
        from: &str,
        to: Option<&str>,
    ) -> Result<DiffOutputs, VcsError> {
        let context = format!("-U{}", self.settings.context_lines);
        let renames = if to.is_some() { "-M" } else { "--no-renames" };
        let numstat_args = revision_args(&["diff", "--numstat", "-z", renames], from, to);
        let name_status_args = revision_args(&["diff", "--name-status", "-z", renames], from, to);
        let unified_args = revision_args(&["diff", &context, renames], from, to);
        let gateway = self.gateway.as_ref();

        if self.settings.concurrent_queries {
            let (numstat, name_status, unified) = tokio::try_join!(
                gateway.execute(&numstat_args, dir),
                gateway.execute(&name_status_args, dir),
                gateway.execute(&unified_args, dir),
            )?;
            Ok(DiffOutputs {
                numstat,
                name_status,
                unified,
            })
        } else {
            Ok(DiffOutputs {
                numstat: gateway.execute(&numstat_args, dir).await?,
                name_status: gateway.execute(&name_status_args, dir).await?,
                unified: gateway.execute(&unified_args, dir).await?,
            })
        }
    }
}

/// `<base> <from> [<to>] --`
///
/// The trailing `--` stops git from reading a revision as a path.
fn revision_args(base: &[&str], from: &str, to: Option<&str>) -> Vec<String> {
    let mut list = args(base);
    list.push(from.to_string());
    if let Some(to) = to {
        list.push(to.to_string());
    }
    list.push("--".to_string());
    list
}

/// Merge numstat and name-status output into a [`DiffResult`].
///
/// File order follows numstat. Paths missing from name-status default to
/// modified; paths in `untracked` are always reported as untracked.
pub fn merge_diff(
    numstat: &str,
    name_status: &str,
    raw_diff: String,
    untracked: &[String],
) -> DiffResult {
    let statuses = parse_name_status(name_status);
    let untracked: HashSet<&str> = untracked.iter().map(String::as_str).collect();

    let mut files: Vec<FileDiffSummary> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in parse_numstat(numstat) {
        let (status, old_path) = if untracked.contains(entry.path.as_str()) {
            (DiffStatus::Untracked, None)
        } else {
            match statuses.get(&entry.path) {
                Some(info) => (info.status, info.old_path.clone()),
                None => (DiffStatus::Modified, None),
            }
        };

        let mut summary =
            FileDiffSummary::new(entry.path.clone(), entry.additions, entry.deletions, status);
        if let Some(old) = old_path {
            summary = summary.with_old_path(old);
        }

        match positions.get(&entry.path).copied() {
            Some(i) => files[i] = summary,
            None => {
                positions.insert(entry.path, files.len());
                files.push(summary);
            }
        }
    }

    DiffResult::from_parts(raw_diff, files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::MockGateway;
    use crate::git::VcsErrorCode;

    fn computer(mock: &MockGateway) -> DiffComputer {
        DiffComputer::new(Arc::new(mock.clone()))
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    mod fast_paths {
        use super::*;

        #[tokio::test]
        async fn identical_refs_issue_no_commands() {
            let mock = MockGateway::new();
            let result = computer(&mock)
                .compute_diff(Path::new("/anywhere"), "branch:main", "branch:main")
                .await
                .unwrap();

            assert_eq!(result, DiffResult::empty());
            assert!(mock.operations().is_empty());
        }

        #[tokio::test]
        async fn working_against_working_is_empty() {
            let mock = MockGateway::new();
            let result = computer(&mock)
                .compute_diff(Path::new("/repo"), "working", "working")
                .await
                .unwrap();
            assert!(result.is_empty());
            assert_eq!(mock.call_count(), 0);
        }

        #[tokio::test]
        async fn working_tree_as_from_is_rejected() {
            let mock = MockGateway::new();
            let err = computer(&mock)
                .compute_diff(Path::new("/repo"), "working", "HEAD")
                .await
                .unwrap_err();
            assert_eq!(err.code, VcsErrorCode::CommandFailed);
            assert_eq!(mock.call_count(), 0);
        }

        #[tokio::test]
        #[should_panic(expected = "invalid ref")]
        async fn malformed_descriptor_panics() {
            let mock = MockGateway::new();
            let _ = computer(&mock)
                .compute_diff(Path::new("/repo"), "main", "HEAD")
                .await;
        }
    }

    mod between_revisions {
        use super::*;

        #[tokio::test]
        async fn merges_three_queries() {
            let mock = MockGateway::new();
            mock.respond(
                &["diff", "--numstat"],
                "4\t1\tsrc/lib.rs\x000\t0\t\x00src/old_name.rs\x00src/new_name.rs\x00-\t-\tlogo.png\x0010\t0\tdocs/guide.md\x00",
            )
            .respond(
                &["diff", "--name-status"],
                "M\x00src/lib.rs\x00R100\x00src/old_name.rs\x00src/new_name.rs\x00A\x00docs/guide.md\x00",
            )
            .respond(&["diff", "-U5"], "diff --git a/src/lib.rs b/src/lib.rs\n");

            let result = computer(&mock)
                .compute_diff(Path::new("/repo"), "branch:main", "branch:feature")
                .await
                .unwrap();

            assert_eq!(result.raw_diff, "diff --git a/src/lib.rs b/src/lib.rs\n");
            assert_eq!(
                result.files,
                vec![
                    FileDiffSummary::new("src/lib.rs", 4, 1, DiffStatus::Modified),
                    FileDiffSummary::new("src/new_name.rs", 0, 0, DiffStatus::Renamed)
                        .with_old_path("src/old_name.rs"),
                    FileDiffSummary::new("logo.png", 0, 0, DiffStatus::Modified),
                    FileDiffSummary::new("docs/guide.md", 10, 0, DiffStatus::Added),
                ]
            );
            assert_eq!(result.summary.total_files, 4);
            assert_eq!(result.summary.total_additions, 14);
            assert_eq!(result.summary.total_deletions, 1);
        }

        #[tokio::test]
        async fn passes_both_revisions_without_staging() {
            let mock = MockGateway::new();
            computer(&mock)
                .compute_diff(Path::new("/repo"), "commit:abc123", "HEAD")
                .await
                .unwrap();

            assert_eq!(
                mock.executed(),
                vec![
                    strings(&["diff", "--numstat", "-z", "-M", "abc123", "HEAD", "--"]),
                    strings(&["diff", "--name-status", "-z", "-M", "abc123", "HEAD", "--"]),
                    strings(&["diff", "-U5", "-M", "abc123", "HEAD", "--"]),
                ]
            );
        }

        #[tokio::test]
        async fn sequential_mode_issues_same_queries() {
            let mock = MockGateway::new();
            let settings = DiffSettings {
                context_lines: 3,
                concurrent_queries: false,
            };
            DiffComputer::with_settings(Arc::new(mock.clone()), settings)
                .compute_diff(Path::new("/repo"), "branch:a", "branch:b")
                .await
                .unwrap();

            assert_eq!(mock.call_count(), 3);
            assert_eq!(mock.count_matching(&["diff", "-U3"]), 1);
        }

        #[tokio::test]
        async fn query_failure_propagates() {
            let mock = MockGateway::new();
            mock.fail(
                &["diff", "--name-status"],
                VcsError::ref_not_found("unknown revision 'nope'"),
            );

            let err = computer(&mock)
                .compute_diff(Path::new("/repo"), "branch:nope", "HEAD")
                .await
                .unwrap_err();
            assert_eq!(err.code, VcsErrorCode::BranchNotFound);
        }
    }

    mod working_tree {
        use super::*;

        fn working_mock() -> MockGateway {
            let mock = MockGateway::new();
            mock.respond(
                &["status", "--porcelain"],
                " M src/lib.rs\x00?? notes.txt\x00?? drafts/todo.md\x00",
            )
            .respond(
                &["diff", "--numstat"],
                "2\t2\tsrc/lib.rs\x003\t0\tnotes.txt\x001\t0\tdrafts/todo.md\x00",
            )
            .respond(
                &["diff", "--name-status"],
                "M\x00src/lib.rs\x00A\x00notes.txt\x00A\x00drafts/todo.md\x00",
            );
            mock
        }

        #[tokio::test]
        async fn untracked_files_override_name_status() {
            let mock = working_mock();
            let result = computer(&mock)
                .compute_diff(Path::new("/repo"), "HEAD", "working")
                .await
                .unwrap();

            let status_of = |path: &str| {
                result
                    .files
                    .iter()
                    .find(|f| f.file_path == path)
                    .map(|f| f.status)
            };
            assert_eq!(status_of("src/lib.rs"), Some(DiffStatus::Modified));
            assert_eq!(status_of("notes.txt"), Some(DiffStatus::Untracked));
            assert_eq!(status_of("drafts/todo.md"), Some(DiffStatus::Untracked));
            assert_eq!(result.summary.total_additions, 6);
        }

        #[tokio::test]
        async fn staging_fences_the_queries() {
            let mock = working_mock();
            computer(&mock)
                .compute_diff(Path::new("/repo"), "HEAD", "working")
                .await
                .unwrap();

            let last_add = mock.last_position_of(&["add", "--intent-to-add"]).unwrap();
            let first_diff = mock.position_of(&["diff"]).unwrap();
            let last_diff = mock.last_position_of(&["diff"]).unwrap();
            let reset = mock.position_of(&["reset"]).unwrap();

            assert!(last_add < first_diff);
            assert!(last_diff < reset);
            assert_eq!(
                mock.executed()[last_add],
                strings(&["add", "--intent-to-add", "--", "notes.txt", "drafts/todo.md"])
            );
            assert_eq!(
                mock.executed()[reset],
                strings(&["reset", "--quiet", "--", "notes.txt", "drafts/todo.md"])
            );
        }

        #[tokio::test]
        async fn working_diff_passes_only_from_revision_without_renames() {
            let mock = working_mock();
            computer(&mock)
                .compute_diff(Path::new("/repo"), "branch:main", "working")
                .await
                .unwrap();
            let diffs: Vec<Vec<String>> = mock
                .executed()
                .into_iter()
                .filter(|a| a[0] == "diff")
                .collect();
            assert_eq!(
                diffs,
                vec![
                    strings(&["diff", "--numstat", "-z", "--no-renames", "main", "--"]),
                    strings(&["diff", "--name-status", "-z", "--no-renames", "main", "--"]),
                    strings(&["diff", "-U5", "--no-renames", "main", "--"]),
                ]
            );
        }

        #[tokio::test]
        async fn untracked_copy_of_deleted_file_keeps_both_entries() {
            let mock = MockGateway::new();
            mock.respond(&["status", "--porcelain"], " D old.txt\x00?? fresh.txt\x00")
                .respond(&["diff", "--numstat"], "0\t4\told.txt\x004\t0\tfresh.txt\x00")
                .respond(
                    &["diff", "--name-status"],
                    "D\x00old.txt\x00A\x00fresh.txt\x00",
                );

            let result = computer(&mock)
                .compute_diff(Path::new("/repo"), "HEAD", "working")
                .await
                .unwrap();

            assert_eq!(
                result.files,
                vec![
                    FileDiffSummary::new("old.txt", 0, 4, DiffStatus::Deleted),
                    FileDiffSummary::new("fresh.txt", 4, 0, DiffStatus::Untracked),
                ]
            );
            assert_eq!(result.summary.total_deletions, 4);
        }

        #[tokio::test]
        async fn paths_with_spaces_and_quotes_are_staged_verbatim() {
            let mock = MockGateway::new();
            mock.respond(
                &["status", "--porcelain"],
                "?? my notes.txt\x00?? say \"hi\".md\x00",
            )
            .respond(
                &["diff", "--numstat"],
                "1\t0\tmy notes.txt\x002\t0\tsay \"hi\".md\x00",
            );

            let result = computer(&mock)
                .compute_diff(Path::new("/repo"), "HEAD", "working")
                .await
                .unwrap();

            assert_eq!(
                mock.count_matching(&["add", "--intent-to-add", "--", "my notes.txt", "say \"hi\".md"]),
                1
            );
            assert!(result
                .files
                .iter()
                .all(|f| f.status == DiffStatus::Untracked));
            assert_eq!(result.summary.total_additions, 3);
        }

        #[tokio::test]
        async fn release_runs_when_a_query_fails() {
            let mock = MockGateway::new();
            mock.respond(&["status", "--porcelain"], "?? scratch.rs\x00")
                .fail(&["diff", "-U5"], VcsError::command_failed("killed"));

            let err = computer(&mock)
                .compute_diff(Path::new("/repo"), "HEAD", "working")
                .await
                .unwrap_err();

            assert_eq!(err.message, "killed");
            assert_eq!(mock.count_matching(&["reset", "--quiet", "--", "scratch.rs"]), 1);
        }

        #[tokio::test]
        async fn release_failure_does_not_replace_result() {
            let mock = working_mock();
            mock.fail(&["reset"], VcsError::command_failed("reset failed"));

            let result = computer(&mock)
                .compute_diff(Path::new("/repo"), "HEAD", "working")
                .await
                .unwrap();
            assert_eq!(result.files.len(), 3);
        }

        #[tokio::test]
        async fn untracked_listing_failure_stops_before_staging() {
            let mock = MockGateway::new();
            mock.fail(&["status"], VcsError::not_a_repository("not a git repository"));

            let err = computer(&mock)
                .compute_diff(Path::new("/tmp"), "HEAD", "working")
                .await
                .unwrap_err();

            assert_eq!(err.code, VcsErrorCode::NotARepository);
            assert_eq!(mock.call_count(), 1);
        }

        #[tokio::test]
        async fn clean_tree_skips_staging() {
            let mock = MockGateway::new();
            computer(&mock)
                .compute_diff(Path::new("/repo"), "HEAD", "working")
                .await
                .unwrap();
            assert_eq!(mock.count_matching(&["add"]), 0);
            assert_eq!(mock.count_matching(&["reset"]), 0);
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn pure_rename_has_zero_counts() {
            let result = merge_diff(
                "0\t0\t\x00old.rs\x00new.rs\x00",
                "R100\x00old.rs\x00new.rs\x00",
                String::new(),
                &[],
            );
            assert_eq!(
                result.files,
                vec![FileDiffSummary::new("new.rs", 0, 0, DiffStatus::Renamed)
                    .with_old_path("old.rs")]
            );
        }

        #[test]
        fn rename_numstat_keys_on_new_path() {
            let result = merge_diff(
                "3\t1\t\x00src/a.rs\x00src/b.rs\x00",
                "R090\x00src/a.rs\x00src/b.rs\x00",
                String::new(),
                &[],
            );
            assert_eq!(result.files[0].file_path, "src/b.rs");
            assert_eq!(result.files[0].status, DiffStatus::Renamed);
        }

        #[test]
        fn missing_name_status_defaults_to_modified() {
            let result = merge_diff("1\t1\torphan.rs\x00", "", String::new(), &[]);
            assert_eq!(result.files[0].status, DiffStatus::Modified);
            assert_eq!(result.files[0].old_file_path, None);
        }

        #[test]
        fn untracked_wins_over_added() {
            let result = merge_diff(
                "5\t0\tnew.txt\x00",
                "A\x00new.txt\x00",
                String::new(),
                &strings(&["new.txt"]),
            );
            assert_eq!(result.files[0].status, DiffStatus::Untracked);
        }

        #[test]
        fn name_status_only_paths_are_ignored() {
            let result = merge_diff(
                "1\t0\ta.rs\x00",
                "M\x00a.rs\x00D\x00b.rs\x00",
                String::new(),
                &[],
            );
            assert_eq!(result.files.len(), 1);
        }

        #[test]
        fn raw_diff_kept_verbatim() {
            let raw = "diff --git a/x b/x\n@@ -1 +1 @@\n-a\n+b\n".to_string();
            let result = merge_diff("1\t1\tx\x00", "M\x00x\x00", raw.clone(), &[]);
            assert_eq!(result.raw_diff, raw);
        }
    }
}
