//! git::cli
//!
//! Gateway backed by the `git` binary.
//!
//! Commands run through `tokio::process` so independent reads can be awaited
//! concurrently. Repository detection uses `git2` discovery, which avoids a
//! process spawn for the common "is this a repo?" check.
//!
//! Failures are classified from git's stderr into [`VcsErrorCode`]s.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::gateway::{VcsError, VcsErrorCode, VcsGateway};

/// Executable used when none is configured.
pub const DEFAULT_GIT_BINARY: &str = "git";

/// Options prepended to every invocation.
///
/// Unquoted paths keep non-ASCII file names readable in parsed output, and
/// color codes would corrupt the unified diff text.
const GLOBAL_OPTIONS: [&str; 4] = ["-c", "core.quotepath=false", "-c", "color.ui=never"];

/// Stderr fragments git prints for unknown revisions.
const UNKNOWN_REVISION_MARKERS: [&str; 5] = [
    "unknown revision",
    "bad revision",
    "ambiguous argument",
    "not a valid object name",
    "malformed object name",
];

/// Gateway that spawns the git binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_GIT_BINARY)
    }

    /// Use a specific git executable.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The executable this gateway spawns.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn render(&self, args: &[String]) -> String {
        let mut command = self.binary.clone();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

#[async_trait]
impl VcsGateway for GitCli {
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    async fn execute(&self, args: &[String], dir: &Path) -> Result<String, VcsError> {
        let command = self.render(args);

        if !dir.is_dir() {
            return Err(VcsError::not_a_repository(format!(
                "directory does not exist: {}",
                dir.display()
            ))
            .with_command(command));
        }

        debug!(%command, "running git");
        let output = Command::new(&self.binary)
            .args(GLOBAL_OPTIONS)
            .args(args)
            .current_dir(dir)
            .env("GIT_OPTIONAL_LOCKS", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                VcsError::command_failed(format!("failed to spawn {}: {}", self.binary, e))
                    .with_command(command.clone())
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(%command, status = ?output.status.code(), %stderr, "git failed");
            return Err(classify_failure(command, stderr, output.status.code()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn is_repository(&self, dir: &Path) -> bool {
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || match git2::Repository::discover(&dir) {
            Ok(repo) => !repo.is_bare(),
            Err(_) => false,
        })
        .await
        .unwrap_or(false)
    }
}

/// Map a failed invocation to a typed error using git's stderr.
fn classify_failure(command: String, stderr: String, status: Option<i32>) -> VcsError {
    let lowered = stderr.to_lowercase();
    let code = if lowered.contains("not a git repository") {
        VcsErrorCode::NotARepository
    } else if UNKNOWN_REVISION_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        VcsErrorCode::BranchNotFound
    } else {
        VcsErrorCode::CommandFailed
    };

    let message = match (stderr.lines().next(), status) {
        (Some(first), _) if !first.is_empty() => first.to_string(),
        (_, Some(code)) => format!("exited with status {code}"),
        _ => "terminated by signal".to_string(),
    };

    VcsError::new(code, message)
        .with_command(command)
        .with_stderr(stderr)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod classify {
        use super::*;

        #[test]
        fn not_a_repository() {
            let err = classify_failure(
                "git status".into(),
                "fatal: not a git repository (or any of the parent directories): .git".into(),
                Some(128),
            );
            assert_eq!(err.code, VcsErrorCode::NotARepository);
            assert_eq!(err.command.as_deref(), Some("git status"));
        }

        #[test]
        fn unknown_revision() {
            let err = classify_failure(
                "git diff nope".into(),
                "fatal: ambiguous argument 'nope': unknown revision or path not in the working tree."
                    .into(),
                Some(128),
            );
            assert_eq!(err.code, VcsErrorCode::BranchNotFound);
            assert!(err.message.starts_with("fatal: ambiguous argument"));
        }

        #[test]
        fn malformed_object_name() {
            let err = classify_failure(
                "git branch --contains zzz".into(),
                "error: malformed object name zzz".into(),
                Some(129),
            );
            assert_eq!(err.code, VcsErrorCode::BranchNotFound);
        }

        #[test]
        fn other_failures() {
            let err = classify_failure(
                "git add".into(),
                "fatal: Unable to create '.git/index.lock': File exists.".into(),
                Some(128),
            );
            assert_eq!(err.code, VcsErrorCode::CommandFailed);
        }

        #[test]
        fn empty_stderr_uses_exit_status() {
            let err = classify_failure("git diff".into(), String::new(), Some(1));
            assert_eq!(err.code, VcsErrorCode::CommandFailed);
            assert_eq!(err.message, "exited with status 1");
            assert_eq!(err.stderr, None);
        }
    }

    #[test]
    fn render_joins_args() {
        let git = GitCli::with_binary("/usr/bin/git");
        assert_eq!(
            git.render(&["diff".to_string(), "--numstat".to_string()]),
            "/usr/bin/git diff --numstat"
        );
    }

    #[tokio::test]
    async fn missing_directory_is_not_a_repository() {
        let git = GitCli::new();
        let err = git
            .execute(
                &["status".to_string()],
                Path::new("/definitely/not/a/real/dir"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, VcsErrorCode::NotARepository);
    }

    #[tokio::test]
    async fn temp_dir_is_not_a_repository() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!GitCli::new().is_repository(dir.path()).await);
    }
}
