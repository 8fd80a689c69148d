//! git::mock
//!
//! Scripted gateway for deterministic testing.
//!
//! # Design
//!
//! Responses are registered against argument prefixes. A call is answered by
//! the first rule (in registration order) whose prefix matches the start of
//! its arguments; unmatched calls succeed with empty output. Every call is
//! recorded so tests can assert on exactly which commands ran, and in what
//! order.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use forkpoint::git::mock::MockGateway;
//! use forkpoint::git::{args, VcsGateway};
//!
//! # tokio_test::block_on(async {
//! let gateway = MockGateway::new();
//! gateway.respond(&["rev-parse", "HEAD"], "abc123\n");
//!
//! let out = gateway
//!     .execute(&args(&["rev-parse", "HEAD"]), Path::new("/repo"))
//!     .await
//!     .unwrap();
//! assert_eq!(out, "abc123\n");
//! assert_eq!(gateway.call_count(), 1);
//! # });
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::gateway::{VcsError, VcsGateway};

/// Mock gateway for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockGateway {
    inner: Arc<Mutex<MockGatewayInner>>,
}

#[derive(Debug)]
struct MockGatewayInner {
    /// Answer for `is_repository`.
    is_repo: bool,
    /// Scripted answers, matched by argument prefix.
    rules: Vec<Rule>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

#[derive(Debug, Clone)]
struct Rule {
    prefix: Vec<String>,
    outcome: Result<String, VcsError>,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Execute { args: Vec<String>, dir: PathBuf },
    IsRepository { dir: PathBuf },
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// Create a mock that reports every directory as a repository.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockGatewayInner {
                is_repo: true,
                rules: Vec::new(),
                operations: Vec::new(),
            })),
        }
    }

    /// Create a mock that reports every directory as not a repository.
    pub fn not_a_repository() -> Self {
        let mock = Self::new();
        mock.lock().is_repo = false;
        mock
    }

    fn lock(&self) -> MutexGuard<'_, MockGatewayInner> {
        // A panicking test thread must not hide the recorded calls.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Answer calls starting with `prefix` with `stdout`.
    pub fn respond(&self, prefix: &[&str], stdout: &str) -> &Self {
        self.push_rule(prefix, Ok(stdout.to_string()));
        self
    }

    /// Fail calls starting with `prefix` with `error`.
    pub fn fail(&self, prefix: &[&str], error: VcsError) -> &Self {
        self.push_rule(prefix, Err(error));
        self
    }

    fn push_rule(&self, prefix: &[&str], outcome: Result<String, VcsError>) {
        self.lock().rules.push(Rule {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            outcome,
        });
    }

    /// All recorded operations in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Argument lists of all `execute` calls in call order.
    pub fn executed(&self) -> Vec<Vec<String>> {
        self.lock()
            .operations
            .iter()
            .filter_map(|op| match op {
                MockOperation::Execute { args, .. } => Some(args.clone()),
                MockOperation::IsRepository { .. } => None,
            })
            .collect()
    }

    /// Number of `execute` calls.
    pub fn call_count(&self) -> usize {
        self.executed().len()
    }

    /// Number of `execute` calls whose arguments start with `prefix`.
    pub fn count_matching(&self, prefix: &[&str]) -> usize {
        self.executed()
            .iter()
            .filter(|args| starts_with(args, prefix))
            .count()
    }

    /// Index of the first `execute` call starting with `prefix`.
    pub fn position_of(&self, prefix: &[&str]) -> Option<usize> {
        self.executed()
            .iter()
            .position(|args| starts_with(args, prefix))
    }

    /// Index of the last `execute` call starting with `prefix`.
    pub fn last_position_of(&self, prefix: &[&str]) -> Option<usize> {
        self.executed()
            .iter()
            .rposition(|args| starts_with(args, prefix))
    }

    /// Forget recorded operations, keeping the scripted rules.
    pub fn clear_operations(&self) {
        self.lock().operations.clear();
    }
}

fn starts_with<S: AsRef<str>>(args: &[String], prefix: &[S]) -> bool {
    args.len() >= prefix.len()
        && args
            .iter()
            .zip(prefix)
            .all(|(arg, expected)| arg == expected.as_ref())
}

#[async_trait]
impl VcsGateway for MockGateway {
    async fn execute(&self, args: &[String], dir: &Path) -> Result<String, VcsError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::Execute {
            args: args.to_vec(),
            dir: dir.to_path_buf(),
        });
        inner
            .rules
            .iter()
            .find(|rule| starts_with(args, &rule.prefix[..]))
            .map(|rule| rule.outcome.clone())
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn is_repository(&self, dir: &Path) -> bool {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::IsRepository {
            dir: dir.to_path_buf(),
        });
        inner.is_repo
    }
}
