//! engine::staging
//!
//! Transient intent-to-add staging of untracked files.
//!
//! # Design
//!
//! `git diff <rev>` ignores untracked files. Marking them with
//! `git add --intent-to-add` makes their full content show up as additions
//! without staging any content. The mark must never outlive the diff, so it
//! is modeled as a scoped resource:
//!
//! 1. [`IntentToAdd::acquire`] marks the paths; on a partial failure it
//!    reverts what it already marked before returning the error.
//! 2. The caller runs its queries.
//! 3. [`IntentToAdd::release`] reverts the marks with `git reset`. Failure is
//!    logged and swallowed so it never masks the caller's own outcome.
//!
//! Paths go to git in batches bounded by [`BATCH_BYTES`], so a large
//! untracked set never overflows the command line.
//!
//! Dropping an acquired value without releasing it cannot revert anything
//! (reverting is async); it logs a warning instead.

use std::path::Path;

use tracing::{debug, warn};

use crate::git::{args, VcsError, VcsGateway};

/// Most path bytes handed to a single `add` or `reset` command.
pub const BATCH_BYTES: usize = 32 * 1024;

/// Untracked paths currently marked intent-to-add.
#[must_use = "intent-to-add marks must be released"]
pub struct IntentToAdd<'a> {
    gateway: &'a dyn VcsGateway,
    dir: &'a Path,
    paths: Vec<String>,
}

impl<'a> IntentToAdd<'a> {
    /// Mark each of `paths` intent-to-add.
    ///
    /// # Errors
    ///
    /// Returns the first gateway failure, after reverting the batches marked
    /// so far.
    pub async fn acquire(
        gateway: &'a dyn VcsGateway,
        dir: &'a Path,
        paths: &[String],
    ) -> Result<IntentToAdd<'a>, VcsError> {
        let mut staging = IntentToAdd {
            gateway,
            dir,
            paths: Vec::with_capacity(paths.len()),
        };

        for batch in batches(paths, BATCH_BYTES) {
            let mut add = args(&["add", "--intent-to-add", "--"]);
            add.extend(batch.iter().cloned());
            if let Err(err) = gateway.execute(&add, dir).await {
                staging.release().await;
                return Err(err);
            }
            staging.paths.extend(batch.iter().cloned());
        }

        if !staging.paths.is_empty() {
            debug!(count = staging.paths.len(), "marked untracked files intent-to-add");
        }
        Ok(staging)
    }

    /// Paths currently marked.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Revert every mark. Never fails; problems are logged.
    pub async fn release(mut self) {
        let paths = std::mem::take(&mut self.paths);
        if paths.is_empty() {
            return;
        }

        let mut failed = 0;
        for batch in batches(&paths, BATCH_BYTES) {
            let mut reset = args(&["reset", "--quiet", "--"]);
            reset.extend(batch.iter().cloned());
            if let Err(err) = self.gateway.execute(&reset, self.dir).await {
                failed += batch.len();
                warn!(
                    error = %err,
                    count = batch.len(),
                    dir = %self.dir.display(),
                    "failed to revert intent-to-add; untracked files may remain in the index"
                );
            }
        }

        if failed == 0 {
            debug!(count = paths.len(), "reverted intent-to-add marks");
        }
    }
}

impl Drop for IntentToAdd<'_> {
    fn drop(&mut self) {
        if !self.paths.is_empty() {
            warn!(
                count = self.paths.len(),
                dir = %self.dir.display(),
                "intent-to-add marks dropped without release"
            );
        }
    }
}

/// Split `paths` into runs whose bytes (one separator each) stay within
/// `budget`. A single path longer than `budget` gets a run of its own.
fn batches(paths: &[String], budget: usize) -> Vec<&[String]> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut size = 0;

    for (i, path) in paths.iter().enumerate() {
        let len = path.len() + 1;
        if i > start && size + len > budget {
            runs.push(&paths[start..i]);
            start = i;
            size = 0;
        }
        size += len;
    }
    if start < paths.len() {
        runs.push(&paths[start..]);
    }

    runs
}
