//! core::refs
//!
//! Ref descriptor parsing.
//!
//! # Format
//!
//! Callers describe each side of a diff with one of:
//! - `"<label>:<value>"` - a concrete revision; the label (`branch`, `commit`,
//!   `tag`, ...) is a UI hint and is discarded
//! - `"HEAD"` - the checked-out commit
//! - `"working"` - the uncommitted working tree
//!
//! Any other bare token is a caller bug. [`RefSpec::parse`] reports it as an
//! [`InvalidRefError`] for input boundaries such as CLI arguments, while
//! [`RefSpec::resolve`] panics, for call sites that receive descriptors
//! produced by trusted code.
//!
//! # Example
//!
//! ```
//! use forkpoint::core::refs::RefSpec;
//!
//! assert_eq!(RefSpec::resolve("branch:main").revision(), Some("main"));
//! assert_eq!(RefSpec::resolve("HEAD").revision(), Some("HEAD"));
//! assert_eq!(RefSpec::resolve("working"), RefSpec::WorkingTree);
//! assert!(RefSpec::parse("main").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The literal name of the checked-out commit.
pub const HEAD: &str = "HEAD";

/// The bare descriptor for the working tree.
pub const WORKING: &str = "working";

/// A ref descriptor that is neither `label:value`, `HEAD`, nor `working`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ref: {0:?} (expected \"<label>:<value>\", \"HEAD\", or \"working\")")]
pub struct InvalidRefError(pub String);

/// One side of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RefSpec {
    /// A concrete revision (branch, tag, or commit hash)
    Revision(String),
    /// The checked-out commit
    Head,
    /// The uncommitted working tree
    WorkingTree,
}

impl RefSpec {
    /// Parse a ref descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRefError`] for a bare token other than `HEAD` or
    /// `working`.
    pub fn parse(text: &str) -> Result<Self, InvalidRefError> {
        if let Some((_label, value)) = text.split_once(':') {
            return Ok(RefSpec::Revision(value.to_string()));
        }
        match text {
            HEAD => Ok(RefSpec::Head),
            WORKING => Ok(RefSpec::WorkingTree),
            _ => Err(InvalidRefError(text.to_string())),
        }
    }

    /// Parse a ref descriptor that is known to be well formed.
    ///
    /// # Panics
    ///
    /// Panics if `text` is malformed. A malformed descriptor here means the
    /// caller built it incorrectly; validate untrusted input with
    /// [`RefSpec::parse`] instead.
    #[track_caller]
    pub fn resolve(text: &str) -> Self {
        match Self::parse(text) {
            Ok(spec) => spec,
            Err(err) => panic!("{err}"),
        }
    }

    /// The concrete revision, or `None` for the working tree.
    pub fn revision(&self) -> Option<&str> {
        match self {
            RefSpec::Revision(value) => Some(value),
            RefSpec::Head => Some(HEAD),
            RefSpec::WorkingTree => None,
        }
    }

    /// Whether this is the working-tree sentinel.
    pub fn is_working_tree(&self) -> bool {
        matches!(self, RefSpec::WorkingTree)
    }

    /// Whether both refs resolve to the same value.
    ///
    /// `branch:HEAD` and `HEAD` are the same target.
    pub fn same_target(&self, other: &RefSpec) -> bool {
        self.revision() == other.revision()
    }
}

impl FromStr for RefSpec {
    type Err = InvalidRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RefSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefSpec::Revision(value) => f.write_str(value),
            RefSpec::Head => f.write_str(HEAD),
            RefSpec::WorkingTree => f.write_str(WORKING),
        }
    }
}
