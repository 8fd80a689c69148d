//! git
//!
//! Single doorway for all Git access.
//!
//! # Architecture
//!
//! The engine never spawns processes or opens repositories itself. Every
//! read goes through the [`VcsGateway`] trait, which executes one git
//! subcommand against a working directory and returns its captured stdout or
//! a typed [`VcsError`].
//!
//! Components receive the gateway through their constructors as an
//! `Arc<dyn VcsGateway>`; there is no process-wide instance.
//!
//! # Implementations
//!
//! - [`GitCli`] - runs the `git` binary via `tokio::process`
//! - [`mock::MockGateway`] - scripted responses and recorded calls for tests
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use forkpoint::git::{GitCli, VcsGateway};
//!
//! let gateway: Arc<dyn VcsGateway> = Arc::new(GitCli::new());
//! let head = gateway.execute(&["rev-parse".into(), "HEAD".into()], Path::new(".")).await?;
//! ```

mod cli;
mod gateway;
pub mod mock;

pub use cli::{GitCli, DEFAULT_GIT_BINARY};
pub use gateway::{args, VcsError, VcsErrorCode, VcsGateway};
