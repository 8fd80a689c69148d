//! core
//!
//! Core value types and configuration for forkpoint.
//!
//! # Modules
//!
//! - [`types`] - Diff, status, and lineage result types
//! - [`refs`] - Ref descriptor parsing
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Results are plain values that serialize directly to the JSON shapes UI
//!   callers expect
//! - Malformed input is rejected at the boundary

pub mod config;
pub mod refs;
pub mod types;
