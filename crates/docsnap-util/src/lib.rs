//! Shared utilities for docsnap.
//!
//! This crate provides the small pieces every other docsnap crate leans on:
//! - Logging setup with tracing
//! - Per-user data and config locations
//! - Snapshot identifier generation
//! - RAII-based timing for diff and copy operations

pub mod id;
pub mod log;
pub mod path;
pub mod timing;

pub use id::SnapshotIdGen;
pub use timing::TimingGuard;
