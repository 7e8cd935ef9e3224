//! Document snapshots for docsnap.
//!
//! This crate keeps immutable copies of documents and lets you:
//! - Capture a document with a remark
//! - List and delete captured versions
//! - Restore a version, with a persisted undo stack
//! - Compare versions with each other or with the live file
//! - Three-way merge a version into the working file
//!
//! # Example
//!
//! ```no_run
//! use docsnap_diff::{DiffConfig, DiffEngine, ExtractorRegistry};
//! use docsnap_snapshot::{SnapshotConfig, SnapshotStore};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(DiffEngine::new(
//!     Arc::new(ExtractorRegistry::with_defaults()),
//!     DiffConfig::default(),
//! ));
//! let store = SnapshotStore::open("/var/lib/docsnap", engine, SnapshotConfig::default()).await?;
//!
//! let before = store.create_snapshot(Path::new("report.md"), "Before review").await?;
//!
//! // ... edit report.md ...
//!
//! println!("{}", store.compare_with_live(&before).await.raw);
//! store.restore_snapshot(&before).await?;
//! store.undo_restore().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod event;
mod merge;
mod repository;
mod snapshot;
mod store;
mod undo;

pub use error::{SnapshotError, SnapshotResult};
pub use event::SnapshotEvent;
pub use merge::{plan_merge, MergeOutcome};
pub use repository::{VersionIndex, VersionRepository};
pub use snapshot::{content_hash, SnapshotMetadata};
pub use store::{SnapshotConfig, SnapshotStore};
pub use undo::{UndoEntry, UndoStack};
