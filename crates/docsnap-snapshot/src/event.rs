//! Notifications about snapshot changes.

use crate::snapshot::SnapshotMetadata;

/// Emitted after a snapshot is created or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEvent {
    Created(SnapshotMetadata),
    Deleted(SnapshotMetadata),
}
