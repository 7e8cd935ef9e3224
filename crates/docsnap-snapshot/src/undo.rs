//! Persisted stack of reversible restores.

use crate::snapshot::SnapshotMetadata;
use crate::SnapshotResult;
use docsnap_storage::Storage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

const UNDO_KEY: &[&str] = &["undo"];

/// One restore that can be reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoEntry {
    pub document_name: String,

    /// Snapshot of the working file taken just before the restore.
    pub backup: SnapshotMetadata,

    /// Snapshot marking the restored state.
    pub restore: SnapshotMetadata,
}

/// LIFO stack of [`UndoEntry`], stored next to the version index.
///
/// Like the version index, each change starts from the stored stack.
pub struct UndoStack<S> {
    storage: Arc<S>,
    entries: Mutex<Vec<UndoEntry>>,
}

impl<S: Storage> UndoStack<S> {
    pub async fn open(storage: Arc<S>) -> SnapshotResult<Self> {
        let entries = load(&*storage).await?;
        Ok(Self {
            storage,
            entries: Mutex::new(entries),
        })
    }

    pub async fn push(&self, entry: UndoEntry) -> SnapshotResult<()> {
        let mut entries = self.entries.lock().await;
        let mut next = load(&*self.storage).await?;
        next.push(entry);
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    /// Remove and return the most recent entry.
    pub async fn pop(&self) -> SnapshotResult<Option<UndoEntry>> {
        let mut entries = self.entries.lock().await;
        let mut next = load(&*self.storage).await?;
        let Some(entry) = next.pop() else {
            entries.clear();
            return Ok(None);
        };
        self.persist(&next).await?;
        *entries = next;
        Ok(Some(entry))
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn persist(&self, entries: &[UndoEntry]) -> SnapshotResult<()> {
        if let Err(e) = self.storage.write(UNDO_KEY, &entries).await {
            warn!(error = %e, "Failed to persist undo stack");
            return Err(e.into());
        }
        Ok(())
    }
}

async fn load<S: Storage>(storage: &S) -> SnapshotResult<Vec<UndoEntry>> {
    Ok(storage.read::<Vec<UndoEntry>>(UNDO_KEY).await?.unwrap_or_default())
}
