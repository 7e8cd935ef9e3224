//! Durable index of snapshot records per document.

use crate::snapshot::SnapshotMetadata;
use crate::SnapshotResult;
use docsnap_storage::Storage;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Document name to insertion-ordered snapshot records.
pub type VersionIndex = BTreeMap<String, Vec<SnapshotMetadata>>;

const INDEX_KEY: &[&str] = &["versions"];

/// Version index cached in memory and rewritten as a whole after every
/// change.
///
/// Every change reloads the stored index under the write lock before
/// applying itself, so records written by other instances sharing the same
/// storage are kept. A failed write leaves both the in-memory and the stored
/// index as they were before the call.
pub struct VersionRepository<S> {
    storage: Arc<S>,
    index: RwLock<VersionIndex>,
}

impl<S: Storage> VersionRepository<S> {
    /// Load the index from storage; a missing index is empty.
    pub async fn open(storage: Arc<S>) -> SnapshotResult<Self> {
        let index = load(&*storage).await?;
        debug!(documents = index.len(), "Loaded version index");
        Ok(Self {
            storage,
            index: RwLock::new(index),
        })
    }

    /// Append a record to its document's list.
    pub async fn append(&self, meta: SnapshotMetadata) -> SnapshotResult<()> {
        let mut index = self.index.write().await;
        let mut next = load(&*self.storage).await?;
        let document = meta.document_name.clone();
        next.entry(document.clone()).or_default().push(meta);

        self.persist(&document, &next).await?;
        *index = next;
        Ok(())
    }

    /// Remove every record of `document` equal to `meta`.
    ///
    /// Returns whether anything was removed.
    pub async fn remove(&self, document: &str, meta: &SnapshotMetadata) -> SnapshotResult<bool> {
        let mut index = self.index.write().await;
        let mut next = load(&*self.storage).await?;
        let Some(list) = next.get_mut(document) else {
            *index = next;
            return Ok(false);
        };

        let before = list.len();
        list.retain(|m| m != meta);
        if list.len() == before {
            *index = next;
            return Ok(false);
        }
        if list.is_empty() {
            next.remove(document);
        }

        self.persist(document, &next).await?;
        *index = next;
        Ok(true)
    }

    /// Records of `document` in insertion order.
    pub async fn versions(&self, document: &str) -> Vec<SnapshotMetadata> {
        self.index
            .read()
            .await
            .get(document)
            .cloned()
            .unwrap_or_default()
    }

    /// Documents with at least one record.
    pub async fn documents(&self) -> Vec<String> {
        self.index
            .read()
            .await
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Replace the in-memory index with the stored one.
    pub async fn reload(&self) -> SnapshotResult<()> {
        let mut index = self.index.write().await;
        *index = load(&*self.storage).await?;
        Ok(())
    }

    async fn persist(&self, document: &str, index: &VersionIndex) -> SnapshotResult<()> {
        if let Err(e) = self.storage.write(INDEX_KEY, index).await {
            warn!(document = %document, error = %e, "Failed to persist version index");
            return Err(e.into());
        }
        Ok(())
    }
}

async fn load<S: Storage>(storage: &S) -> SnapshotResult<VersionIndex> {
    Ok(storage.read::<VersionIndex>(INDEX_KEY).await?.unwrap_or_default())
}
