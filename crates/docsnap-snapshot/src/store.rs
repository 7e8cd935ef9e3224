//! Snapshot store implementation.

use crate::event::SnapshotEvent;
use crate::merge::{plan_merge, MergeOutcome};
use crate::repository::VersionRepository;
use crate::snapshot::{content_hash, extension_with_dot, sort_newest_first, SnapshotMetadata};
use crate::undo::{UndoEntry, UndoStack};
use crate::{SnapshotError, SnapshotResult};
use chrono::Utc;
use docsnap_diff::{Aligner, DiffEngine, DiffResult, ExtractorRegistry};
use docsnap_storage::{JsonStorage, Storage};
use docsnap_util::{path, SnapshotIdGen, TimingGuard};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// Configuration for the snapshot store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Refuse to restore content whose hash no longer matches its record.
    pub verify_hash: bool,

    /// Upper bound for a comparison, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_timeout_ms: Option<u64>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            verify_hash: true,
            compare_timeout_ms: None,
        }
    }
}

/// Storage for document snapshots.
///
/// Snapshot copies live in a per-document directory and are never modified
/// after they are written:
/// ```text
/// data_dir/
///   versions.json            # document name -> snapshot records
///   undo.json                # reversible restores
///   snapshots/
///     <document_name>/
///       <snapshot_id>.<ext>  # byte-for-byte copy
/// ```
pub struct SnapshotStore<S = JsonStorage> {
    content_dir: PathBuf,
    repo: VersionRepository<S>,
    undo: UndoStack<S>,
    engine: Arc<DiffEngine>,
    aligner: Aligner,
    config: SnapshotConfig,
    events: broadcast::Sender<SnapshotEvent>,
}

impl SnapshotStore<JsonStorage> {
    /// Open the store rooted at `data_dir`, creating it if needed.
    pub async fn open(
        data_dir: impl Into<PathBuf>,
        engine: Arc<DiffEngine>,
        config: SnapshotConfig,
    ) -> SnapshotResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).await?;
        let storage = JsonStorage::new(&data_dir);
        Self::with_storage(storage, data_dir.join("snapshots"), engine, config).await
    }
}

impl<S: Storage> SnapshotStore<S> {
    /// Open a store over an explicit index backend.
    ///
    /// Snapshot copies are written below `content_dir`.
    pub async fn with_storage(
        storage: S,
        content_dir: PathBuf,
        engine: Arc<DiffEngine>,
        config: SnapshotConfig,
    ) -> SnapshotResult<Self> {
        fs::create_dir_all(&content_dir).await?;

        let storage = Arc::new(storage);
        let repo = VersionRepository::open(storage.clone()).await?;
        let undo = UndoStack::open(storage).await?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            content_dir,
            repo,
            undo,
            engine,
            aligner: Aligner::default(),
            config,
            events,
        })
    }

    /// Aligner used by three-way merges.
    pub fn with_aligner(mut self, aligner: Aligner) -> Self {
        self.aligner = aligner;
        self
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    pub fn engine(&self) -> &Arc<DiffEngine> {
        &self.engine
    }

    pub fn registry(&self) -> &Arc<ExtractorRegistry> {
        self.engine.registry()
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Receive [`SnapshotEvent`]s from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotEvent> {
        self.events.subscribe()
    }

    /// Capture the current bytes of `path` as a new snapshot.
    pub async fn create_snapshot(
        &self,
        path: &Path,
        remark: &str,
    ) -> SnapshotResult<SnapshotMetadata> {
        let _timing = TimingGuard::snapshot("create");

        let file_meta = fs::metadata(path)
            .await
            .map_err(|e| SnapshotError::from_io(path, e))?;
        if !file_meta.is_file() {
            return Err(SnapshotError::not_found(path.display().to_string()));
        }
        let document_name = path::document_name(path)
            .ok_or_else(|| SnapshotError::not_found(path.display().to_string()))?;
        let source_path = fs::canonicalize(path)
            .await
            .map_err(|e| SnapshotError::from_io(path, e))?;
        let bytes = fs::read(path)
            .await
            .map_err(|e| SnapshotError::from_io(path, e))?;

        let snapshot_id = SnapshotIdGen::generate();
        let document_dir = self.content_dir.join(&document_name);
        fs::create_dir_all(&document_dir).await?;
        let content_path =
            document_dir.join(format!("{snapshot_id}{}", extension_with_dot(path)));
        write_new_file(&content_path, &bytes).await?;

        let meta = SnapshotMetadata {
            snapshot_id,
            document_name,
            source_path,
            timestamp: Utc::now(),
            remark: remark.to_string(),
            content_path,
            content_hash: content_hash(&bytes),
        };

        if let Err(e) = self.repo.append(meta.clone()).await {
            if let Err(rm) = fs::remove_file(&meta.content_path).await {
                warn!(
                    path = %meta.content_path.display(),
                    error = %rm,
                    "Failed to remove unindexed snapshot copy"
                );
            }
            return Err(e);
        }

        info!(
            document = %meta.document_name,
            snapshot_id = %meta.snapshot_id,
            bytes = bytes.len(),
            "Created snapshot"
        );
        let _ = self.events.send(SnapshotEvent::Created(meta.clone()));
        Ok(meta)
    }

    /// Snapshots of `document`, newest first.
    ///
    /// Reloads the index first, so snapshots written by other processes are
    /// included.
    pub async fn list_snapshots(&self, document: &str) -> SnapshotResult<Vec<SnapshotMetadata>> {
        self.repo.reload().await?;
        let mut versions = self.repo.versions(document).await;
        sort_newest_first(&mut versions);
        Ok(versions)
    }

    /// Documents that have snapshots.
    pub async fn list_documents(&self) -> SnapshotResult<Vec<String>> {
        self.repo.reload().await?;
        Ok(self.repo.documents().await)
    }

    /// Look up one snapshot of `document` by id.
    pub async fn find_snapshot(
        &self,
        document: &str,
        snapshot_id: &str,
    ) -> SnapshotResult<SnapshotMetadata> {
        self.repo
            .versions(document)
            .await
            .into_iter()
            .find(|m| m.snapshot_id == snapshot_id)
            .ok_or_else(|| SnapshotError::not_found(format!("snapshot {document}/{snapshot_id}")))
    }

    /// Delete a snapshot record and its content copy.
    ///
    /// The record goes first, so the index never points at a deleted copy.
    /// A copy that is already gone is not an error.
    pub async fn delete_snapshot(
        &self,
        document: &str,
        meta: &SnapshotMetadata,
    ) -> SnapshotResult<()> {
        let removed = self.repo.remove(document, meta).await?;

        match fs::remove_file(&meta.content_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %meta.content_path.display(), "Snapshot copy already gone");
            }
            Err(e) => warn!(
                path = %meta.content_path.display(),
                error = %e,
                "Failed to remove snapshot copy"
            ),
        }

        info!(
            document = %document,
            snapshot_id = %meta.snapshot_id,
            removed,
            "Deleted snapshot"
        );
        let _ = self.events.send(SnapshotEvent::Deleted(meta.clone()));
        Ok(())
    }

    /// Overwrite the working document with a snapshot's content.
    ///
    /// The current state is captured first ("Auto backup before restore"),
    /// the content is swapped in atomically, and the restored state is
    /// captured as a marker ("Restore to"). The pair is pushed on the undo
    /// stack. If any step fails the working file is put back and the
    /// snapshots taken so far are removed.
    pub async fn restore_snapshot(&self, target: &SnapshotMetadata) -> SnapshotResult<UndoEntry> {
        let _timing = TimingGuard::snapshot("restore");
        let work_file = target.source_path.clone();

        let content = self.read_content(target).await?;
        let original = fs::read(&work_file)
            .await
            .map_err(|e| SnapshotError::from_io(&work_file, e))?;

        let backup = self
            .create_snapshot(
                &work_file,
                &format!("Auto backup before restore -> {}", target.snapshot_id),
            )
            .await?;

        if let Err(e) = replace_file(&work_file, &content).await {
            self.discard(&backup).await;
            return Err(e);
        }

        let restore = match self
            .create_snapshot(&work_file, &format!("Restore to {}", target.snapshot_id))
            .await
        {
            Ok(meta) => meta,
            Err(e) => {
                self.roll_back(&work_file, &original, &[&backup]).await;
                return Err(e);
            }
        };

        let entry = UndoEntry {
            document_name: target.document_name.clone(),
            backup,
            restore,
        };
        if let Err(e) = self.undo.push(entry.clone()).await {
            self.roll_back(&work_file, &original, &[&entry.restore, &entry.backup])
                .await;
            return Err(e);
        }

        info!(
            document = %target.document_name,
            snapshot_id = %target.snapshot_id,
            path = %work_file.display(),
            "Restored snapshot"
        );
        Ok(entry)
    }

    /// Whether a restore can be undone.
    pub async fn can_undo(&self) -> bool {
        !self.undo.is_empty().await
    }

    /// Undo the most recent restore.
    ///
    /// Writes the pre-restore backup over the working file and records an
    /// "Undo Restore" snapshot, which is returned. Does nothing when there
    /// is no restore to undo. An entry whose backup snapshot has been deleted
    /// is dropped with a `NotFound` error, so older restores stay reachable.
    pub async fn undo_restore(&self) -> SnapshotResult<Option<SnapshotMetadata>> {
        let _timing = TimingGuard::snapshot("undo");

        let Some(entry) = self.undo.pop().await? else {
            debug!("Nothing to undo");
            return Ok(None);
        };

        let backup_path = &entry.backup.content_path;
        if !fs::try_exists(backup_path).await.unwrap_or(true) {
            warn!(
                document = %entry.document_name,
                snapshot_id = %entry.backup.snapshot_id,
                "Backup copy is gone, dropping undo entry"
            );
            return Err(SnapshotError::not_found(backup_path.display().to_string()));
        }

        match self.apply_undo(&entry).await {
            Ok(meta) => {
                info!(
                    document = %entry.document_name,
                    snapshot_id = %entry.backup.snapshot_id,
                    "Undid restore"
                );
                Ok(Some(meta))
            }
            Err(e) => {
                if let Err(push) = self.undo.push(entry).await {
                    warn!(error = %push, "Failed to put undo entry back");
                }
                Err(e)
            }
        }
    }

    async fn apply_undo(&self, entry: &UndoEntry) -> SnapshotResult<SnapshotMetadata> {
        let content = self.read_content(&entry.backup).await?;
        let work_file = &entry.backup.source_path;
        replace_file(work_file, &content).await?;
        self.create_snapshot(work_file, "Undo Restore").await
    }

    /// Compare two document files.
    ///
    /// Never fails: problems are reported in the result's `raw` text.
    pub async fn compare_snapshots(&self, path_a: &Path, path_b: &Path) -> DiffResult {
        let engine = self.engine.clone();
        let (a, b) = (path_a.to_path_buf(), path_b.to_path_buf());
        let task = tokio::task::spawn_blocking(move || engine.compare(&a, &b));

        let joined = match self.config.compare_timeout_ms {
            Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(
                        a = %path_a.display(),
                        b = %path_b.display(),
                        timeout_ms = ms,
                        "Comparison timed out"
                    );
                    return DiffResult::from_raw(format!("Comparison timed out after {ms} ms"));
                }
            },
            None => task.await,
        };

        joined.unwrap_or_else(|e| {
            warn!(error = %e, "Comparison task failed");
            DiffResult::from_raw(format!("Comparison failed: {e}"))
        })
    }

    /// Compare a snapshot with the live document it was taken from.
    pub async fn compare_with_live(&self, meta: &SnapshotMetadata) -> DiffResult {
        self.compare_snapshots(&meta.content_path, &meta.source_path)
            .await
    }

    /// Text of a snapshot copy (or any document), via its extractor.
    pub async fn get_content(&self, snapshot_path: &Path) -> SnapshotResult<String> {
        let extractor = self
            .registry()
            .for_path(snapshot_path)
            .cloned()
            .ok_or_else(|| SnapshotError::UnsupportedFormat(extension_with_dot(snapshot_path)))?;
        fs::metadata(snapshot_path)
            .await
            .map_err(|e| SnapshotError::from_io(snapshot_path, e))?;

        let path = snapshot_path.to_path_buf();
        run_blocking(move || Ok(extractor.get_text(&path)?)).await
    }

    /// Merged text of `local` with `remote`'s changes since `base`.
    ///
    /// Nothing is written.
    pub async fn merge_preview(
        &self,
        base: &Path,
        local: &Path,
        remote: &Path,
    ) -> SnapshotResult<String> {
        Ok(self.plan(base, local, remote).await?.text)
    }

    /// Merge `remote`'s changes since `base` into the working file `work`.
    ///
    /// Remote edits win where both sides changed the same region. The
    /// working file is captured before the merge ("Auto backup before
    /// merge") and after it ("Merge from <remote>"); the latter is returned.
    pub async fn merge_into_work_file(
        &self,
        base: &Path,
        remote: &Path,
        work: &Path,
    ) -> SnapshotResult<SnapshotMetadata> {
        let _timing = TimingGuard::snapshot("merge");

        let original = fs::read(work)
            .await
            .map_err(|e| SnapshotError::from_io(work, e))?;
        let outcome = self.plan(base, work, remote).await?;

        let backup = self
            .create_snapshot(work, "Auto backup before merge")
            .await?;
        if let Err(e) = replace_file(work, &outcome.bytes).await {
            self.discard(&backup).await;
            return Err(e);
        }

        let remote_name =
            path::document_name(remote).unwrap_or_else(|| remote.display().to_string());
        match self
            .create_snapshot(work, &format!("Merge from {remote_name}"))
            .await
        {
            Ok(meta) => {
                info!(
                    document = %meta.document_name,
                    remote = %remote_name,
                    structured = outcome.structured,
                    "Merged into working file"
                );
                Ok(meta)
            }
            Err(e) => {
                self.roll_back(work, &original, &[&backup]).await;
                Err(e)
            }
        }
    }

    async fn plan(&self, base: &Path, local: &Path, remote: &Path) -> SnapshotResult<MergeOutcome> {
        for p in [base, local, remote] {
            fs::metadata(p)
                .await
                .map_err(|e| SnapshotError::from_io(p, e))?;
        }

        let registry = self.registry().clone();
        let aligner = self.aligner;
        let (base, local, remote) = (base.to_path_buf(), local.to_path_buf(), remote.to_path_buf());
        run_blocking(move || plan_merge(&registry, &aligner, &base, &local, &remote)).await
    }

    /// Read a snapshot copy, checking its hash when configured.
    async fn read_content(&self, meta: &SnapshotMetadata) -> SnapshotResult<Vec<u8>> {
        let bytes = fs::read(&meta.content_path)
            .await
            .map_err(|e| SnapshotError::from_io(&meta.content_path, e))?;
        if self.config.verify_hash && !meta.matches_content(&bytes) {
            return Err(SnapshotError::Corrupted(format!(
                "content of {} does not match its hash",
                meta.snapshot_id
            )));
        }
        Ok(bytes)
    }

    /// Best-effort: put `original` back and drop snapshots taken so far.
    async fn roll_back(&self, work_file: &Path, original: &[u8], created: &[&SnapshotMetadata]) {
        if let Err(e) = replace_file(work_file, original).await {
            warn!(
                path = %work_file.display(),
                error = %e,
                "Failed to put working file back"
            );
        }
        for meta in created {
            self.discard(meta).await;
        }
    }

    async fn discard(&self, meta: &SnapshotMetadata) {
        if let Err(e) = self.delete_snapshot(&meta.document_name, meta).await {
            warn!(
                snapshot_id = %meta.snapshot_id,
                error = %e,
                "Failed to discard snapshot"
            );
        }
    }
}

async fn run_blocking<T, F>(f: F) -> SnapshotResult<T>
where
    F: FnOnce() -> SnapshotResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SnapshotError::operation_failed(format!("blocking task failed: {e}")))?
}

/// Write a file that must not exist yet.
async fn write_new_file(path: &Path, bytes: &[u8]) -> SnapshotResult<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    if let Err(e) = write_and_sync(&mut file, bytes).await {
        drop(file);
        let _ = fs::remove_file(path).await;
        return Err(e.into());
    }
    Ok(())
}

/// Replace `path` with `bytes` through a sibling temp file and a rename.
///
/// The replacement keeps the permissions of the file it replaces.
async fn replace_file(path: &Path, bytes: &[u8]) -> SnapshotResult<()> {
    let temp = path::temp_sibling(path, "docsnap");
    let result: std::io::Result<()> = async {
        let mut file = fs::File::create(&temp).await?;
        write_and_sync(&mut file, bytes).await?;
        drop(file);
        if let Ok(existing) = fs::metadata(path).await {
            fs::set_permissions(&temp, existing.permissions()).await?;
        }
        fs::rename(&temp, path).await
    }
    .await;

    if let Err(e) = result {
        let _ = fs::remove_file(&temp).await;
        return Err(SnapshotError::from_io(path, e));
    }
    Ok(())
}

async fn write_and_sync(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsnap_diff::DiffConfig;
    use docsnap_storage::MemoryStorage;
    use tempfile::TempDir;

    fn engine() -> Arc<DiffEngine> {
        Arc::new(DiffEngine::new(
            Arc::new(ExtractorRegistry::with_defaults()),
            DiffConfig::default(),
        ))
    }

    async fn setup_test() -> (TempDir, SnapshotStore) {
        let dir = TempDir::new().unwrap();
        let store =
            SnapshotStore::open(dir.path().join("data"), engine(), SnapshotConfig::default())
                .await
                .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_create_snapshot_copies_bytes() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("report.txt");
        fs::write(&doc, "first draft\n").await.unwrap();

        let meta = store.create_snapshot(&doc, "initial").await.unwrap();
        assert_eq!(meta.document_name, "report.txt");
        assert_eq!(meta.remark, "initial");
        assert_eq!(meta.source_path, fs::canonicalize(&doc).await.unwrap());
        assert!(meta.content_path.starts_with(store.content_dir().join("report.txt")));
        assert!(meta
            .content_path
            .to_string_lossy()
            .ends_with(&format!("{}.txt", meta.snapshot_id)));
        assert_eq!(fs::read(&meta.content_path).await.unwrap(), b"first draft\n");
        assert_eq!(meta.content_hash, content_hash(b"first draft\n"));

        // The copy does not follow later edits.
        fs::write(&doc, "second draft\n").await.unwrap();
        assert_eq!(fs::read(&meta.content_path).await.unwrap(), b"first draft\n");
    }

    #[tokio::test]
    async fn test_snapshots_in_same_second_are_distinct() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "x").await.unwrap();

        let mut ids = std::collections::HashSet::new();
        for _ in 0..5 {
            let meta = store.create_snapshot(&doc, "").await.unwrap();
            assert!(ids.insert(meta.snapshot_id));
        }
        assert_eq!(store.list_snapshots("a.txt").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_create_missing_file_is_not_found() {
        let (dir, store) = setup_test().await;
        let err = store
            .create_snapshot(&dir.path().join("missing.txt"), "")
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));

        let err = store.create_snapshot(dir.path(), "").await.unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
        assert!(store.list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_index_write_leaves_no_copy() {
        let dir = TempDir::new().unwrap();
        let storage = MemoryStorage::new();
        let content_dir = dir.path().join("snapshots");
        let store = SnapshotStore::with_storage(
            storage.clone(),
            content_dir.clone(),
            engine(),
            SnapshotConfig::default(),
        )
        .await
        .unwrap();

        let doc = dir.path().join("a.txt");
        fs::write(&doc, "x").await.unwrap();

        storage.set_fail_writes(true);
        let err = store.create_snapshot(&doc, "").await.unwrap_err();
        assert!(matches!(err, SnapshotError::Persistence(_)));

        storage.set_fail_writes(false);
        assert!(store.list_snapshots("a.txt").await.unwrap().is_empty());
        let mut entries = fs::read_dir(content_dir.join("a.txt")).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    async fn assert_restore_rolls_back(successful_writes: usize) {
        let dir = TempDir::new().unwrap();
        let storage = MemoryStorage::new();
        let content_dir = dir.path().join("snapshots");
        let store = SnapshotStore::with_storage(
            storage.clone(),
            content_dir.clone(),
            engine(),
            SnapshotConfig::default(),
        )
        .await
        .unwrap();

        let doc = dir.path().join("a.txt");
        fs::write(&doc, "original").await.unwrap();
        let target = store.create_snapshot(&doc, "").await.unwrap();
        fs::write(&doc, "current").await.unwrap();

        storage.fail_once_after(successful_writes);
        let err = store.restore_snapshot(&target).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Persistence(_)));

        assert_eq!(fs::read(&doc).await.unwrap(), b"current");
        assert!(!store.can_undo().await);
        assert_eq!(store.list_snapshots("a.txt").await.unwrap(), vec![target.clone()]);

        let mut copies = Vec::new();
        let mut entries = fs::read_dir(content_dir.join("a.txt")).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            copies.push(entry.path());
        }
        assert_eq!(copies, vec![target.content_path]);
    }

    #[tokio::test]
    async fn test_restore_rolls_back_when_marker_fails() {
        // The backup is indexed, the marker is not.
        assert_restore_rolls_back(1).await;
    }

    #[tokio::test]
    async fn test_restore_rolls_back_when_undo_push_fails() {
        // Backup and marker are indexed, the undo stack is not.
        assert_restore_rolls_back(2).await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_restore_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, store) = setup_test().await;
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "one").await.unwrap();
        let meta = store.create_snapshot(&doc, "").await.unwrap();

        fs::write(&doc, "two").await.unwrap();
        fs::set_permissions(&doc, std::fs::Permissions::from_mode(0o640))
            .await
            .unwrap();
        store.restore_snapshot(&meta).await.unwrap();

        assert_eq!(fs::read(&doc).await.unwrap(), b"one");
        let mode = fs::metadata(&doc).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_sees_other_stores() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "x").await.unwrap();

        let first = store.create_snapshot(&doc, "one").await.unwrap();
        let second = store.create_snapshot(&doc, "two").await.unwrap();

        let other =
            SnapshotStore::open(dir.path().join("data"), engine(), SnapshotConfig::default())
                .await
                .unwrap();
        let third = other.create_snapshot(&doc, "three").await.unwrap();

        let listed = store.list_snapshots("a.txt").await.unwrap();
        assert_eq!(listed, vec![third, second, first]);
    }

    #[tokio::test]
    async fn test_delete_snapshot() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "x").await.unwrap();
        let meta = store.create_snapshot(&doc, "").await.unwrap();
        let kept = store.create_snapshot(&doc, "").await.unwrap();

        store.delete_snapshot("a.txt", &meta).await.unwrap();
        assert!(!meta.content_path.exists());
        assert_eq!(store.list_snapshots("a.txt").await.unwrap(), vec![kept.clone()]);

        // Missing copy is fine.
        fs::remove_file(&kept.content_path).await.unwrap();
        store.delete_snapshot("a.txt", &kept).await.unwrap();
        assert!(store.list_snapshots("a.txt").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_events() {
        let (dir, store) = setup_test().await;
        let mut rx = store.subscribe();
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "x").await.unwrap();

        let meta = store.create_snapshot(&doc, "").await.unwrap();
        store.delete_snapshot("a.txt", &meta).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), SnapshotEvent::Created(meta.clone()));
        assert_eq!(rx.recv().await.unwrap(), SnapshotEvent::Deleted(meta));
    }

    #[tokio::test]
    async fn test_find_snapshot() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "x").await.unwrap();
        let meta = store.create_snapshot(&doc, "").await.unwrap();

        assert_eq!(store.find_snapshot("a.txt", &meta.snapshot_id).await.unwrap(), meta);
        assert!(matches!(
            store.find_snapshot("a.txt", "nope").await,
            Err(SnapshotError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_content() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("notes.md");
        fs::write(&doc, "# Notes\n\nbody\n").await.unwrap();
        let meta = store.create_snapshot(&doc, "").await.unwrap();

        assert_eq!(
            store.get_content(&meta.content_path).await.unwrap(),
            "# Notes\n\nbody\n"
        );

        let unknown = dir.path().join("blob.xyz");
        fs::write(&unknown, "?").await.unwrap();
        let err = store.get_content(&unknown).await.unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedFormat(ref ext) if ext == ".xyz"));

        let err = store
            .get_content(&dir.path().join("gone.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_compare_with_live() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "one\ntwo\n").await.unwrap();
        let meta = store.create_snapshot(&doc, "").await.unwrap();
        fs::write(&doc, "one\n2\n").await.unwrap();

        let result = store.compare_with_live(&meta).await;
        assert_eq!(result.raw, "  one\n- two\n+ 2");
    }

    #[tokio::test]
    async fn test_restore_refuses_corrupted_copy() {
        let (dir, store) = setup_test().await;
        let doc = dir.path().join("a.txt");
        fs::write(&doc, "original").await.unwrap();
        let meta = store.create_snapshot(&doc, "").await.unwrap();

        fs::write(&meta.content_path, "tampered").await.unwrap();
        fs::write(&doc, "current").await.unwrap();

        let err = store.restore_snapshot(&meta).await.unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupted(_)));
        assert_eq!(fs::read_to_string(&doc).await.unwrap(), "current");
        assert!(!store.can_undo().await);
        assert_eq!(store.list_snapshots("a.txt").await.unwrap().len(), 1);
    }
}
