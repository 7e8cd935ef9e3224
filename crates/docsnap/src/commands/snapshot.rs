//! Snapshot lifecycle commands.

use docsnap_snapshot::{SnapshotMetadata, SnapshotStore};
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub async fn create_snapshot(
    store: &SnapshotStore,
    path: &Path,
    remark: &str,
) -> anyhow::Result<()> {
    let meta = store.create_snapshot(path, remark).await?;
    println!("Created snapshot {} of {}", meta.snapshot_id, meta.document_name);
    Ok(())
}

pub async fn list_snapshots(
    store: &SnapshotStore,
    document: &str,
    json: bool,
) -> anyhow::Result<()> {
    let snapshots = store.list_snapshots(document).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No snapshots of {document}.");
        return Ok(());
    }

    println!("{:<44} {:<20} REMARK", "ID", "TAKEN");
    println!("{}", "-".repeat(78));
    for meta in &snapshots {
        let taken = meta
            .timestamp
            .with_timezone(&chrono::Local)
            .format(TIME_FORMAT);
        println!("{:<44} {:<20} {}", meta.snapshot_id, taken, meta.remark);
    }
    Ok(())
}

pub async fn list_documents(store: &SnapshotStore) -> anyhow::Result<()> {
    let documents = store.list_documents().await?;
    if documents.is_empty() {
        println!("No documents have snapshots.");
    }
    for document in documents {
        println!("{document}");
    }
    Ok(())
}

pub async fn show_snapshot(store: &SnapshotStore, document: &str, id: &str) -> anyhow::Result<()> {
    let meta = store.find_snapshot(document, id).await?;
    let text = store.get_content(&meta.content_path).await?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

pub async fn delete_snapshot(
    store: &SnapshotStore,
    document: &str,
    id: &str,
) -> anyhow::Result<()> {
    let meta = store.find_snapshot(document, id).await?;
    store.delete_snapshot(document, &meta).await?;
    println!("Deleted snapshot {id}");
    Ok(())
}

pub async fn restore_snapshot(
    store: &SnapshotStore,
    document: &str,
    id: &str,
) -> anyhow::Result<()> {
    let meta = store.find_snapshot(document, id).await?;
    let entry = store.restore_snapshot(&meta).await?;
    println!(
        "Restored {} to {} (backup {})",
        meta.source_path.display(),
        id,
        entry.backup.snapshot_id
    );
    Ok(())
}

pub async fn undo_restore(store: &SnapshotStore) -> anyhow::Result<()> {
    match store.undo_restore().await? {
        Some(meta) => print_undo(&meta),
        None => println!("Nothing to undo."),
    }
    Ok(())
}

fn print_undo(meta: &SnapshotMetadata) {
    println!(
        "Undid last restore of {} (snapshot {})",
        meta.source_path.display(),
        meta.snapshot_id
    );
}
