//! Comparison commands.

use docsnap_diff::DiffResult;
use docsnap_snapshot::SnapshotStore;
use std::path::Path;

pub async fn diff_files(
    store: &SnapshotStore,
    path_a: &Path,
    path_b: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let result = store.compare_snapshots(path_a, path_b).await;
    print_result(&result, json)
}

/// Compare snapshot `id` with snapshot `other`, or with the live document.
pub async fn compare_snapshot(
    store: &SnapshotStore,
    document: &str,
    id: &str,
    other: Option<&str>,
) -> anyhow::Result<()> {
    let meta = store.find_snapshot(document, id).await?;
    let result = match other {
        Some(other) => {
            let other = store.find_snapshot(document, other).await?;
            store
                .compare_snapshots(&meta.content_path, &other.content_path)
                .await
        }
        None => store.compare_with_live(&meta).await,
    };
    print_result(&result, false)
}

fn print_result(result: &DiffResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.raw.is_empty() {
        println!("No differences.");
    } else {
        println!("{}", result.raw);
    }
    Ok(())
}
