//! Three-way merge command.

use docsnap_snapshot::SnapshotStore;
use std::path::Path;

pub async fn merge(
    store: &SnapshotStore,
    base: &Path,
    remote: &Path,
    work: &Path,
    preview: bool,
) -> anyhow::Result<()> {
    if preview {
        let text = store.merge_preview(base, work, remote).await?;
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    let meta = store.merge_into_work_file(base, remote, work).await?;
    println!(
        "Merged {} into {} (snapshot {})",
        remote.display(),
        work.display(),
        meta.snapshot_id
    );
    Ok(())
}
