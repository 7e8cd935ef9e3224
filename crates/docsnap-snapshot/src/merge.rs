//! Merge planning for the snapshot store.

use crate::{SnapshotError, SnapshotResult};
use docsnap_diff::{
    merge_paragraphs, three_way_merge, Aligner, BoxedExtractor, ExtractorRegistry, Paragraph,
};
use std::path::Path;

/// Result of merging three documents, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merged document text.
    pub text: String,

    /// Bytes to write to the working file.
    pub bytes: Vec<u8>,

    /// Whether paragraph records were merged (rather than lines of text).
    pub structured: bool,
}

/// Merge `remote`'s changes since `base` into `local`.
///
/// When `local` is a writable structured format and all three documents
/// have paragraphs, paragraph records are merged and rendered into the
/// local document's structure. Otherwise the documents' text is merged line
/// by line. A structured document cannot take a line merge, so that
/// combination is rejected instead of flattening the file.
pub fn plan_merge(
    registry: &ExtractorRegistry,
    aligner: &Aligner,
    base: &Path,
    local: &Path,
    remote: &Path,
) -> SnapshotResult<MergeOutcome> {
    let base_ex = extractor_for(registry, base)?;
    let local_ex = extractor_for(registry, local)?;
    let remote_ex = extractor_for(registry, remote)?;

    if let Some(writer) = local_ex.writer() {
        let (Some(b), Some(l), Some(r)) = (
            base_ex.paragraphs(),
            local_ex.paragraphs(),
            remote_ex.paragraphs(),
        ) else {
            return Err(SnapshotError::UnsupportedFormat(format!(
                "{} cannot be merged into {}",
                base_ex.name(),
                local_ex.name()
            )));
        };

        let merged = merge_paragraphs(
            aligner,
            &b.get_paragraphs(base)?,
            &l.get_paragraphs(local)?,
            &r.get_paragraphs(remote)?,
        );
        let bytes = writer.render(local, &merged)?;
        let text = merged
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n");
        return Ok(MergeOutcome {
            text,
            bytes,
            structured: true,
        });
    }

    let text = three_way_merge(
        aligner,
        &base_ex.get_text(base)?,
        &local_ex.get_text(local)?,
        &remote_ex.get_text(remote)?,
    );
    Ok(MergeOutcome {
        bytes: text.clone().into_bytes(),
        text,
        structured: false,
    })
}

fn extractor_for(registry: &ExtractorRegistry, path: &Path) -> SnapshotResult<BoxedExtractor> {
    registry.for_path(path).cloned().ok_or_else(|| {
        SnapshotError::UnsupportedFormat(crate::snapshot::extension_with_dot(path))
    })
}
