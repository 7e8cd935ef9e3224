//! Three-way merge where remote edits win.
//!
//! `base` is aligned against `remote`. Regions remote left untouched are
//! copied from `local`; regions remote changed are taken from `remote`,
//! overriding whatever local did there. Conflicts are not detected.

use crate::align::{Aligner, OpTag};
use crate::document::Paragraph;
use std::hash::Hash;

/// Merge element sequences, comparing elements through `key`.
///
/// The cursor into `local` advances by the base length of every equal,
/// delete and replace span; local elements past the final cursor are
/// appended at the end.
pub fn merge_by_key<T, K, F>(
    aligner: &Aligner,
    base: &[T],
    local: &[T],
    remote: &[T],
    key: F,
) -> Vec<T>
where
    T: Clone,
    K: Hash + Eq + Ord,
    F: Fn(&T) -> K,
{
    let base_keys: Vec<K> = base.iter().map(&key).collect();
    let remote_keys: Vec<K> = remote.iter().map(&key).collect();

    let mut merged = Vec::with_capacity(local.len().max(remote.len()));
    let mut cursor = 0usize;

    for op in aligner.opcodes(&base_keys, &remote_keys) {
        match op.tag {
            OpTag::Equal => {
                merged.extend(local.iter().skip(cursor).take(op.old_len()).cloned());
                cursor += op.old_len();
            }
            OpTag::Delete => cursor += op.old_len(),
            OpTag::Insert => merged.extend_from_slice(&remote[op.new_range()]),
            OpTag::Replace => {
                merged.extend_from_slice(&remote[op.new_range()]);
                cursor += op.old_len();
            }
        }
    }

    merged.extend(local.iter().skip(cursor).cloned());
    merged
}

/// Line-based three-way merge of texts.
///
/// The result keeps a trailing newline when `local` has one.
pub fn three_way_merge(aligner: &Aligner, base: &str, local: &str, remote: &str) -> String {
    let base_lines: Vec<&str> = base.lines().collect();
    let local_lines: Vec<&str> = local.lines().collect();
    let remote_lines: Vec<&str> = remote.lines().collect();

    let merged = merge_by_key(aligner, &base_lines, &local_lines, &remote_lines, |l| *l);

    let mut out = merged.join("\n");
    if local.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Block-level three-way merge of paragraph records.
///
/// Paragraphs are matched by plain text, so a local formatting change in a
/// region remote did not touch survives the merge. Indices are renumbered.
pub fn merge_paragraphs(
    aligner: &Aligner,
    base: &[Paragraph],
    local: &[Paragraph],
    remote: &[Paragraph],
) -> Vec<Paragraph> {
    let mut merged = merge_by_key(aligner, base, local, remote, Paragraph::plain_text);
    for (index, paragraph) in merged.iter_mut().enumerate() {
        paragraph.index = index;
    }
    merged
}
