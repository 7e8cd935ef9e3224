//! Structure-aware paragraph diff.

use super::{DiffInput, DiffStrategy};
use crate::align::{quick_ratio, Aligner, OpTag};
use crate::config::DiffConfig;
use crate::document::Paragraph;
use crate::error::DiffError;
use crate::extract::Extractor;
use crate::inline::inline_ops;
use crate::result::{DiffChunk, DiffResult};
use std::ops::Range;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Aligns paragraphs by their plain text and highlights replaced spans
/// character by character.
///
/// Long runs of unchanged paragraphs are folded into a skip chunk with
/// `context_lines` paragraphs of context on each side. Large, mostly
/// unrelated documents skip paragraph alignment and become one replace
/// chunk over the whole text.
#[derive(Debug, Clone)]
pub struct ParagraphStrategy {
    config: DiffConfig,
    aligner: Aligner,
    inline_aligner: Aligner,
}

impl ParagraphStrategy {
    pub fn new(config: DiffConfig) -> Self {
        let aligner = Aligner::new(config.algorithm);
        let inline_aligner =
            aligner.with_timeout(config.inline_timeout_ms.map(Duration::from_millis));
        Self {
            config,
            aligner,
            inline_aligner,
        }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Diff two paragraph sequences.
    pub fn diff_paragraphs(&self, old: &[Paragraph], new: &[Paragraph]) -> DiffResult {
        let flags = &self.config.format;
        let plain_old: Vec<String> = old.iter().map(Paragraph::plain_text).collect();
        let plain_new: Vec<String> = new.iter().map(Paragraph::plain_text).collect();
        let deco_old: Vec<String> = old.iter().map(|p| p.decorate(flags)).collect();
        let deco_new: Vec<String> = new.iter().map(|p| p.decorate(flags)).collect();

        let mut out = ChunkWriter::new(&deco_old, &deco_new);

        if old.len() + new.len() > self.config.fallback_paragraphs {
            let ratio = quick_ratio(&plain_old, &plain_new);
            if ratio < self.config.fallback_similarity {
                debug!(
                    paragraphs = old.len() + new.len(),
                    ratio, "Documents largely unrelated, diffing full text"
                );
                out.whole_document(&self.inline_aligner);
                return out.finish();
            }
        }

        let context = self.config.context_lines;
        for op in self.aligner.opcodes(&plain_old, &plain_new) {
            match op.tag {
                OpTag::Equal => {
                    let span = op.old_len();
                    if span > 2 * context {
                        for k in 0..context {
                            out.equal(op.i1 + k, op.j1 + k);
                        }
                        out.skip(span - 2 * context);
                        for k in span - context..span {
                            out.equal(op.i1 + k, op.j1 + k);
                        }
                    } else {
                        for k in 0..span {
                            out.equal(op.i1 + k, op.j1 + k);
                        }
                    }
                }
                OpTag::Delete => op.old_range().for_each(|i| out.delete(i)),
                OpTag::Insert => op.new_range().for_each(|j| out.insert(j)),
                OpTag::Replace => out.replace(op.i1..op.i2, op.j1..op.j2, &self.inline_aligner),
            }
        }

        out.finish()
    }
}

impl Default for ParagraphStrategy {
    fn default() -> Self {
        Self::new(DiffConfig::default())
    }
}

impl DiffStrategy for ParagraphStrategy {
    fn name(&self) -> &str {
        "paragraph"
    }

    fn supports(&self, a: Option<&dyn Extractor>, b: Option<&dyn Extractor>) -> bool {
        let capable = |e: Option<&dyn Extractor>| e.is_some_and(|e| e.paragraphs().is_some());
        capable(a) && capable(b)
    }

    fn diff(&self, input: &DiffInput<'_>) -> Result<DiffResult, DiffError> {
        let old = read_paragraphs(input.path_a, input.extractor_a)?;
        let new = read_paragraphs(input.path_b, input.extractor_b)?;
        Ok(self.diff_paragraphs(&old, &new))
    }
}

fn read_paragraphs(
    path: &Path,
    extractor: Option<&dyn Extractor>,
) -> Result<Vec<Paragraph>, DiffError> {
    let source = extractor
        .and_then(|e| e.paragraphs())
        .ok_or_else(|| DiffError::MissingCapability(path.to_path_buf()))?;
    Ok(source.get_paragraphs(path)?)
}

/// Accumulates chunks and their raw rendering side by side.
struct ChunkWriter<'a> {
    old: &'a [String],
    new: &'a [String],
    chunks: Vec<DiffChunk>,
    raw: Vec<String>,
}

impl<'a> ChunkWriter<'a> {
    fn new(old: &'a [String], new: &'a [String]) -> Self {
        Self {
            old,
            new,
            chunks: Vec::new(),
            raw: Vec::new(),
        }
    }

    fn equal(&mut self, i: usize, j: usize) {
        let (old_text, new_text) = (&self.old[i], &self.new[j]);
        self.raw.push(format!("  {old_text}"));
        // Same plain text, different formatting.
        if old_text != new_text {
            self.raw.push(format!("  ~ {new_text}"));
        }
        self.chunks.push(DiffChunk::Equal {
            old_index: i,
            new_index: j,
            old_text: old_text.clone(),
            new_text: new_text.clone(),
        });
    }

    fn delete(&mut self, i: usize) {
        self.raw.push(format!("- {}", self.old[i]));
        self.chunks.push(DiffChunk::Delete {
            old_index: i,
            old_text: self.old[i].clone(),
        });
    }

    fn insert(&mut self, j: usize) {
        self.raw.push(format!("+ {}", self.new[j]));
        self.chunks.push(DiffChunk::Insert {
            new_index: j,
            new_text: self.new[j].clone(),
        });
    }

    fn skip(&mut self, count: usize) {
        self.raw.push(format!("... {count} unchanged paragraphs ..."));
        self.chunks.push(DiffChunk::Skip { count });
    }

    fn replace(&mut self, old: Range<usize>, new: Range<usize>, aligner: &Aligner) {
        let old_index = old.start;
        let new_index = new.start;
        let old_slice: &'a [String] = &self.old[old];
        let new_slice: &'a [String] = &self.new[new];

        self.raw.extend(old_slice.iter().map(|text| format!("- {text}")));
        self.raw.extend(new_slice.iter().map(|text| format!("+ {text}")));

        let old_text = old_slice.join("\n");
        let new_text = new_slice.join("\n");
        let inline = inline_ops(aligner, &old_text, &new_text);
        self.chunks.push(DiffChunk::Replace {
            old_index,
            new_index,
            old_text,
            new_text,
            inline,
        });
    }

    fn whole_document(&mut self, aligner: &Aligner) {
        self.replace(0..self.old.len(), 0..self.new.len(), aligner);
    }

    fn finish(self) -> DiffResult {
        DiffResult::with_chunks(self.raw.join("\n"), self.chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatFlags;
    use crate::document::{Run, TextRun};

    fn paras(texts: &[&str]) -> Vec<Paragraph> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Paragraph::plain(i, *t))
            .collect()
    }

    #[test]
    fn test_insert_and_delete_emit_one_chunk_per_paragraph() {
        let old = paras(&["a", "b", "c", "d"]);
        let new = paras(&["a", "d", "e", "f"]);
        let result = ParagraphStrategy::default().diff_paragraphs(&old, &new);
        let chunks = result.structured.unwrap();

        let deletes: Vec<_> = chunks.iter().filter(|c| c.tag() == "delete").collect();
        let inserts: Vec<_> = chunks.iter().filter(|c| c.tag() == "insert").collect();
        assert_eq!(deletes.len(), 2);
        assert_eq!(inserts.len(), 2);
        assert_eq!(inserts[1].new_index(), Some(3));
        assert!(result.raw.contains("- b"));
        assert!(result.raw.contains("+ f"));
    }

    #[test]
    fn test_multi_paragraph_replace_is_one_chunk() {
        let old = paras(&["keep", "one", "two", "end"]);
        let new = paras(&["keep", "uno", "dos", "tres", "end"]);
        let chunks = ParagraphStrategy::default()
            .diff_paragraphs(&old, &new)
            .structured
            .unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks[1],
            DiffChunk::Replace {
                old_index: 1,
                new_index: 1,
                old_text: "one\ntwo".to_string(),
                new_text: "uno\ndos\ntres".to_string(),
                inline: chunks[1].inline().unwrap().to_vec(),
            }
        );
    }

    #[test]
    fn test_formatting_change_does_not_break_alignment() {
        let old = vec![Paragraph::from_runs(0, vec![Run::text("Title")])];
        let new = vec![Paragraph::from_runs(
            0,
            vec![Run::Text(TextRun::new("Title").bold())],
        )];
        let result = ParagraphStrategy::default().diff_paragraphs(&old, &new);
        let chunks = result.structured.unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].tag(), "equal");
        assert_eq!(chunks[0].new_text(), "<b>Title</b>");
        assert_eq!(result.raw, "  Title\n  ~ <b>Title</b>");
    }

    #[test]
    fn test_disabled_flags_hide_formatting() {
        let config = DiffConfig {
            format: FormatFlags::none(),
            ..DiffConfig::default()
        };
        let old = vec![Paragraph::from_runs(0, vec![Run::text("Title")])];
        let new = vec![Paragraph::from_runs(
            0,
            vec![Run::Text(TextRun::new("Title").bold())],
        )];
        let result = ParagraphStrategy::new(config).diff_paragraphs(&old, &new);
        assert_eq!(result.raw, "  Title");
    }

    #[test]
    fn test_custom_context_lines() {
        let config = DiffConfig {
            context_lines: 1,
            ..DiffConfig::default()
        };
        let doc = paras(&["1", "2", "3", "4", "5"]);
        let chunks = ParagraphStrategy::new(config)
            .diff_paragraphs(&doc, &doc)
            .structured
            .unwrap();
        let tags: Vec<&str> = chunks.iter().map(DiffChunk::tag).collect();
        assert_eq!(tags, vec!["equal", "skip", "equal"]);
        assert_eq!(chunks[1], DiffChunk::Skip { count: 3 });
        assert_eq!(chunks[2].old_index(), Some(4));
    }

    #[test]
    fn test_empty_documents() {
        let result = ParagraphStrategy::default().diff_paragraphs(&[], &[]);
        assert_eq!(result.raw, "");
        assert_eq!(result.structured, Some(vec![]));
    }

    #[test]
    fn test_supports_requires_paragraphs_on_both_sides() {
        struct TextOnly;
        impl Extractor for TextOnly {
            fn name(&self) -> &str {
                "text-only"
            }
            fn get_text(&self, _path: &std::path::Path) -> crate::ExtractResult<String> {
                Ok(String::new())
            }
        }

        let strategy = ParagraphStrategy::default();
        let txt = crate::extract::TxtExtractor;
        assert!(strategy.supports(Some(&txt), Some(&txt)));
        assert!(!strategy.supports(Some(&txt), Some(&TextOnly)));
        assert!(!strategy.supports(None, Some(&txt)));
    }
}
