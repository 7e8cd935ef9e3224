//! Structure-aware document diffing for docsnap.
//!
//! The engine turns two document paths into a [`DiffResult`]: a
//! human-readable `raw` rendering plus, when both documents can be split
//! into paragraphs, a list of [`DiffChunk`]s with character-level inline
//! highlighting and folded runs of unchanged paragraphs.
//!
//! - [`align`]: sequence alignment (equal/insert/delete/replace opcodes)
//! - [`document`]: paragraph records and formatting markers
//! - [`extract`]: format readers and the extension registry
//! - [`strategy`]: paragraph and line-level diff strategies
//! - [`engine`]: first-match strategy selection
//! - [`merge`]: remote-wins three-way merge
//!
//! # Example
//!
//! ```no_run
//! use docsnap_diff::{DiffConfig, DiffEngine, ExtractorRegistry};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ExtractorRegistry::with_defaults());
//! let engine = DiffEngine::new(registry, DiffConfig::default());
//! let result = engine.compare(Path::new("old.txt"), Path::new("new.txt"));
//! println!("{}", result.raw);
//! ```

pub mod align;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod inline;
pub mod merge;
pub mod result;
pub mod strategy;

pub use align::{quick_ratio, Aligner, OpTag, Opcode};
pub use config::{AlignAlgorithm, DiffConfig, FormatFlags};
pub use document::{strip_markup, Paragraph, Run, TextRun};
pub use engine::DiffEngine;
pub use error::{DiffError, ExtractResult, ExtractionError};
pub use extract::{
    BoxedExtractor, DocumentWriter, Extractor, ExtractorRegistry, JsonDocumentExtractor,
    MarkdownExtractor, ParagraphSource, TxtExtractor,
};
pub use inline::inline_ops;
pub use merge::{merge_by_key, merge_paragraphs, three_way_merge};
pub use result::{DiffChunk, DiffResult, InlineKind, InlineOp};
pub use strategy::{BoxedStrategy, DiffInput, DiffStrategy, ParagraphStrategy, TextStrategy};
