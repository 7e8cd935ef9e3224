//! Document extractors and the extension registry.
//!
//! Every extractor can produce the text of a document. Extractors that
//! understand document structure also expose a [`ParagraphSource`]; the
//! paragraph strategy only runs when both sides have one. A
//! [`DocumentWriter`] can turn merged paragraphs back into a file.

mod json;
mod markdown;
mod text;

pub use json::JsonDocumentExtractor;
pub use markdown::MarkdownExtractor;
pub use text::TxtExtractor;

use crate::document::Paragraph;
use crate::error::{DiffError, ExtractResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Reads a document format.
pub trait Extractor: Send + Sync {
    /// Short format name used in logs.
    fn name(&self) -> &str;

    /// Full text of the document.
    fn get_text(&self, path: &Path) -> ExtractResult<String>;

    /// Paragraph extraction, if the format has paragraph structure.
    fn paragraphs(&self) -> Option<&dyn ParagraphSource> {
        None
    }

    /// Writing merged paragraphs back, if the format supports it.
    fn writer(&self) -> Option<&dyn DocumentWriter> {
        None
    }
}

/// Paragraph extraction capability.
pub trait ParagraphSource: Send + Sync {
    fn get_paragraphs(&self, path: &Path) -> ExtractResult<Vec<Paragraph>>;
}

/// Document rendering capability.
pub trait DocumentWriter: Send + Sync {
    /// Render `paragraphs` as a document of this format.
    ///
    /// Everything in `template` other than the paragraph content is kept.
    fn render(&self, template: &Path, paragraphs: &[Paragraph]) -> ExtractResult<Vec<u8>>;
}

/// Shared extractor handle.
pub type BoxedExtractor = Arc<dyn Extractor>;

/// Maps file extensions to extractors.
///
/// Lookup ignores case and a leading dot, so `".TXT"` and `"txt"` name the
/// same registration.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<String, BoxedExtractor>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in formats.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        let markdown: BoxedExtractor = Arc::new(MarkdownExtractor::new());
        let registrations: [(&str, BoxedExtractor); 4] = [
            ("txt", Arc::new(TxtExtractor)),
            ("md", markdown.clone()),
            ("markdown", markdown),
            ("docjson", Arc::new(JsonDocumentExtractor)),
        ];
        for (ext, extractor) in registrations {
            registry.extractors.insert(ext.to_string(), extractor);
        }

        registry
    }

    /// Register `extractor` for `ext`, replacing any earlier registration.
    pub fn register(&mut self, ext: &str, extractor: BoxedExtractor) -> Result<(), DiffError> {
        let key = normalize_ext(ext);
        if key.is_empty() {
            return Err(DiffError::EmptyExtension);
        }
        self.extractors.insert(key, extractor);
        Ok(())
    }

    /// Extractor registered for `ext`.
    pub fn get(&self, ext: &str) -> Option<&BoxedExtractor> {
        self.extractors.get(&normalize_ext(ext))
    }

    /// Extractor for the extension of `path`.
    pub fn for_path(&self, path: &Path) -> Option<&BoxedExtractor> {
        let ext = docsnap_util::path::extension(path)?;
        self.get(&ext)
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extractors.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_and_dot_insensitive() {
        let registry = ExtractorRegistry::with_defaults();
        for ext in ["txt", ".txt", "TXT", ".Txt"] {
            assert_eq!(registry.get(ext).map(|e| e.name()), Some("txt"));
        }
        assert_eq!(
            registry
                .for_path(Path::new("/docs/README.MD"))
                .map(|e| e.name()),
            Some("markdown")
        );
        assert!(registry.for_path(Path::new("/docs/archive.zip")).is_none());
        assert!(registry.for_path(Path::new("/docs/noext")).is_none());
    }

    #[test]
    fn test_default_capabilities() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(
            registry.extensions(),
            vec!["docjson", "markdown", "md", "txt"]
        );

        let docjson = registry.get("docjson").unwrap();
        assert!(docjson.paragraphs().is_some());
        assert!(docjson.writer().is_some());

        let md = registry.get("md").unwrap();
        assert!(md.paragraphs().is_some());
        assert!(md.writer().is_none());
    }

    #[test]
    fn test_register_replaces_and_rejects_empty() {
        let mut registry = ExtractorRegistry::new();
        registry.register(".LOG", Arc::new(TxtExtractor)).unwrap();
        assert!(registry.get("log").is_some());

        assert!(matches!(
            registry.register(".", Arc::new(TxtExtractor)),
            Err(DiffError::EmptyExtension)
        ));
    }
}
