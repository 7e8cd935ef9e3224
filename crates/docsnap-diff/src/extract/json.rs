//! Structured JSON documents (`.docjson`).
//!
//! ```json
//! {
//!   "title": "Report",
//!   "paragraphs": [
//!     { "text": "Intro", "style": "Heading 1" },
//!     { "runs": [{ "type": "text", "text": "Bold", "bold": true }] }
//!   ]
//! }
//! ```
//!
//! Fields other than `paragraphs` belong to the document's non-content
//! structure and survive a render unchanged.

use super::{DocumentWriter, Extractor, ParagraphSource};
use crate::document::Paragraph;
use crate::error::{ExtractResult, ExtractionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    paragraphs: Vec<Paragraph>,

    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

/// Extractor and writer for `.docjson` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentExtractor;

impl JsonDocumentExtractor {
    fn load(&self, path: &Path) -> ExtractResult<JsonDocument> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtractionError::io(path, e))?;
        let mut doc: JsonDocument = serde_json::from_str(&content)
            .map_err(|e| ExtractionError::parse(path, e.to_string()))?;
        for (index, paragraph) in doc.paragraphs.iter_mut().enumerate() {
            paragraph.index = index;
            if paragraph.text.is_empty() && !paragraph.runs.is_empty() {
                paragraph.text = paragraph.plain_text();
            }
        }
        Ok(doc)
    }
}

impl Extractor for JsonDocumentExtractor {
    fn name(&self) -> &str {
        "docjson"
    }

    fn get_text(&self, path: &Path) -> ExtractResult<String> {
        let doc = self.load(path)?;
        Ok(doc
            .paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn paragraphs(&self) -> Option<&dyn ParagraphSource> {
        Some(self)
    }

    fn writer(&self) -> Option<&dyn DocumentWriter> {
        Some(self)
    }
}

impl ParagraphSource for JsonDocumentExtractor {
    fn get_paragraphs(&self, path: &Path) -> ExtractResult<Vec<Paragraph>> {
        Ok(self.load(path)?.paragraphs)
    }
}

impl DocumentWriter for JsonDocumentExtractor {
    fn render(&self, template: &Path, paragraphs: &[Paragraph]) -> ExtractResult<Vec<u8>> {
        let mut doc = self.load(template)?;
        doc.paragraphs = paragraphs
            .iter()
            .enumerate()
            .map(|(index, p)| Paragraph { index, ..p.clone() })
            .collect();

        let mut bytes =
            serde_json::to_vec_pretty(&doc).map_err(|e| ExtractionError::Render(e.to_string()))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
