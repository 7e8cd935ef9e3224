//! Plain text documents.

use super::{Extractor, ParagraphSource};
use crate::document::Paragraph;
use crate::error::{ExtractResult, ExtractionError};
use std::path::Path;

/// Plain text: every line is a paragraph.
///
/// Invalid UTF-8 is replaced rather than rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxtExtractor;

impl Extractor for TxtExtractor {
    fn name(&self) -> &str {
        "txt"
    }

    fn get_text(&self, path: &Path) -> ExtractResult<String> {
        let bytes = std::fs::read(path).map_err(|e| ExtractionError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn paragraphs(&self) -> Option<&dyn ParagraphSource> {
        Some(self)
    }
}

impl ParagraphSource for TxtExtractor {
    fn get_paragraphs(&self, path: &Path) -> ExtractResult<Vec<Paragraph>> {
        let text = self.get_text(path)?;
        Ok(text
            .lines()
            .enumerate()
            .map(|(index, line)| Paragraph::plain(index, line))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_become_paragraphs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "first\n\nthird\r\nfourth").unwrap();

        let paragraphs = TxtExtractor.get_paragraphs(&path).unwrap();
        let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "", "third", "fourth"]);
        assert_eq!(paragraphs[3].index, 3);
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, b"ok \xff end").unwrap();

        let text = TxtExtractor.get_text(&path).unwrap();
        assert_eq!(text, "ok \u{FFFD} end");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TxtExtractor
            .get_text(Path::new("/nonexistent/docsnap/file.txt"))
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
    }
}
