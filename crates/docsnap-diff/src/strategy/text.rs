//! Line-level unified diff, the catch-all strategy.

use super::{DiffInput, DiffStrategy};
use crate::config::DiffConfig;
use crate::error::{DiffError, ExtractionError};
use crate::extract::Extractor;
use crate::result::DiffResult;
use similar::TextDiff;
use std::path::Path;
use tracing::warn;

/// Unified line diff over the documents' text.
///
/// Text comes from the registered extractor when there is one; otherwise,
/// or when the extractor fails, the file is read directly with invalid
/// UTF-8 replaced.
#[derive(Debug, Clone)]
pub struct TextStrategy {
    config: DiffConfig,
}

impl TextStrategy {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    /// Unified diff of two texts, compared line by line.
    ///
    /// Line terminators are normalised, so a missing final newline is not
    /// reported as a change. Identical texts give an empty string.
    pub fn diff_texts(&self, old: &str, new: &str, old_name: &str, new_name: &str) -> String {
        let old = normalize_lines(old);
        let new = normalize_lines(new);

        let diff = TextDiff::configure()
            .algorithm(self.config.algorithm.into())
            .diff_lines(&old, &new);

        let mut unified = diff
            .unified_diff()
            .context_radius(self.config.context_lines)
            .missing_newline_hint(false)
            .header(old_name, new_name)
            .to_string();

        let trimmed = unified.trim_end_matches('\n').len();
        unified.truncate(trimmed);
        unified
    }
}

impl Default for TextStrategy {
    fn default() -> Self {
        Self::new(DiffConfig::default())
    }
}

impl DiffStrategy for TextStrategy {
    fn name(&self) -> &str {
        "text"
    }

    fn supports(&self, _a: Option<&dyn Extractor>, _b: Option<&dyn Extractor>) -> bool {
        true
    }

    fn diff(&self, input: &DiffInput<'_>) -> Result<DiffResult, DiffError> {
        let old = read_text(input.path_a, input.extractor_a)?;
        let new = read_text(input.path_b, input.extractor_b)?;
        let raw = self.diff_texts(
            &old,
            &new,
            &file_name(input.path_a),
            &file_name(input.path_b),
        );
        Ok(DiffResult::from_raw(raw))
    }
}

fn read_text(path: &Path, extractor: Option<&dyn Extractor>) -> Result<String, ExtractionError> {
    if let Some(extractor) = extractor {
        match extractor.get_text(path) {
            Ok(text) => return Ok(text),
            Err(e) => warn!(
                path = %path.display(),
                extractor = extractor.name(),
                error = %e,
                "Extractor failed, reading file directly"
            ),
        }
    }
    let bytes = std::fs::read(path).map_err(|e| ExtractionError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn normalize_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out
}
