//! Diff configuration.

use serde::{Deserialize, Serialize};

/// Paragraphs of context kept on each side of a folded equal run.
pub const CONTEXT_LINES: usize = 3;

/// Above this many paragraphs (old + new) the whole-document fallback may fire.
pub const FALLBACK_PARAGRAPHS: usize = 200;

/// Below this quick similarity the whole-document fallback fires.
pub const FALLBACK_SIMILARITY: f64 = 0.3;

/// Which formatting aspects are embedded as markers in decorated text.
///
/// Markers only change what the decorated text shows; paragraph alignment
/// always runs on the marker-free plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font: bool,
    pub size: bool,
    pub color: bool,
    pub line_spacing: bool,
    pub alignment: bool,
    pub numbering: bool,
    pub images: bool,
    pub tables: bool,
}

impl FormatFlags {
    /// Every marker enabled.
    pub const fn all() -> Self {
        Self {
            bold: true,
            italic: true,
            underline: true,
            font: true,
            size: true,
            color: true,
            line_spacing: true,
            alignment: true,
            numbering: true,
            images: true,
            tables: true,
        }
    }

    /// Every marker disabled: decorated text equals plain text.
    pub const fn none() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            font: false,
            size: false,
            color: false,
            line_spacing: false,
            alignment: false,
            numbering: false,
            images: false,
            tables: false,
        }
    }
}

impl Default for FormatFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Alignment algorithm used by the sequence aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignAlgorithm {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl From<AlignAlgorithm> for similar::Algorithm {
    fn from(value: AlignAlgorithm) -> Self {
        match value {
            AlignAlgorithm::Myers => similar::Algorithm::Myers,
            AlignAlgorithm::Patience => similar::Algorithm::Patience,
            AlignAlgorithm::Lcs => similar::Algorithm::Lcs,
        }
    }
}

/// Configuration for the paragraph and text strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Formatting markers embedded in decorated paragraph text.
    pub format: FormatFlags,

    /// Context paragraphs kept around a folded equal run.
    pub context_lines: usize,

    /// Total paragraph count above which the whole-document fallback is considered.
    pub fallback_paragraphs: usize,

    /// Quick similarity below which the whole-document fallback fires.
    pub fallback_similarity: f64,

    /// Alignment algorithm.
    pub algorithm: AlignAlgorithm,

    /// Upper bound for character-level inline alignment, in milliseconds.
    ///
    /// When it elapses the aligner returns a coarser (still complete) answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_timeout_ms: Option<u64>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            format: FormatFlags::default(),
            context_lines: CONTEXT_LINES,
            fallback_paragraphs: FALLBACK_PARAGRAPHS,
            fallback_similarity: FALLBACK_SIMILARITY,
            algorithm: AlignAlgorithm::default(),
            inline_timeout_ms: None,
        }
    }
}
