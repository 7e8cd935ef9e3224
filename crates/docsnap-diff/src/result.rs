//! Diff output types.

use serde::{Deserialize, Serialize};

/// Kind of a character-level inline operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineKind {
    Equal,
    Insert,
    Delete,
}

/// Character-level operation inside a replace chunk.
///
/// Concatenating `old_fragment` over all ops of a chunk gives its old text;
/// the same holds for `new_fragment` and the new text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineOp {
    pub kind: InlineKind,
    pub old_fragment: String,
    pub new_fragment: String,
}

impl InlineOp {
    pub fn equal(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: InlineKind::Equal,
            old_fragment: text.clone(),
            new_fragment: text,
        }
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Self {
            kind: InlineKind::Insert,
            old_fragment: String::new(),
            new_fragment: text.into(),
        }
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Self {
            kind: InlineKind::Delete,
            old_fragment: text.into(),
            new_fragment: String::new(),
        }
    }
}

/// One unit of structured diff output.
///
/// Indices are paragraph positions; a replace chunk spanning several
/// paragraphs carries the index of its first paragraph on each side and the
/// texts joined by line breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum DiffChunk {
    Equal {
        old_index: usize,
        new_index: usize,
        old_text: String,
        new_text: String,
    },
    Insert {
        new_index: usize,
        new_text: String,
    },
    Delete {
        old_index: usize,
        old_text: String,
    },
    Replace {
        old_index: usize,
        new_index: usize,
        old_text: String,
        new_text: String,
        inline: Vec<InlineOp>,
    },
    Skip {
        count: usize,
    },
}

impl DiffChunk {
    pub fn tag(&self) -> &'static str {
        match self {
            DiffChunk::Equal { .. } => "equal",
            DiffChunk::Insert { .. } => "insert",
            DiffChunk::Delete { .. } => "delete",
            DiffChunk::Replace { .. } => "replace",
            DiffChunk::Skip { .. } => "skip",
        }
    }

    pub fn old_index(&self) -> Option<usize> {
        match self {
            DiffChunk::Equal { old_index, .. }
            | DiffChunk::Delete { old_index, .. }
            | DiffChunk::Replace { old_index, .. } => Some(*old_index),
            DiffChunk::Insert { .. } | DiffChunk::Skip { .. } => None,
        }
    }

    pub fn new_index(&self) -> Option<usize> {
        match self {
            DiffChunk::Equal { new_index, .. }
            | DiffChunk::Insert { new_index, .. }
            | DiffChunk::Replace { new_index, .. } => Some(*new_index),
            DiffChunk::Delete { .. } | DiffChunk::Skip { .. } => None,
        }
    }

    pub fn old_text(&self) -> &str {
        match self {
            DiffChunk::Equal { old_text, .. }
            | DiffChunk::Delete { old_text, .. }
            | DiffChunk::Replace { old_text, .. } => old_text,
            DiffChunk::Insert { .. } | DiffChunk::Skip { .. } => "",
        }
    }

    pub fn new_text(&self) -> &str {
        match self {
            DiffChunk::Equal { new_text, .. }
            | DiffChunk::Insert { new_text, .. }
            | DiffChunk::Replace { new_text, .. } => new_text,
            DiffChunk::Delete { .. } | DiffChunk::Skip { .. } => "",
        }
    }

    pub fn inline(&self) -> Option<&[InlineOp]> {
        match self {
            DiffChunk::Replace { inline, .. } => Some(inline),
            _ => None,
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(
            self,
            DiffChunk::Insert { .. } | DiffChunk::Delete { .. } | DiffChunk::Replace { .. }
        )
    }
}

/// Outcome of comparing two documents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiffResult {
    /// Human-readable rendering; always populated.
    pub raw: String,

    /// Structured chunks; present only when a structure-aware strategy ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<Vec<DiffChunk>>,
}

impl DiffResult {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            structured: None,
        }
    }

    pub fn with_chunks(raw: impl Into<String>, chunks: Vec<DiffChunk>) -> Self {
        Self {
            raw: raw.into(),
            structured: Some(chunks),
        }
    }

    /// Whether any chunk or raw line reports a change.
    pub fn has_changes(&self) -> bool {
        match &self.structured {
            Some(chunks) => chunks.iter().any(DiffChunk::is_change),
            None => self
                .raw
                .lines()
                .any(|l| l.starts_with('+') || l.starts_with('-')),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_index_presence() {
        let insert = DiffChunk::Insert {
            new_index: 2,
            new_text: "x".to_string(),
        };
        assert_eq!(insert.old_index(), None);
        assert_eq!(insert.new_index(), Some(2));

        let delete = DiffChunk::Delete {
            old_index: 1,
            old_text: "y".to_string(),
        };
        assert_eq!(delete.old_index(), Some(1));
        assert_eq!(delete.new_index(), None);
        assert!(delete.inline().is_none());
    }

    #[test]
    fn test_chunk_serde_shape() {
        let skip = serde_json::to_value(DiffChunk::Skip { count: 4 }).unwrap();
        assert_eq!(skip, serde_json::json!({"tag": "skip", "count": 4}));

        let replace = DiffChunk::Replace {
            old_index: 0,
            new_index: 0,
            old_text: "a".to_string(),
            new_text: "b".to_string(),
            inline: vec![InlineOp::delete("a"), InlineOp::insert("b")],
        };
        let value = serde_json::to_value(&replace).unwrap();
        assert_eq!(value["tag"], "replace");
        assert_eq!(value["inline"][0]["kind"], "delete");
        assert_eq!(value["inline"][1]["new_fragment"], "b");
    }

    #[test]
    fn test_has_changes() {
        let same = DiffResult::with_chunks(
            "  a",
            vec![DiffChunk::Equal {
                old_index: 0,
                new_index: 0,
                old_text: "a".to_string(),
                new_text: "a".to_string(),
            }],
        );
        assert!(!same.has_changes());

        assert!(DiffResult::from_raw("--- a\n+++ b\n-x\n+y\n").has_changes());
        assert!(!DiffResult::from_raw("").has_changes());
    }
}
