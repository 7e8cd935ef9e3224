//! Character-level inline highlighting for replaced text.

use crate::align::{Aligner, OpTag};
use crate::result::InlineOp;

/// Align `old` and `new` character by character.
///
/// A replaced character span becomes a delete followed by an insert, so
/// every op is either shared text or a one-sided fragment.
pub fn inline_ops(aligner: &Aligner, old: &str, new: &str) -> Vec<InlineOp> {
    let (old_chars, new_chars, opcodes) = aligner.char_opcodes(old, new);
    let mut ops = Vec::with_capacity(opcodes.len() + 1);

    for op in opcodes {
        let old_fragment: String = old_chars[op.old_range()].iter().collect();
        let new_fragment: String = new_chars[op.new_range()].iter().collect();
        match op.tag {
            OpTag::Equal => ops.push(InlineOp::equal(old_fragment)),
            OpTag::Insert => ops.push(InlineOp::insert(new_fragment)),
            OpTag::Delete => ops.push(InlineOp::delete(old_fragment)),
            OpTag::Replace => {
                ops.push(InlineOp::delete(old_fragment));
                ops.push(InlineOp::insert(new_fragment));
            }
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::InlineKind;

    fn rebuild(ops: &[InlineOp]) -> (String, String) {
        let old = ops.iter().map(|op| op.old_fragment.as_str()).collect();
        let new = ops.iter().map(|op| op.new_fragment.as_str()).collect();
        (old, new)
    }

    #[test]
    fn test_inline_reconstructs_both_sides() {
        let cases = [
            ("The quick brown fox", "The quick red fox"),
            ("", "inserted"),
            ("deleted", ""),
            ("naïve café", "naive cafe"),
            ("line one\nline two", "line one\nline 2\nline three"),
        ];
        for (old, new) in cases {
            let ops = inline_ops(&Aligner::default(), old, new);
            assert_eq!(rebuild(&ops), (old.to_string(), new.to_string()));
        }
    }

    #[test]
    fn test_inline_kinds() {
        let ops = inline_ops(&Aligner::default(), "cat", "cut");
        assert_eq!(
            ops,
            vec![
                InlineOp::equal("c"),
                InlineOp::delete("a"),
                InlineOp::insert("u"),
                InlineOp::equal("t"),
            ]
        );
        assert!(ops.iter().all(|op| match op.kind {
            InlineKind::Equal => op.old_fragment == op.new_fragment,
            InlineKind::Insert => op.old_fragment.is_empty(),
            InlineKind::Delete => op.new_fragment.is_empty(),
        }));
    }

    #[test]
    fn test_identical_text_is_single_equal() {
        let ops = inline_ops(&Aligner::default(), "same", "same");
        assert_eq!(ops, vec![InlineOp::equal("same")]);
    }
}
