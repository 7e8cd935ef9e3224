//! Sequence alignment.
//!
//! Produces opcodes that partition two sequences fully and contiguously.
//! Every element is significant: there is no junk heuristic, because
//! paragraphs and lines are short and frequently repeated.

use crate::config::AlignAlgorithm;
use serde::{Deserialize, Serialize};
use similar::DiffTag;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;
use std::time::{Duration, Instant};

/// Kind of an alignment opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One aligned span: `old[i1..i2]` corresponds to `new[j1..j2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    pub fn new(tag: OpTag, old: Range<usize>, new: Range<usize>) -> Self {
        Self {
            tag,
            i1: old.start,
            i2: old.end,
            j1: new.start,
            j2: new.end,
        }
    }

    pub fn old_range(&self) -> Range<usize> {
        self.i1..self.i2
    }

    pub fn new_range(&self) -> Range<usize> {
        self.j1..self.j2
    }

    pub fn old_len(&self) -> usize {
        self.i2 - self.i1
    }

    pub fn new_len(&self) -> usize {
        self.j2 - self.j1
    }
}

/// Longest-common-subsequence based aligner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aligner {
    algorithm: AlignAlgorithm,
    timeout: Option<Duration>,
}

impl Aligner {
    pub fn new(algorithm: AlignAlgorithm) -> Self {
        Self {
            algorithm,
            timeout: None,
        }
    }

    /// Bound the running time of each alignment.
    ///
    /// Past the deadline the remaining region is reported as a single
    /// replace, so the opcodes still partition both sequences.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Align two sequences.
    pub fn opcodes<T>(&self, old: &[T], new: &[T]) -> Vec<Opcode>
    where
        T: Hash + Eq + Ord,
    {
        let deadline = self.timeout.map(|t| Instant::now() + t);
        let ops = similar::capture_diff_slices_deadline(self.algorithm.into(), old, new, deadline);

        let raw = ops.iter().map(|op| {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            let tag = match tag {
                DiffTag::Equal => OpTag::Equal,
                DiffTag::Insert => OpTag::Insert,
                DiffTag::Delete => OpTag::Delete,
                DiffTag::Replace => OpTag::Replace,
            };
            Opcode::new(tag, old_range, new_range)
        });

        normalize(raw)
    }

    /// Align two strings character by character.
    ///
    /// Returns the opcodes together with the char vectors they index into.
    pub fn char_opcodes(&self, old: &str, new: &str) -> (Vec<char>, Vec<char>, Vec<Opcode>) {
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();
        let ops = self.opcodes(&old_chars, &new_chars);
        (old_chars, new_chars, ops)
    }
}

/// Coalesce raw opcodes so that no two equal spans and no two change spans
/// are adjacent, and drop empty spans.
fn normalize(raw: impl Iterator<Item = Opcode>) -> Vec<Opcode> {
    let mut out: Vec<Opcode> = Vec::new();

    for op in raw {
        if op.old_len() == 0 && op.new_len() == 0 {
            continue;
        }
        let is_equal = op.tag == OpTag::Equal;

        match out.last_mut() {
            Some(last) if (last.tag == OpTag::Equal) == is_equal => {
                last.i2 = op.i2;
                last.j2 = op.j2;
                if !is_equal {
                    last.tag = change_tag(last.old_len(), last.new_len());
                }
            }
            _ => {
                let tag = if is_equal {
                    OpTag::Equal
                } else {
                    change_tag(op.old_len(), op.new_len())
                };
                out.push(Opcode { tag, ..op });
            }
        }
    }

    out
}

fn change_tag(old_len: usize, new_len: usize) -> OpTag {
    match (old_len, new_len) {
        (0, _) => OpTag::Insert,
        (_, 0) => OpTag::Delete,
        _ => OpTag::Replace,
    }
}

/// Cheap upper bound on the similarity of two sequences.
///
/// `2 * M / T` where `M` counts elements shared as a multiset and `T` is
/// the combined length. Two empty sequences are fully similar.
pub fn quick_ratio<T: Hash + Eq>(old: &[T], new: &[T]) -> f64 {
    let total = old.len() + new.len();
    if total == 0 {
        return 1.0;
    }

    let mut available: HashMap<&T, usize> = HashMap::new();
    for item in new {
        *available.entry(item).or_insert(0) += 1;
    }

    let mut matches = 0usize;
    for item in old {
        if let Some(count) = available.get_mut(item) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }

    2.0 * matches as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition<T: Clone + PartialEq + std::fmt::Debug>(
        old: &[T],
        new: &[T],
        ops: &[Opcode],
    ) {
        let mut i = 0;
        let mut j = 0;
        let mut rebuilt_old = Vec::new();
        let mut rebuilt_new = Vec::new();
        for (idx, op) in ops.iter().enumerate() {
            assert_eq!(op.i1, i, "gap or overlap on old side at {idx}");
            assert_eq!(op.j1, j, "gap or overlap on new side at {idx}");
            if idx > 0 {
                assert!(
                    !(op.tag == OpTag::Equal && ops[idx - 1].tag == OpTag::Equal),
                    "adjacent equal opcodes"
                );
            }
            match op.tag {
                OpTag::Equal => assert_eq!(old[op.old_range()], new[op.new_range()]),
                OpTag::Insert => assert_eq!(op.old_len(), 0),
                OpTag::Delete => assert_eq!(op.new_len(), 0),
                OpTag::Replace => assert!(op.old_len() > 0 && op.new_len() > 0),
            }
            rebuilt_old.extend_from_slice(&old[op.old_range()]);
            rebuilt_new.extend_from_slice(&new[op.new_range()]);
            i = op.i2;
            j = op.j2;
        }
        assert_eq!(i, old.len());
        assert_eq!(j, new.len());
        assert_eq!(rebuilt_old, old);
        assert_eq!(rebuilt_new, new);
    }

    #[test]
    fn test_single_replacement_in_middle() {
        let old = ["a", "b", "c"];
        let new = ["a", "x", "c"];
        let ops = Aligner::default().opcodes(&old, &new);

        assert_eq!(
            ops,
            vec![
                Opcode::new(OpTag::Equal, 0..1, 0..1),
                Opcode::new(OpTag::Replace, 1..2, 1..2),
                Opcode::new(OpTag::Equal, 2..3, 2..3),
            ]
        );
    }

    #[test]
    fn test_insert_and_delete() {
        let old = ["a", "b", "c", "d"];
        let new = ["a", "c", "d", "e"];
        let ops = Aligner::default().opcodes(&old, &new);
        assert_partition(&old, &new, &ops);
        assert!(ops.iter().any(|op| op.tag == OpTag::Delete));
        assert!(ops.iter().any(|op| op.tag == OpTag::Insert));
    }

    #[test]
    fn test_empty_sides() {
        let empty: [&str; 0] = [];
        let some = ["a", "b"];

        assert!(Aligner::default().opcodes(&empty, &empty).is_empty());
        assert_eq!(
            Aligner::default().opcodes(&empty, &some),
            vec![Opcode::new(OpTag::Insert, 0..0, 0..2)]
        );
        assert_eq!(
            Aligner::default().opcodes(&some, &empty),
            vec![Opcode::new(OpTag::Delete, 0..2, 0..0)]
        );
    }

    #[test]
    fn test_partition_holds_for_every_algorithm() {
        let old: Vec<String> = "the quick brown fox jumps over the lazy dog the end"
            .split(' ')
            .map(String::from)
            .collect();
        let new: Vec<String> = "a quick red fox leaps over the dog the the end again"
            .split(' ')
            .map(String::from)
            .collect();

        for algorithm in [
            AlignAlgorithm::Myers,
            AlignAlgorithm::Patience,
            AlignAlgorithm::Lcs,
        ] {
            let ops = Aligner::new(algorithm).opcodes(&old, &new);
            assert_partition(&old, &new, &ops);
        }
    }

    #[test]
    fn test_repeated_elements_are_not_junk() {
        // Many identical short lines must still match one to one.
        let old: Vec<&str> = std::iter::repeat("").take(300).chain(["x"]).collect();
        let new: Vec<&str> = std::iter::repeat("").take(300).chain(["y"]).collect();
        let ops = Aligner::default().opcodes(&old, &new);
        assert_partition(&old, &new, &ops);
        assert_eq!(ops[0], Opcode::new(OpTag::Equal, 0..300, 0..300));
    }

    #[test]
    fn test_char_opcodes_handle_multibyte() {
        let (old, new, ops) = Aligner::default().char_opcodes("héllo wörld", "hello wörld!");
        assert_partition(&old, &new, &ops);
    }

    #[test]
    fn test_timeout_still_partitions() {
        let old: Vec<u32> = (0..2000).map(|i| i * 7 % 13).collect();
        let new: Vec<u32> = (0..2000).map(|i| i * 5 % 11).collect();
        let ops = Aligner::default()
            .with_timeout(Some(Duration::from_millis(0)))
            .opcodes(&old, &new);
        assert_partition(&old, &new, &ops);
    }

    #[test]
    fn test_normalize_merges_adjacent_changes() {
        let raw = vec![
            Opcode::new(OpTag::Equal, 0..1, 0..1),
            Opcode::new(OpTag::Delete, 1..2, 1..1),
            Opcode::new(OpTag::Insert, 2..2, 1..3),
            Opcode::new(OpTag::Equal, 2..3, 3..4),
            Opcode::new(OpTag::Equal, 3..4, 4..5),
        ];
        assert_eq!(
            normalize(raw.into_iter()),
            vec![
                Opcode::new(OpTag::Equal, 0..1, 0..1),
                Opcode::new(OpTag::Replace, 1..2, 1..3),
                Opcode::new(OpTag::Equal, 2..4, 3..5),
            ]
        );
    }

    #[test]
    fn test_quick_ratio() {
        assert_eq!(quick_ratio::<&str>(&[], &[]), 1.0);
        assert_eq!(quick_ratio(&["a", "b"], &["a", "b"]), 1.0);
        assert_eq!(quick_ratio(&["a", "b"], &["c", "d"]), 0.0);
        assert_eq!(quick_ratio(&["a", "a", "b"], &["a", "c", "d"]), 2.0 / 6.0);
    }
}
