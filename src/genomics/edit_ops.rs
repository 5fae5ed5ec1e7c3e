//! Levenshtein edit scripts between two byte strings.
//!
//! Positions follow the usual convention: a `Delete` at `source_pos` removes
//! `source[source_pos]`, an `Insert` at `dest_pos` adds `dest[dest_pos]`, and a
//! `Replace` changes `source[source_pos]` into `dest[dest_pos]`.
//!
//! Scripts come from a unit-cost global alignment (`bio` pairwise aligner with
//! match 0, mismatch -1, gap -1 per column), so the script length always equals
//! the Levenshtein distance. Among equally short scripts the one picked is the
//! aligner's traceback.

use std::iter;
use std::ops::Range;

use bio::alignment::distance::levenshtein;
use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;

/// Kind of a single edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOpKind {
    /// Substitute one character for another.
    Replace,
    /// Insert a character from the destination.
    Insert,
    /// Delete a character from the source.
    Delete,
}

/// One step of an edit script turning `source` into `dest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOp {
    /// Operation kind.
    pub kind: EditOpKind,
    /// Position in the source string.
    pub source_pos: usize,
    /// Position in the destination string.
    pub dest_pos: usize,
}

impl EditOp {
    /// Whether this operation changes the length of the string.
    pub fn is_indel(&self) -> bool {
        matches!(self.kind, EditOpKind::Insert | EditOpKind::Delete)
    }
}

/// Kind of a grouped opcode block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeKind {
    /// Identical characters.
    Equal,
    /// Substituted characters.
    Replace,
    /// Characters present only in the destination.
    Insert,
    /// Characters present only in the source.
    Delete,
}

/// Contiguous block of the same operation, covering source and destination ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    /// Operation applied over the block.
    pub kind: OpcodeKind,
    /// Covered source range.
    pub source: Range<usize>,
    /// Covered destination range.
    pub dest: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep,
    Replace,
    Insert,
    Delete,
}

fn unit_cost(a: u8, b: u8) -> i32 {
    if a == b {
        0
    } else {
        -1
    }
}

/// Column operations of an optimal unit-cost global alignment of `source`
/// (x) against `dest` (y).
fn alignment_operations(source: &[u8], dest: &[u8]) -> Vec<AlignmentOperation> {
    if source.is_empty() || dest.is_empty() {
        // `Ins` consumes x only, `Del` consumes y only.
        return iter::repeat(AlignmentOperation::Ins)
            .take(source.len())
            .chain(iter::repeat(AlignmentOperation::Del).take(dest.len()))
            .collect();
    }
    let mut aligner = Aligner::with_capacity(source.len(), dest.len(), 0, -1, unit_cost);
    aligner.global(source, dest).operations
}

/// Alignment path as `(step, source_pos, dest_pos)` triples.
fn trace_path(source: &[u8], dest: &[u8]) -> Vec<(Step, usize, usize)> {
    let operations = alignment_operations(source, dest);
    let mut steps = Vec::with_capacity(operations.len());
    let (mut i, mut j) = (0usize, 0usize);

    for operation in operations {
        match operation {
            AlignmentOperation::Match => {
                steps.push((Step::Keep, i, j));
                i += 1;
                j += 1;
            }
            AlignmentOperation::Subst => {
                steps.push((Step::Replace, i, j));
                i += 1;
                j += 1;
            }
            AlignmentOperation::Del => {
                steps.push((Step::Insert, i, j));
                j += 1;
            }
            AlignmentOperation::Ins => {
                steps.push((Step::Delete, i, j));
                i += 1;
            }
            // Clipping never occurs in global mode.
            AlignmentOperation::Xclip(len) => i += len,
            AlignmentOperation::Yclip(len) => j += len,
        }
    }

    steps
}

/// Minimal edit script turning `source` into `dest`.
pub fn edit_ops(source: &[u8], dest: &[u8]) -> Vec<EditOp> {
    trace_path(source, dest)
        .into_iter()
        .filter_map(|(step, source_pos, dest_pos)| {
            let kind = match step {
                Step::Keep => return None,
                Step::Replace => EditOpKind::Replace,
                Step::Insert => EditOpKind::Insert,
                Step::Delete => EditOpKind::Delete,
            };
            Some(EditOp {
                kind,
                source_pos,
                dest_pos,
            })
        })
        .collect()
}

/// Levenshtein distance between `source` and `dest`.
pub fn edit_distance(source: &[u8], dest: &[u8]) -> usize {
    levenshtein(source, dest) as usize
}

/// Edit script grouped into contiguous blocks, including `Equal` runs.
pub fn opcodes(source: &[u8], dest: &[u8]) -> Vec<Opcode> {
    let mut blocks: Vec<Opcode> = Vec::new();

    for (step, source_pos, dest_pos) in trace_path(source, dest) {
        let kind = match step {
            Step::Keep => OpcodeKind::Equal,
            Step::Replace => OpcodeKind::Replace,
            Step::Insert => OpcodeKind::Insert,
            Step::Delete => OpcodeKind::Delete,
        };
        let source_advance = usize::from(!matches!(step, Step::Insert));
        let dest_advance = usize::from(!matches!(step, Step::Delete));

        match blocks.last_mut() {
            Some(block) if block.kind == kind => {
                block.source.end += source_advance;
                block.dest.end += dest_advance;
            }
            _ => blocks.push(Opcode {
                kind,
                source: source_pos..source_pos + source_advance,
                dest: dest_pos..dest_pos + dest_advance,
            }),
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_need_no_edits() {
        assert!(edit_ops(b"ACGT", b"ACGT").is_empty());
        assert_eq!(edit_distance(b"ACGT", b"ACGT"), 0);
    }

    #[test]
    fn single_substitution_is_one_replace() {
        let ops = edit_ops(b"ACGT", b"AGGT");
        assert_eq!(
            ops,
            vec![EditOp {
                kind: EditOpKind::Replace,
                source_pos: 1,
                dest_pos: 1
            }]
        );
    }

    #[test]
    fn deletion_and_insertion_positions() {
        let deleted = edit_ops(b"TACAG", b"TACG");
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].kind, EditOpKind::Delete);
        assert_eq!(deleted[0].source_pos, 3);

        let inserted = edit_ops(b"TACG", b"TACAG");
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].kind, EditOpKind::Insert);
        assert_eq!(inserted[0].dest_pos, 3);
    }

    #[test]
    fn script_length_matches_distance() {
        let pairs: [(&[u8], &[u8]); 4] = [
            (b"CGGG", b"ACTG"),
            (b"ACTGGA", b"TGGAAC"),
            (b"", b"ACG"),
            (b"GATTACA", b""),
        ];
        for (source, dest) in pairs {
            assert_eq!(edit_ops(source, dest).len(), edit_distance(source, dest));
        }
        assert_eq!(edit_distance(b"CGGG", b"ACTG"), 3);
    }

    fn replay(source: &[u8], dest: &[u8]) -> Vec<u8> {
        let mut rebuilt = Vec::new();
        let mut next = 0;
        for op in edit_ops(source, dest) {
            rebuilt.extend_from_slice(&source[next..op.source_pos]);
            next = op.source_pos;
            match op.kind {
                EditOpKind::Replace => {
                    rebuilt.push(dest[op.dest_pos]);
                    next += 1;
                }
                EditOpKind::Insert => rebuilt.push(dest[op.dest_pos]),
                EditOpKind::Delete => next += 1,
            }
        }
        rebuilt.extend_from_slice(&source[next..]);
        rebuilt
    }

    #[test]
    fn script_replays_into_destination() {
        let pairs: [(&[u8], &[u8]); 5] = [
            (b"ACTGGAACACAAAGCATAGACTGCGGGGCG", b"ACTGGAACACAAAGCATAGCGGGGCG"),
            (b"ACGTACGTACTTTT", b"ACGTACGTAC"),
            (b"TACG", b"GGTACAGT"),
            (b"", b"ACG"),
            (b"GATTACA", b""),
        ];
        for (source, dest) in pairs {
            assert_eq!(replay(source, dest), dest.to_vec());
        }
    }

    #[test]
    fn trailing_loss_deletes_the_tail() {
        let ops = edit_ops(b"ACGTACGTACTTTT", b"ACGTACGTAC");
        let positions: Vec<usize> = ops.iter().map(|op| op.source_pos).collect();
        assert!(ops.iter().all(|op| op.kind == EditOpKind::Delete));
        assert_eq!(positions, [10, 11, 12, 13]);
    }

    #[test]
    fn opcodes_cover_both_strings() {
        let blocks = opcodes(b"TACAG", b"TACAAG");
        assert_eq!(blocks.first().map(|b| b.kind), Some(OpcodeKind::Equal));
        assert!(blocks.iter().any(|b| b.kind == OpcodeKind::Insert));
        assert_eq!(blocks.last().map(|b| b.source.end), Some(5));
        assert_eq!(blocks.last().map(|b| b.dest.end), Some(6));
    }
}
