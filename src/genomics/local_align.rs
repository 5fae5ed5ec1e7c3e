use bio::alignment::pairwise::Aligner;
use bio::alignment::AlignmentOperation;

use crate::genomics::{base_index, AlignedPair, GAP};

/// Substitution scores and affine gap penalties for local alignment.
///
/// `gap_open` is the score of the first column of a gap and `gap_extend` the
/// score of every further column, so a gap of length `k` scores
/// `gap_open + (k - 1) * gap_extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct ScoringScheme {
    /// Score for identical nucleotides.
    pub match_score: i32,
    /// Score for differing nucleotides (and any non-ACGT symbol).
    pub mismatch_score: i32,
    /// Score of the first gap column.
    pub gap_open: i32,
    /// Score of each additional gap column.
    pub gap_extend: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self {
            match_score: 5,
            mismatch_score: -4,
            gap_open: -10,
            gap_extend: -1,
        }
    }
}

impl ScoringScheme {
    /// Score for aligning `a` against `b`.
    pub fn score(&self, a: u8, b: u8) -> i32 {
        match (base_index(a), base_index(b)) {
            (Some(x), Some(y)) if x == y => self.match_score,
            _ => self.mismatch_score,
        }
    }
}

/// Best-scoring local alignment, reported over the full length of both inputs.
///
/// Unaligned prefixes are right-justified and unaligned suffixes
/// left-justified, padded with [`GAP`] so both rows have equal length.
#[derive(Debug, Clone, Default)]
pub struct LocalAligner {
    scoring: ScoringScheme,
}

impl LocalAligner {
    /// Create an aligner with the given scoring scheme.
    pub fn new(scoring: ScoringScheme) -> Self {
        Self { scoring }
    }

    /// Scoring scheme in use.
    pub fn scoring(&self) -> &ScoringScheme {
        &self.scoring
    }

    /// Align `read` against `reference`.
    pub fn align(&self, reference: &[u8], read: &[u8]) -> AlignedPair {
        if reference.is_empty() || read.is_empty() {
            return assemble(reference, read, 0, 0, &[], 0);
        }

        let scoring = self.scoring;
        // bio charges `open + k * extend` for a gap of length k.
        let mut aligner = Aligner::with_capacity(
            reference.len(),
            read.len(),
            scoring.gap_open - scoring.gap_extend,
            scoring.gap_extend,
            |a: u8, b: u8| scoring.score(a, b),
        );
        let alignment = aligner.local(reference, read);

        assemble(
            reference,
            read,
            alignment.xstart,
            alignment.ystart,
            &alignment.operations,
            alignment.score,
        )
    }
}

fn assemble(
    reference: &[u8],
    read: &[u8],
    reference_start: usize,
    read_start: usize,
    operations: &[AlignmentOperation],
    score: i32,
) -> AlignedPair {
    let capacity = reference.len() + read.len();
    let mut aligned_reference = Vec::with_capacity(capacity);
    let mut aligned_read = Vec::with_capacity(capacity);

    let lead = reference_start.max(read_start);
    aligned_reference.resize(lead - reference_start, GAP);
    aligned_reference.extend_from_slice(&reference[..reference_start]);
    aligned_read.resize(lead - read_start, GAP);
    aligned_read.extend_from_slice(&read[..read_start]);

    let base_at = |sequence: &[u8], idx: usize| sequence.get(idx).copied().unwrap_or(GAP);
    let (mut x, mut y) = (reference_start, read_start);
    for op in operations {
        match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                aligned_reference.push(base_at(reference, x));
                aligned_read.push(base_at(read, y));
                x += 1;
                y += 1;
            }
            AlignmentOperation::Del => {
                aligned_reference.push(GAP);
                aligned_read.push(base_at(read, y));
                y += 1;
            }
            AlignmentOperation::Ins => {
                aligned_reference.push(base_at(reference, x));
                aligned_read.push(GAP);
                x += 1;
            }
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
        }
    }

    aligned_reference.extend_from_slice(&reference[x.min(reference.len())..]);
    aligned_read.extend_from_slice(&read[y.min(read.len())..]);
    let width = aligned_reference.len().max(aligned_read.len());
    aligned_reference.resize(width, GAP);
    aligned_read.resize(width, GAP);

    AlignedPair {
        reference: aligned_reference,
        read: aligned_read,
        score,
    }
}
