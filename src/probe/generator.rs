//! Lazy enumeration of the mismatch and bulge variants of a target segment.
//!
//! Every generator borrows the segment and returns a finite iterator that can
//! be cloned to restart the enumeration.

use std::fmt;
use std::slice;

use itertools::{iproduct, Itertools};
use thiserror::Error;

use crate::genomics::{find_anchor, NUCLEOTIDES};

/// Errors raised by the variant generators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Two-mismatch enumeration needs at least two positions.
    #[error("segment of length {0} is too short for two mismatches")]
    InvalidSegmentLength(usize),
}

/// How a variant differs from the wild-type segment. Positions are 1-based
/// except for the insertion point of a DNA bulge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// One substituted base.
    OneMismatch {
        /// 1-based position.
        position: usize,
        /// Wild-type base.
        from: u8,
        /// Substituted base.
        to: u8,
    },
    /// Two substituted bases at distinct positions.
    TwoMismatch {
        /// 1-based positions, ascending.
        positions: (usize, usize),
        /// Wild-type and substituted base at the first position.
        first: (u8, u8),
        /// Wild-type and substituted base at the second position.
        second: (u8, u8),
    },
    /// One base inserted before the 0-based index `position`.
    DnaBulge {
        /// Insertion point, in `1..len`.
        position: usize,
        /// Inserted base.
        base: u8,
    },
    /// One base removed.
    RnaBulge {
        /// 1-based position of the removed base.
        position: usize,
        /// Removed base.
        base: u8,
    },
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            VariantKind::OneMismatch { position, from, to } => {
                write!(f, "1MM-{position}position-{}to{}", from as char, to as char)
            }
            VariantKind::TwoMismatch {
                positions: (i, j),
                first: (a, b),
                second: (c, d),
            } => write!(
                f,
                "2MM-({i},{j})positions-({}to{},{}to{})",
                a as char, b as char, c as char, d as char
            ),
            VariantKind::DnaBulge { position, base } => {
                write!(f, "DNA1bulge-{position}position-{}", base as char)
            }
            VariantKind::RnaBulge { position, base } => {
                write!(f, "RNA1bulge-{position}position-{}", base as char)
            }
        }
    }
}

/// A mutated segment and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Kind of mutation.
    pub kind: VariantKind,
    /// Mutated segment.
    pub sequence: Vec<u8>,
}

impl Variant {
    /// Label used in catalogue rows.
    pub fn label(&self) -> String {
        self.kind.to_string()
    }
}

fn substitutes(base: u8) -> impl Iterator<Item = u8> + Clone {
    NUCLEOTIDES.into_iter().filter(move |&candidate| candidate != base)
}

fn substituted(segment: &[u8], edits: &[(usize, u8)]) -> Vec<u8> {
    let mut sequence = segment.to_vec();
    for &(idx, base) in edits {
        sequence[idx] = base;
    }
    sequence
}

/// Every single-base substitution: `len × 3` variants.
pub fn one_mismatch(segment: &[u8]) -> impl Iterator<Item = Variant> + Clone + '_ {
    segment.iter().enumerate().flat_map(move |(idx, &from)| {
        substitutes(from).map(move |to| Variant {
            kind: VariantKind::OneMismatch {
                position: idx + 1,
                from,
                to,
            },
            sequence: substituted(segment, &[(idx, to)]),
        })
    })
}

/// Every double substitution at distinct positions: `C(len, 2) × 9` variants.
pub fn two_mismatch(
    segment: &[u8],
) -> Result<impl Iterator<Item = Variant> + Clone + '_, GeneratorError> {
    if segment.len() < 2 {
        return Err(GeneratorError::InvalidSegmentLength(segment.len()));
    }
    Ok((0..segment.len())
        .tuple_combinations::<(usize, usize)>()
        .flat_map(move |(i, j)| {
            let (a, c) = (segment[i], segment[j]);
            iproduct!(substitutes(a), substitutes(c)).map(move |(b, d)| Variant {
                kind: VariantKind::TwoMismatch {
                    positions: (i + 1, j + 1),
                    first: (a, b),
                    second: (c, d),
                },
                sequence: substituted(segment, &[(i, b), (j, d)]),
            })
        }))
}

/// One base inserted before each internal position: `(len - 1) × 4` variants.
pub fn add_one_bulge(segment: &[u8]) -> impl Iterator<Item = Variant> + Clone + '_ {
    (1..segment.len()).flat_map(move |position| {
        NUCLEOTIDES.into_iter().map(move |base| Variant {
            kind: VariantKind::DnaBulge { position, base },
            sequence: [&segment[..position], slice::from_ref(&base), &segment[position..]].concat(),
        })
    })
}

/// One base deleted at each position: `len` variants.
pub fn remove_one_bulge(segment: &[u8]) -> impl Iterator<Item = Variant> + Clone + '_ {
    segment.iter().enumerate().map(move |(idx, &base)| Variant {
        kind: VariantKind::RnaBulge {
            position: idx + 1,
            base,
        },
        sequence: [&segment[..idx], &segment[idx + 1..]].concat(),
    })
}

/// All four families in catalogue order: one mismatch, two mismatches, DNA
/// bulges, RNA bulges.
pub fn all_variants(
    segment: &[u8],
) -> Result<impl Iterator<Item = Variant> + Clone + '_, GeneratorError> {
    Ok(one_mismatch(segment)
        .chain(two_mismatch(segment)?)
        .chain(add_one_bulge(segment))
        .chain(remove_one_bulge(segment)))
}

/// True when `candidate_prefix` followed by `third_flank` with any base at its
/// first position occurs in the wild-type probe. Such a variant cannot be told
/// apart from the wild type downstream.
pub fn check_duplicate(wild_type: &[u8], candidate_prefix: &[u8], third_flank: &[u8]) -> bool {
    let tail = third_flank.get(1..).unwrap_or_default();
    NUCLEOTIDES.into_iter().any(|base| {
        let candidate = [candidate_prefix, slice::from_ref(&base), tail].concat();
        find_anchor(wild_type, &candidate).is_some()
    })
}
