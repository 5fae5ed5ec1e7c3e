//! Substitution enumeration and indel detection over a wild sequence.

use thiserror::Error;

use crate::genomics::edit_ops::{opcodes, OpcodeKind};

/// Largest occurrence count whose subsets fit a 64-bit counter.
pub const MAX_SUBSTITUTION_SITES: usize = 63;

/// Errors raised while enumerating substitutions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplacementError {
    /// Too many occurrences of the source base to enumerate every subset.
    #[error("{occurrences} substitution sites exceed the limit of {MAX_SUBSTITUTION_SITES}")]
    TooManySites {
        /// Occurrences of the source base in the wild sequence.
        occurrences: usize,
    },
}

/// Every sequence obtained by replacing a non-empty subset of the `source`
/// occurrences in `wild` with `dest`.
///
/// Occurrence subsets are enumerated in binary-counter order, so the result
/// holds `2^k - 1` sequences for `k` occurrences. More than
/// [`MAX_SUBSTITUTION_SITES`] occurrences are rejected.
pub fn possible_substitutions(
    wild: &[u8],
    source: u8,
    dest: u8,
) -> Result<Vec<Vec<u8>>, ReplacementError> {
    let occurrences: Vec<usize> = wild
        .iter()
        .enumerate()
        .filter_map(|(idx, &base)| (base == source).then_some(idx))
        .collect();
    if occurrences.is_empty() || source == dest {
        return Ok(Vec::new());
    }
    if occurrences.len() > MAX_SUBSTITUTION_SITES {
        return Err(ReplacementError::TooManySites {
            occurrences: occurrences.len(),
        });
    }

    let subsets = 1u64 << occurrences.len();
    Ok((1..subsets)
        .map(|mask| {
            let mut candidate = wild.to_vec();
            for (bit, &idx) in occurrences.iter().enumerate() {
                if mask & (1u64 << bit) != 0 {
                    candidate[idx] = dest;
                }
            }
            candidate
        })
        .collect())
}

/// Whether turning `wild` into `target` needs an inserted or deleted block.
pub fn has_insertion_or_deletion(wild: &[u8], target: &[u8]) -> bool {
    opcodes(wild, target)
        .iter()
        .any(|block| matches!(block.kind, OpcodeKind::Insert | OpcodeKind::Delete))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_all_non_empty_subsets() {
        let mut produced = possible_substitutions(b"TACAG", b'A', b'G').unwrap();
        produced.sort();
        let mut expected = vec![b"TGCAG".to_vec(), b"TACGG".to_vec(), b"TGCGG".to_vec()];
        expected.sort();
        assert_eq!(produced, expected);
    }

    #[test]
    fn absent_source_yields_nothing() {
        assert!(possible_substitutions(b"TTCG", b'A', b'G').unwrap().is_empty());
    }

    #[test]
    fn sixty_four_sites_are_rejected() {
        let wild = vec![b'A'; 64];
        assert_eq!(
            possible_substitutions(&wild, b'A', b'G'),
            Err(ReplacementError::TooManySites { occurrences: 64 })
        );

        let mut short = vec![b'C'; 64];
        short[..10].fill(b'A');
        assert_eq!(possible_substitutions(&short, b'A', b'G').unwrap().len(), 1023);
    }

    #[test]
    fn detects_length_changing_edits_only() {
        assert!(has_insertion_or_deletion(b"TACAG", b"TACAAG"));
        assert!(has_insertion_or_deletion(b"TACAG", b"TACA"));
        assert!(!has_insertion_or_deletion(b"TACAG", b"TAGAG"));
        assert!(!has_insertion_or_deletion(b"TACAG", b"TACAG"));
    }
}
