//! Anchor search and post-anchor target regions.

use thiserror::Error;

/// Errors raised when an anchor cannot be located.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnchorError {
    /// The anchor does not occur in the searched sequence.
    #[error("anchor '{anchor}' not found in {role} sequence")]
    NotFound {
        /// Anchor that was searched for.
        anchor: String,
        /// Which sequence was searched (read or reference).
        role: &'static str,
    },
}

impl AnchorError {
    fn not_found(anchor: &[u8], role: &'static str) -> Self {
        AnchorError::NotFound {
            anchor: String::from_utf8_lossy(anchor).into_owned(),
            role,
        }
    }
}

/// Offset of the first occurrence of `anchor` in `sequence`.
pub fn find_anchor(sequence: &[u8], anchor: &[u8]) -> Option<usize> {
    if anchor.is_empty() {
        return Some(0);
    }
    sequence
        .windows(anchor.len())
        .position(|window| window == anchor)
}

/// Suffix of `sequence` that follows the first occurrence of `anchor`.
pub fn suffix_after_anchor<'a>(sequence: &'a [u8], anchor: &[u8]) -> Option<&'a [u8]> {
    find_anchor(sequence, anchor).map(|offset| &sequence[offset + anchor.len()..])
}

/// Suffix of `sequence` starting at the first occurrence of `anchor`.
pub fn suffix_from_anchor<'a>(sequence: &'a [u8], anchor: &[u8]) -> Option<&'a [u8]> {
    find_anchor(sequence, anchor).map(|offset| &sequence[offset..])
}

/// Post-anchor target regions of a read and its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRegions<'a> {
    /// Read suffix after the anchor.
    pub read: &'a [u8],
    /// Reference suffix after the anchor.
    pub reference: &'a [u8],
}

impl<'a> TargetRegions<'a> {
    /// Locate `anchor` in both sequences and return the suffixes that follow it.
    pub fn locate(read: &'a [u8], reference: &'a [u8], anchor: &[u8]) -> Result<Self, AnchorError> {
        let read_target =
            suffix_after_anchor(read, anchor).ok_or_else(|| AnchorError::not_found(anchor, "read"))?;
        let reference_target = suffix_after_anchor(reference, anchor)
            .ok_or_else(|| AnchorError::not_found(anchor, "reference"))?;
        Ok(Self {
            read: read_target,
            reference: reference_target,
        })
    }

    /// Offset of the edit window inside the reference target.
    pub fn window_start(&self, distance_from_end: usize) -> usize {
        self.reference.len().saturating_sub(distance_from_end)
    }
}

/// Slice `sequence[start..start + width]`, clamped to the sequence bounds.
pub fn clamped_window(sequence: &[u8], start: usize, width: usize) -> &[u8] {
    let start = start.min(sequence.len());
    let end = start.saturating_add(width).min(sequence.len());
    &sequence[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_occurrence() {
        assert_eq!(find_anchor(b"AACGTACGT", b"ACGT"), Some(1));
        assert_eq!(find_anchor(b"AAAA", b"C"), None);
        assert_eq!(find_anchor(b"AC", b"ACGT"), None);
        assert_eq!(find_anchor(b"AC", b""), Some(0));
    }

    #[test]
    fn target_regions_follow_anchor() {
        let regions = TargetRegions::locate(b"GGTTTGACGT", b"TTTGACCA", b"TTTG").unwrap();
        assert_eq!(regions.read, b"ACGT");
        assert_eq!(regions.reference, b"ACCA");
        assert_eq!(regions.window_start(3), 1);
    }

    #[test]
    fn missing_anchor_is_reported_per_role() {
        let err = TargetRegions::locate(b"ACGT", b"TTTGACGT", b"TTTG").unwrap_err();
        assert_eq!(
            err,
            AnchorError::NotFound {
                anchor: "TTTG".into(),
                role: "read"
            }
        );
    }

    #[test]
    fn window_slices_are_clamped() {
        assert_eq!(clamped_window(b"ACGTAC", 4, 4), b"AC");
        assert_eq!(clamped_window(b"ACGT", 9, 4), b"");
        assert_eq!(clamped_window(b"ACGTAC", 1, 4), b"CGTA");
    }
}
