//! Edit-script window tests: the frameshift count test, the gap-position
//! test, and the removal filters for indels away from the window.

use crate::genomics::anchor::{clamped_window, AnchorError, TargetRegions};
use crate::genomics::classifier::ReadClassifier;
use crate::genomics::edit_ops::{edit_ops, EditOpKind};
use crate::genomics::{Bucket, ReferenceRecord, GAP};

/// Flags an indel when the read and reference windows differ by at least two
/// edit operations. A single substitution is not treated as a frameshift.
pub fn classify_window_v1(
    read: &[u8],
    reference: &[u8],
    anchor: &[u8],
    distance_from_end: usize,
    width: usize,
) -> Result<bool, AnchorError> {
    let regions = TargetRegions::locate(read, reference, anchor)?;
    let start = regions.window_start(distance_from_end);
    let read_window = clamped_window(regions.read, start, width);
    let reference_window = clamped_window(regions.reference, start, width);
    Ok(edit_ops(read_window, reference_window).len() >= 2)
}

/// Overwrite read-target positions removed by the reference→read edit script
/// with [`GAP`] and return the reassembled read. A deletion past the current
/// read end appends a gap instead, so a read that lost its tail grows back
/// towards the reference length.
pub fn mark_deletions(
    read: &[u8],
    reference: &[u8],
    anchor: &[u8],
) -> Result<Vec<u8>, AnchorError> {
    let regions = TargetRegions::locate(read, reference, anchor)?;
    let head_len = read.len() - regions.read.len();
    let mut marked = read.to_vec();

    for op in edit_ops(regions.reference, regions.read) {
        if op.kind != EditOpKind::Delete {
            continue;
        }
        match marked.get_mut(head_len + op.source_pos) {
            Some(base) => *base = GAP,
            None => marked.push(GAP),
        }
    }

    Ok(marked)
}

/// Flags an indel when an interior window position (index 1 or 2) of the
/// deletion-marked read holds a gap. Deletions on the window edges pass.
pub fn classify_window_v2(
    read: &[u8],
    reference: &[u8],
    anchor: &[u8],
    distance_from_end: usize,
    width: usize,
) -> Result<bool, AnchorError> {
    let marked = mark_deletions(read, reference, anchor)?;
    let regions = TargetRegions::locate(&marked, reference, anchor)?;
    let start = regions.window_start(distance_from_end);
    let window = clamped_window(regions.read, start, width);
    Ok([1, 2]
        .iter()
        .any(|&idx| window.get(idx).copied() == Some(GAP)))
}

/// Region-wide filter: any insertion or deletion anywhere in the post-anchor
/// target region.
pub fn should_be_removed(read: &[u8], reference: &[u8], anchor: &[u8]) -> Result<bool, AnchorError> {
    let regions = TargetRegions::locate(read, reference, anchor)?;
    Ok(edit_ops(regions.reference, regions.read)
        .iter()
        .any(|op| op.is_indel()))
}

/// Removal filter used by [`EditScriptClassifier`]: an insertion or deletion
/// whose reference-target position lies outside
/// `[start, start + width)`, with `start = len(reference target) - distance_from_end`.
pub fn has_indel_outside_window(
    read: &[u8],
    reference: &[u8],
    anchor: &[u8],
    distance_from_end: usize,
    width: usize,
) -> Result<bool, AnchorError> {
    let regions = TargetRegions::locate(read, reference, anchor)?;
    let start = regions.window_start(distance_from_end);
    let end = start.saturating_add(width);
    Ok(edit_ops(regions.reference, regions.read)
        .iter()
        .any(|op| op.is_indel() && !(start..end).contains(&op.source_pos)))
}

/// Window test used by [`EditScriptClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTest {
    /// At least two edits inside the window.
    EditCount,
    /// Deletion gap on an interior window position.
    GapPosition,
}

/// Classifier built on raw edit scripts. The anchor is `prefix + barcode`.
#[derive(Debug, Clone)]
pub struct EditScriptClassifier {
    test: WindowTest,
    anchor_prefix: Vec<u8>,
}

impl EditScriptClassifier {
    /// Create a classifier using the given window test and anchor prefix.
    pub fn new(test: WindowTest, anchor_prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            test,
            anchor_prefix: anchor_prefix.into(),
        }
    }

    fn anchor(&self, record: &ReferenceRecord) -> Vec<u8> {
        [self.anchor_prefix.as_slice(), record.barcode()].concat()
    }
}

impl ReadClassifier for EditScriptClassifier {
    fn name(&self) -> &'static str {
        match self.test {
            WindowTest::EditCount => "edit-count",
            WindowTest::GapPosition => "gap-position",
        }
    }

    fn classify(&self, record: &ReferenceRecord, read: &[u8]) -> Result<Bucket, AnchorError> {
        let anchor = self.anchor(record);
        let reference = record.reference();
        let window = record.window_spec();
        if has_indel_outside_window(
            read,
            reference,
            &anchor,
            window.distance_from_end,
            window.width,
        )? {
            return Ok(Bucket::Removed);
        }

        let is_indel = match self.test {
            WindowTest::EditCount => classify_window_v1(
                read,
                reference,
                &anchor,
                window.distance_from_end,
                window.width,
            )?,
            WindowTest::GapPosition => classify_window_v2(
                read,
                reference,
                &anchor,
                window.distance_from_end,
                window.width,
            )?,
        };

        Ok(if is_indel { Bucket::Indel } else { Bucket::Normal })
    }
}
