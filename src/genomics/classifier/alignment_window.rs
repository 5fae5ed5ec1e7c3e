use crate::genomics::anchor::{suffix_from_anchor, AnchorError};
use crate::genomics::classifier::ReadClassifier;
use crate::genomics::local_align::{LocalAligner, ScoringScheme};
use crate::genomics::{AlignedPair, Bucket, EditWindow, ReferenceRecord, GAP};

fn trim_gaps(sequence: &[u8]) -> &[u8] {
    let start = sequence
        .iter()
        .position(|&base| base != GAP)
        .unwrap_or(sequence.len());
    let end = sequence
        .iter()
        .rposition(|&base| base != GAP)
        .map_or(start, |idx| idx + 1);
    &sequence[start..end]
}

/// Walks `sequence`, advancing a coordinate on every non-gap symbol, and
/// reports whether a gap occurs at a coordinate outside `window`.
fn gap_outside_window(sequence: &[u8], window: EditWindow) -> bool {
    let mut position = 0usize;
    for &base in sequence {
        if base == GAP {
            if !window.contains(position) {
                return true;
            }
        } else {
            position += 1;
        }
    }
    false
}

fn anchored_read<'a>(aligned_read: &'a [u8], barcode: &[u8]) -> Result<&'a [u8], AnchorError> {
    suffix_from_anchor(aligned_read, barcode).ok_or_else(|| AnchorError::NotFound {
        anchor: String::from_utf8_lossy(barcode).into_owned(),
        role: "aligned read",
    })
}

/// Gap in the aligned reference (an insertion in the read) outside `window`.
///
/// Leading and trailing gap runs are overhang padding and are ignored; the
/// window is expressed in reference coordinates.
pub fn check_insertion(aligned_reference: &[u8], window: EditWindow) -> bool {
    gap_outside_window(trim_gaps(aligned_reference), window)
}

/// Gap in the aligned read (a deletion) outside `window`, scanning from the
/// barcode's first occurrence. The window is expressed in coordinates counted
/// from the first barcode base; trailing overhang padding is ignored.
pub fn check_deletion(
    aligned_read: &[u8],
    window: EditWindow,
    barcode: &[u8],
) -> Result<bool, AnchorError> {
    let anchored = anchored_read(aligned_read, barcode)?;
    Ok(gap_outside_window(trim_gaps(anchored), window))
}

/// Gap in the aligned read at any coordinate inside `[start, end]`.
pub fn check_indel(
    aligned_read: &[u8],
    window: EditWindow,
    barcode: &[u8],
) -> Result<bool, AnchorError> {
    let anchored = anchored_read(aligned_read, barcode)?;
    let mut position = 0usize;
    for &base in anchored {
        if position > window.end {
            break;
        }
        if base == GAP {
            if window.contains(position) {
                return Ok(true);
            }
        } else {
            position += 1;
        }
    }
    Ok(false)
}

/// Bucket for an already aligned pair, applying Removed > Indel > Normal.
pub fn classify_alignment(
    record: &ReferenceRecord,
    pair: &AlignedPair,
) -> Result<Bucket, AnchorError> {
    let barcode = record.barcode();
    let anchored_window = record.anchored_window();
    anchored_read(&pair.read, barcode)?;

    if check_insertion(&pair.reference, record.reference_window())
        || check_deletion(&pair.read, anchored_window, barcode)?
    {
        return Ok(Bucket::Removed);
    }
    if check_indel(&pair.read, anchored_window, barcode)? {
        return Ok(Bucket::Indel);
    }
    Ok(Bucket::Normal)
}

/// Classifier aligning each read against the full reference.
#[derive(Debug, Clone, Default)]
pub struct AlignmentClassifier {
    aligner: LocalAligner,
}

impl AlignmentClassifier {
    /// Create a classifier with the given scoring scheme.
    pub fn new(scoring: ScoringScheme) -> Self {
        Self {
            aligner: LocalAligner::new(scoring),
        }
    }

    /// Aligner used for each read.
    pub fn aligner(&self) -> &LocalAligner {
        &self.aligner
    }
}

impl ReadClassifier for AlignmentClassifier {
    fn name(&self) -> &'static str {
        "alignment"
    }

    fn classify(&self, record: &ReferenceRecord, read: &[u8]) -> Result<Bucket, AnchorError> {
        let pair = self.aligner.align(record.reference(), read);
        classify_alignment(record, &pair)
    }
}
