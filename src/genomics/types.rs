use std::sync::Arc;

use thiserror::Error;

use crate::genomics::anchor::find_anchor;

/// Alignment gap marker.
pub const GAP: u8 = b'-';

/// Canonical nucleotide alphabet, in frequency-table row order.
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Row index of a nucleotide in [`NUCLEOTIDES`].
pub fn base_index(base: u8) -> Option<usize> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Returns `true` when every byte is an uppercase or lowercase A/C/G/T.
pub fn is_nucleotide_sequence(sequence: &[u8]) -> bool {
    sequence.iter().all(|&base| base_index(base).is_some())
}

/// Outcome of classifying a single read against a reference record.
///
/// Precedence is fixed: `Removed` wins over `Indel`, which wins over `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Bucket {
    /// Indel evidence outside the tolerated edit window.
    Removed,
    /// Gap inside the edit window.
    Indel,
    /// No indel evidence; contributes to the frequency table.
    Normal,
}

/// Placement of the edit window relative to the end of the post-barcode region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    /// Offset of the window start, counted backward from the end of the reference.
    pub distance_from_end: usize,
    /// Number of positions covered by the window.
    pub width: usize,
}

impl WindowSpec {
    /// Window width used throughout the analysis.
    pub const DEFAULT_WIDTH: usize = 4;

    /// Build a window of the default width.
    pub fn new(distance_from_end: usize) -> Self {
        Self {
            distance_from_end,
            width: Self::DEFAULT_WIDTH,
        }
    }
}

/// Inclusive coordinate span `[start, end]` in which gaps are tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditWindow {
    /// First covered coordinate.
    pub start: usize,
    /// Last covered coordinate (inclusive).
    pub end: usize,
}

impl EditWindow {
    /// Window starting at `start` and covering `width` positions.
    pub fn from_start(start: usize, width: usize) -> Self {
        Self {
            start,
            end: start + width.saturating_sub(1),
        }
    }

    /// Whether `position` falls inside the window.
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Errors raised while building a reference record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The barcode is empty.
    #[error("empty barcode for source {0}")]
    EmptyBarcode(String),

    /// The barcode does not occur in the reference sequence.
    #[error("barcode {barcode} not present in reference for source {source_id}")]
    BarcodeNotInReference {
        /// Source identifier of the offending record.
        source_id: String,
        /// Barcode that could not be located.
        barcode: String,
    },

    /// The edit window does not fit inside the post-barcode region.
    #[error(
        "edit window (distance {distance_from_end}, width {width}) does not fit a {target_len}-base target"
    )]
    WindowOutOfBounds {
        /// Requested distance from the end of the reference.
        distance_from_end: usize,
        /// Requested window width.
        width: usize,
        /// Length of the post-barcode region.
        target_len: usize,
    },
}

/// One reference sequence per (source, barcode), immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    source_id: Arc<str>,
    barcode: Arc<[u8]>,
    reference: Arc<[u8]>,
    barcode_offset: usize,
    window: WindowSpec,
}

impl ReferenceRecord {
    /// Validate and construct a record. Sequences are expected uppercase.
    pub fn new(
        source_id: impl Into<Arc<str>>,
        barcode: impl Into<Arc<[u8]>>,
        reference: impl Into<Arc<[u8]>>,
        window: WindowSpec,
    ) -> Result<Self, RecordError> {
        let source_id = source_id.into();
        let barcode = barcode.into();
        let reference = reference.into();

        if barcode.is_empty() {
            return Err(RecordError::EmptyBarcode(source_id.to_string()));
        }

        let barcode_offset = find_anchor(&reference, &barcode).ok_or_else(|| {
            RecordError::BarcodeNotInReference {
                source_id: source_id.to_string(),
                barcode: String::from_utf8_lossy(&barcode).into_owned(),
            }
        })?;

        let target_len = reference.len() - barcode_offset - barcode.len();
        if window.width == 0
            || window.distance_from_end < window.width
            || window.distance_from_end > target_len
        {
            return Err(RecordError::WindowOutOfBounds {
                distance_from_end: window.distance_from_end,
                width: window.width,
                target_len,
            });
        }

        Ok(Self {
            source_id,
            barcode,
            reference,
            barcode_offset,
            window,
        })
    }

    /// Identifier of the read source this record belongs to.
    pub fn source_id(&self) -> &Arc<str> {
        &self.source_id
    }

    /// Barcode sequence.
    pub fn barcode(&self) -> &[u8] {
        &self.barcode
    }

    /// Full reference sequence.
    pub fn reference(&self) -> &[u8] {
        &self.reference
    }

    /// Offset of the barcode's first occurrence in the reference.
    pub fn barcode_offset(&self) -> usize {
        self.barcode_offset
    }

    /// Window placement this record was built with.
    pub fn window_spec(&self) -> WindowSpec {
        self.window
    }

    /// Post-barcode region of the reference.
    pub fn target(&self) -> &[u8] {
        &self.reference[self.barcode_offset + self.barcode.len()..]
    }

    /// Edit window in absolute reference coordinates.
    pub fn reference_window(&self) -> EditWindow {
        EditWindow::from_start(
            self.reference.len() - self.window.distance_from_end,
            self.window.width,
        )
    }

    /// Edit window in coordinates counted from the barcode's first base.
    pub fn anchored_window(&self) -> EditWindow {
        let anchored_len = self.reference.len() - self.barcode_offset;
        EditWindow::from_start(
            anchored_len - self.window.distance_from_end,
            self.window.width,
        )
    }

    /// Number of positions in the frequency table.
    pub fn counted_len(&self) -> usize {
        self.reference.len() - self.barcode.len()
    }

    /// Reference bases aligned with the counted substring of a read.
    pub fn counted_reference(&self) -> &[u8] {
        let end = (self.barcode_offset + self.counted_len()).min(self.reference.len());
        &self.reference[self.barcode_offset..end]
    }

    /// Substring of `read` that feeds the frequency table, starting at the
    /// barcode's first occurrence. Shorter than [`Self::counted_len`] when the
    /// read ends early; `None` when the barcode is absent.
    pub fn counted_slice<'a>(&self, read: &'a [u8]) -> Option<&'a [u8]> {
        let start = find_anchor(read, &self.barcode)?;
        let end = (start + self.counted_len()).min(read.len());
        Some(&read[start..end])
    }
}

/// Gap-annotated local alignment of a reference against a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    /// Reference with gap markers; same length as `read`.
    pub reference: Vec<u8>,
    /// Read with gap markers; same length as `reference`.
    pub read: Vec<u8>,
    /// Score of the best local alignment.
    pub score: i32,
}

impl AlignedPair {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    /// Whether the alignment has no columns.
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARCODE: &[u8] = b"GTGCACACACATATA";
    const TARGET: &[u8] = b"ACTGGAACACAAAGCATAGACTGCGGGGCG";

    fn reference() -> Vec<u8> {
        [BARCODE, TARGET].concat()
    }

    #[test]
    fn windows_are_measured_from_reference_end() {
        let record =
            ReferenceRecord::new("s1", BARCODE.to_vec(), reference(), WindowSpec::new(11)).unwrap();
        assert_eq!(record.target(), TARGET);
        assert_eq!(record.reference_window(), EditWindow { start: 34, end: 37 });
        assert_eq!(record.anchored_window(), EditWindow { start: 34, end: 37 });
        assert_eq!(record.counted_len(), TARGET.len());
    }

    #[test]
    fn anchored_window_follows_barcode_offset() {
        let reference = [b"TTTG".as_slice(), BARCODE, TARGET].concat();
        let record =
            ReferenceRecord::new("s1", BARCODE.to_vec(), reference, WindowSpec::new(11)).unwrap();
        assert_eq!(record.barcode_offset(), 4);
        assert_eq!(record.reference_window().start, 38);
        assert_eq!(record.anchored_window().start, 34);
        assert_eq!(record.counted_reference().len(), record.counted_len());
    }

    #[test]
    fn rejects_window_outside_target() {
        let err = ReferenceRecord::new("s1", BARCODE.to_vec(), reference(), WindowSpec::new(31))
            .unwrap_err();
        assert!(matches!(err, RecordError::WindowOutOfBounds { target_len: 30, .. }));

        let err = ReferenceRecord::new("s1", BARCODE.to_vec(), reference(), WindowSpec::new(3))
            .unwrap_err();
        assert!(matches!(err, RecordError::WindowOutOfBounds { .. }));
    }

    #[test]
    fn rejects_missing_barcode() {
        let err = ReferenceRecord::new("s1", b"CCCCCC".to_vec(), reference(), WindowSpec::new(11))
            .unwrap_err();
        assert!(matches!(err, RecordError::BarcodeNotInReference { .. }));
    }

    #[test]
    fn counted_slice_is_clamped_to_read() {
        let record =
            ReferenceRecord::new("s1", BARCODE.to_vec(), reference(), WindowSpec::new(11)).unwrap();
        let read = [b"AAAA".as_slice(), BARCODE, b"ACTG"].concat();
        let counted = record.counted_slice(&read).unwrap();
        assert_eq!(counted.len(), BARCODE.len() + 4);
        assert!(record.counted_slice(TARGET).is_none());
    }
}
