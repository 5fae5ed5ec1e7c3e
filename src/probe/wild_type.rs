use std::ops::Range;
use std::sync::Arc;

use thiserror::Error;

use crate::genomics::is_nucleotide_sequence;

/// Segment lengths of a wild-type probe: flank-5, target, flank-3a, flank-3b.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeLayout {
    /// Length of the 5' flank.
    pub flank5: usize,
    /// Length of the mutated target segment.
    pub target: usize,
    /// Length of the first 3' flank.
    pub flank3a: usize,
    /// Length of the second 3' flank.
    pub flank3b: usize,
}

impl Default for ProbeLayout {
    fn default() -> Self {
        Self {
            flank5: 4,
            target: 20,
            flank3a: 3,
            flank3b: 3,
        }
    }
}

impl ProbeLayout {
    /// Total probe length.
    pub fn total_len(&self) -> usize {
        self.flank5 + self.target + self.flank3a + self.flank3b
    }

    fn target_range(&self) -> Range<usize> {
        self.flank5..self.flank5 + self.target
    }

    fn flank3a_range(&self) -> Range<usize> {
        let start = self.flank5 + self.target;
        start..start + self.flank3a
    }

    fn flank3b_range(&self) -> Range<usize> {
        let start = self.flank5 + self.target + self.flank3a;
        start..start + self.flank3b
    }
}

/// Errors raised while constructing a wild-type probe.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// Probe length does not match the layout.
    #[error("probe {source_id} has {actual} bases, expected {expected}")]
    WrongLength {
        /// Source identifier of the probe.
        source_id: String,
        /// Length required by the layout.
        expected: usize,
        /// Length provided.
        actual: usize,
    },

    /// Probe contains a symbol outside A/C/G/T.
    #[error("probe {0} contains non-nucleotide symbols")]
    InvalidAlphabet(String),
}

/// Unmutated probe split into its four fixed segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildTypeProbe {
    source_id: Arc<str>,
    sequence: Vec<u8>,
    layout: ProbeLayout,
}

impl WildTypeProbe {
    /// Validate and construct a probe; the sequence is uppercased.
    pub fn new(
        source_id: impl Into<Arc<str>>,
        sequence: &[u8],
        layout: ProbeLayout,
    ) -> Result<Self, ProbeError> {
        let source_id = source_id.into();
        if !is_nucleotide_sequence(sequence) {
            return Err(ProbeError::InvalidAlphabet(source_id.to_string()));
        }
        if sequence.len() != layout.total_len() {
            return Err(ProbeError::WrongLength {
                source_id: source_id.to_string(),
                expected: layout.total_len(),
                actual: sequence.len(),
            });
        }
        Ok(Self {
            source_id,
            sequence: sequence.to_ascii_uppercase(),
            layout,
        })
    }

    /// Source identifier.
    pub fn source_id(&self) -> &Arc<str> {
        &self.source_id
    }

    /// Full wild-type sequence.
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Segment layout.
    pub fn layout(&self) -> ProbeLayout {
        self.layout
    }

    /// 5' flank.
    pub fn flank5(&self) -> &[u8] {
        &self.sequence[..self.layout.flank5]
    }

    /// Target segment subject to mutation.
    pub fn target(&self) -> &[u8] {
        &self.sequence[self.layout.target_range()]
    }

    /// First 3' flank.
    pub fn flank3a(&self) -> &[u8] {
        &self.sequence[self.layout.flank3a_range()]
    }

    /// Second 3' flank.
    pub fn flank3b(&self) -> &[u8] {
        &self.sequence[self.layout.flank3b_range()]
    }

    /// Full probe with the target segment replaced by `target`.
    pub fn with_target(&self, target: &[u8]) -> Vec<u8> {
        [self.flank5(), target, self.flank3a(), self.flank3b()].concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_fixed_segments() {
        let probe = WildTypeProbe::new(
            "p1",
            b"AAAATTTTTTTTTTTTTTTTTTTTCCCGGG",
            ProbeLayout::default(),
        )
        .unwrap();
        assert_eq!(probe.flank5(), b"AAAA");
        assert_eq!(probe.target(), b"TTTTTTTTTTTTTTTTTTTT");
        assert_eq!(probe.flank3a(), b"CCC");
        assert_eq!(probe.flank3b(), b"GGG");
        assert_eq!(probe.with_target(probe.target()), probe.sequence());
    }

    #[test]
    fn rejects_wrong_length_and_alphabet() {
        let short = WildTypeProbe::new("p1", b"ACGT", ProbeLayout::default()).unwrap_err();
        assert!(matches!(short, ProbeError::WrongLength { actual: 4, expected: 30, .. }));

        let invalid = WildTypeProbe::new(
            "p1",
            b"AAAANTTTTTTTTTTTTTTTTTTTCCCGGG",
            ProbeLayout::default(),
        )
        .unwrap_err();
        assert_eq!(invalid, ProbeError::InvalidAlphabet("p1".into()));
    }
}
