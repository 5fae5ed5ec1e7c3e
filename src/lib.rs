//! # indelscan
//!
//! Indel screening for targeted amplicon reads and mismatch catalogues for
//! guide probes.
//!
//! ## Read classification
//!
//! Every reference record names a barcode and a reference sequence. Reads of
//! the record's source are located by barcode, checked for insertions or
//! deletions against the reference and sorted into three buckets:
//!
//! 1. **Removed**: indel evidence outside a small edit window near the end of
//!    the reference
//! 2. **Indel**: a gap inside the window
//! 3. **Normal**: no indel evidence; counted into a per-position nucleotide
//!    frequency table
//!
//! Reads are classified in blocks and the block summaries are merged with an
//! associative reduce, so the report does not depend on block size or on
//! parallel scheduling.
//!
//! ## Variant catalogues
//!
//! A 30-base wild-type probe is split into flank, target and flank segments;
//! the target is enumerated for one and two mismatches and single-base
//! bulges, and each variant is written back between the flanks.
//!
//! ## Usage Example
//!
//! ```ignore
//! use indelscan::{AnalysisConfig, ClassificationWorkload};
//! use indelscan::genomics::io::parse_reference_line;
//!
//! let config = AnalysisConfig::default();
//! let record = parse_reference_line(line, 1, config.window_spec())?;
//! let analyzer = config.analyzer()?;
//! let report = analyzer.analyze(&ClassificationWorkload::new(record, reads))?;
//! println!("{}", indelscan::render_frequency_report(&report)?);
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod framework; // Chunked block evaluation
pub mod genomics; // Read classification and frequency accumulation
pub mod probe; // Variant catalogue generation

pub use framework::{BlockProcessor, ChunkedEvaluator, EvaluatorConfig, FrameworkError};
pub use genomics::io::ParseError;
pub use genomics::replacement::ReplacementError;
pub use genomics::{
    render_frequency_report, report_fingerprint, write_frequency_report, AnchorError, Bucket,
    BucketCounts, ClassificationWorkload, ClassifierMethod, FrequencyTable, ReadClassifier,
    RecordAnalyzer, RecordError, RecordReport, ReferenceRecord, ScoringScheme, WindowSpec,
};
pub use probe::{CatalogueRow, GeneratorError, ProbeError, ProbeLayout, WildTypeProbe};

use thiserror::Error;

/// Analysis parameters, validated once before any record is processed.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Offset of the edit window start, counted back from the reference end.
    pub window_distance_from_end: usize,

    /// Number of positions covered by the edit window.
    pub window_width: usize,

    /// Local alignment scoring.
    pub scoring: ScoringScheme,

    /// Classification method.
    pub method: ClassifierMethod,

    /// Bases preceding the barcode in the anchor used by edit-script methods.
    pub anchor_prefix: Vec<u8>,

    /// Reads per evaluation block.
    pub block_size: usize,

    /// Process blocks on the rayon thread pool.
    pub parallel: bool,

    /// Segment layout of wild-type probes.
    pub probe_layout: ProbeLayout,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_distance_from_end: 11,
            window_width: WindowSpec::DEFAULT_WIDTH,
            scoring: ScoringScheme::default(),
            method: ClassifierMethod::default(),
            anchor_prefix: Vec::new(),
            block_size: 1024,
            parallel: true,
            probe_layout: ProbeLayout::default(),
        }
    }
}

impl AnalysisConfig {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width == 0 || self.window_distance_from_end < self.window_width {
            return Err(ConfigError::InvalidWindow {
                distance_from_end: self.window_distance_from_end,
                width: self.window_width,
            });
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        let scoring = &self.scoring;
        if scoring.match_score <= 0
            || scoring.gap_open > scoring.gap_extend
            || scoring.gap_extend > 0
        {
            return Err(ConfigError::InvalidScoring(*scoring));
        }
        if !genomics::is_nucleotide_sequence(&self.anchor_prefix) {
            return Err(ConfigError::InvalidAnchorPrefix(
                String::from_utf8_lossy(&self.anchor_prefix).into_owned(),
            ));
        }
        if self.probe_layout.target < 2 {
            return Err(ConfigError::InvalidProbeLayout(self.probe_layout));
        }
        Ok(())
    }

    /// Edit window placement for reference records.
    pub fn window_spec(&self) -> WindowSpec {
        WindowSpec {
            distance_from_end: self.window_distance_from_end,
            width: self.window_width,
        }
    }

    /// Validate and build the record analyzer for the configured method.
    pub fn analyzer(&self) -> Result<RecordAnalyzer, ConfigError> {
        self.validate()?;
        let classifier = self.method.build(self.scoring, &self.anchor_prefix);
        Ok(RecordAnalyzer::new(classifier, self.block_size).with_parallelism(self.parallel))
    }
}

/// Invalid analysis parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Window is empty or starts before its own width from the end.
    #[error("invalid edit window: distance {distance_from_end}, width {width}")]
    InvalidWindow {
        /// Configured distance from the end.
        distance_from_end: usize,
        /// Configured width.
        width: usize,
    },

    /// Block size must be positive.
    #[error("block size must be positive")]
    ZeroBlockSize,

    /// Scores cannot drive a local alignment.
    #[error("invalid scoring scheme: {0:?}")]
    InvalidScoring(ScoringScheme),

    /// Anchor prefix contains non-nucleotide symbols.
    #[error("anchor prefix {0:?} contains non-nucleotide symbols")]
    InvalidAnchorPrefix(String),

    /// Probe target segment too short to enumerate.
    #[error("probe layout {0:?} has a target shorter than two bases")]
    InvalidProbeLayout(ProbeLayout),
}

/// Errors surfaced by the library entry points.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Malformed input line.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Inconsistent reference record.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Anchor missing from a read or reference.
    #[error(transparent)]
    Anchor(#[from] AnchorError),

    /// Invalid wild-type probe.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Variant enumeration precondition failed.
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Substitution enumeration rejected its input.
    #[error(transparent)]
    Replacement(#[from] ReplacementError),

    /// Block evaluation failed.
    #[error(transparent)]
    Framework(#[from] FrameworkError),
}
