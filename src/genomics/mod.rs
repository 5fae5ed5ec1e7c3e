//! Read classification and nucleotide frequency accumulation.
//!
//! This module exposes the sequence primitives (anchor location, edit
//! scripts, local alignment) and the components built on them: the indel
//! classifiers, the frequency accumulator and the per-record pipeline.
//! Input parsing for reference and read files lives in [`io`].

pub mod anchor;
pub mod classifier;
pub mod edit_ops;
mod frequency;
pub mod io;
mod local_align;
mod pipeline;
pub mod replacement;
mod report;
mod types;

pub use anchor::{find_anchor, AnchorError, TargetRegions};
pub use classifier::{
    AlignmentClassifier, ClassifierMethod, EditScriptClassifier, ReadClassifier, WindowTest,
};
pub use edit_ops::{edit_distance, edit_ops, opcodes, EditOp, EditOpKind, Opcode, OpcodeKind};
pub use frequency::{
    accumulate, BucketCounts, FrequencyAccumulator, FrequencyTable, PositionCounts, RecordReport,
};
pub use local_align::{LocalAligner, ScoringScheme};
pub use pipeline::{ClassificationWorkload, RecordAnalyzer};
pub use report::{render_frequency_report, report_fingerprint, write_frequency_report};
pub use types::{
    base_index, is_nucleotide_sequence, AlignedPair, Bucket, EditWindow, RecordError,
    ReferenceRecord, WindowSpec, GAP, NUCLEOTIDES,
};
