//! Read classifiers assigning each read to exactly one [`Bucket`].
//!
//! Two families are provided:
//!
//! - [`EditScriptClassifier`]: post-anchor edit scripts, with the region-wide
//!   removal filter followed by either the edit-count or the gap-position
//!   window test.
//! - [`AlignmentClassifier`]: local alignment of the full reference against
//!   the read, followed by gap walks relative to the edit window.
//!
//! Every variant fails fast with [`AnchorError`] when the anchor is absent.

mod alignment_window;
mod edit_window;

pub use alignment_window::{
    check_deletion, check_indel, check_insertion, classify_alignment, AlignmentClassifier,
};
pub use edit_window::{
    classify_window_v1, classify_window_v2, has_indel_outside_window, mark_deletions,
    should_be_removed, EditScriptClassifier, WindowTest,
};

use crate::genomics::anchor::AnchorError;
use crate::genomics::{Bucket, ReferenceRecord};

/// Assigns a bucket to a read relative to a reference record.
pub trait ReadClassifier: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Classify a single read. Pure: identical inputs give identical buckets.
    fn classify(&self, record: &ReferenceRecord, read: &[u8]) -> Result<Bucket, AnchorError>;
}

/// Selectable classification method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierMethod {
    /// Local alignment with gap walks.
    #[default]
    Alignment,
    /// Edit scripts with the two-edit window test.
    EditCount,
    /// Edit scripts with the interior-gap window test.
    GapPosition,
}

impl ClassifierMethod {
    /// Build the classifier for this method.
    pub fn build(
        self,
        scoring: crate::genomics::ScoringScheme,
        anchor_prefix: &[u8],
    ) -> Box<dyn ReadClassifier> {
        match self {
            ClassifierMethod::Alignment => Box::new(AlignmentClassifier::new(scoring)),
            ClassifierMethod::EditCount => {
                Box::new(EditScriptClassifier::new(WindowTest::EditCount, anchor_prefix))
            }
            ClassifierMethod::GapPosition => {
                Box::new(EditScriptClassifier::new(WindowTest::GapPosition, anchor_prefix))
            }
        }
    }
}
