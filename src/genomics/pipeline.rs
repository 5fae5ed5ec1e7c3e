use std::sync::Arc;

use tracing::{debug, info};

use crate::framework::{
    BlockContext, BlockProcessor, ChunkedEvaluator, EvaluatorConfig, FrameworkError,
};
use crate::genomics::classifier::ReadClassifier;
use crate::genomics::{FrequencyAccumulator, RecordReport, ReferenceRecord};

/// Reads of one source, classified against one reference record.
#[derive(Debug, Clone)]
pub struct ClassificationWorkload {
    /// Reference record the reads belong to.
    pub record: ReferenceRecord,
    /// Pre-filtered reads, uppercase ASCII.
    pub reads: Arc<[Vec<u8>]>,
}

impl ClassificationWorkload {
    /// Construct a workload from owned reads.
    pub fn new(record: ReferenceRecord, reads: Vec<Vec<u8>>) -> Self {
        Self {
            record,
            reads: Arc::from(reads.into_boxed_slice()),
        }
    }
}

struct ClassificationProcessor<'c> {
    classifier: &'c dyn ReadClassifier,
}

impl BlockProcessor for ClassificationProcessor<'_> {
    type Input = ClassificationWorkload;
    type BlockSummary = FrequencyAccumulator;
    type Output = RecordReport;

    fn empty_summary(&self, input: &Self::Input) -> Self::BlockSummary {
        FrequencyAccumulator::new(&input.record)
    }

    fn process_block(
        &self,
        input: &Self::Input,
        context: &BlockContext,
    ) -> Result<Self::BlockSummary, FrameworkError> {
        let mut accumulator = FrequencyAccumulator::new(&input.record);
        for read in &input.reads[context.range.clone()] {
            match self.classifier.classify(&input.record, read) {
                Ok(bucket) => accumulator.record(bucket, read),
                Err(err) => {
                    debug!(
                        source = %input.record.source_id(),
                        classifier = self.classifier.name(),
                        error = %err,
                        "read rejected"
                    );
                    accumulator.reject();
                }
            }
        }
        Ok(accumulator)
    }

    fn merge(
        &self,
        left: Self::BlockSummary,
        right: Self::BlockSummary,
    ) -> Result<Self::BlockSummary, FrameworkError> {
        Ok(left.merge(right))
    }

    fn finalize(
        &self,
        root: Self::BlockSummary,
        _input: &Self::Input,
    ) -> Result<Self::Output, FrameworkError> {
        Ok(root.finish())
    }
}

/// Classifies every read of a record and accumulates the frequency report.
pub struct RecordAnalyzer {
    classifier: Box<dyn ReadClassifier>,
    block_size: usize,
    parallel: bool,
}

impl std::fmt::Debug for RecordAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordAnalyzer")
            .field("classifier", &self.classifier.name())
            .field("block_size", &self.block_size)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl RecordAnalyzer {
    /// Create an analyzer around `classifier`, processing `block_size` reads per block.
    pub fn new(classifier: Box<dyn ReadClassifier>, block_size: usize) -> Self {
        Self {
            classifier,
            block_size,
            parallel: true,
        }
    }

    /// Enable or disable parallel block processing.
    pub fn with_parallelism(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Classifier in use.
    pub fn classifier(&self) -> &dyn ReadClassifier {
        self.classifier.as_ref()
    }

    /// Classify and accumulate one record's reads.
    pub fn analyze(&self, workload: &ClassificationWorkload) -> Result<RecordReport, FrameworkError> {
        let config = EvaluatorConfig::with_block_size(workload.reads.len(), self.block_size)?
            .with_parallelism(self.parallel);
        let processor = ClassificationProcessor {
            classifier: self.classifier.as_ref(),
        };
        let evaluation = ChunkedEvaluator::new(processor, config).evaluate(workload)?;
        let report = evaluation.output;

        info!(
            source = %report.source_id,
            classifier = self.classifier.name(),
            total = report.counts.total,
            normal = report.counts.normal,
            indel = report.counts.indel,
            removed = report.counts.removed,
            rejected = report.counts.rejected,
            "record classified"
        );
        Ok(report)
    }
}
