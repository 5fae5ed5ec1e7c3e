use std::ops::Range;

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while using the chunked evaluator.
#[derive(Debug, Error)]
pub enum FrameworkError {
    /// Configuration invalid (e.g., zero block size).
    #[error("invalid evaluator configuration: {0}")]
    InvalidConfiguration(String),

    /// Requested block index is out of range for the configured number of blocks.
    #[error("block id {block_id} out of range (max {max_blocks})")]
    BlockOutOfRange {
        /// Block identifier (1-indexed) that was requested.
        block_id: usize,
        /// Maximum valid block identifier.
        max_blocks: usize,
    },
}

/// Configuration parameters for chunked evaluation.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Units (reads) per block.
    pub block_size: usize,
    /// Number of blocks `⌈n / b⌉`; zero for empty input.
    pub num_blocks: usize,
    /// Total number of logical units.
    pub total_units: usize,
    /// Process blocks on the rayon thread pool.
    pub parallel: bool,
}

impl EvaluatorConfig {
    /// Construct configuration with explicit block size.
    pub fn with_block_size(
        total_units: usize,
        block_size: usize,
    ) -> Result<Self, FrameworkError> {
        if block_size == 0 {
            return Err(FrameworkError::InvalidConfiguration(
                "block size must be > 0".to_string(),
            ));
        }
        let num_blocks = total_units.div_ceil(block_size);
        Ok(Self {
            block_size,
            num_blocks,
            total_units,
            parallel: true,
        })
    }

    /// Enable or disable parallel block processing.
    pub fn with_parallelism(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Compute block context (start/end indices) for a given block id (1-indexed).
    pub fn block_context(&self, block_id: usize) -> Result<BlockContext, FrameworkError> {
        if block_id == 0 || block_id > self.num_blocks {
            return Err(FrameworkError::BlockOutOfRange {
                block_id,
                max_blocks: self.num_blocks,
            });
        }
        let start = (block_id - 1) * self.block_size;
        let end = (start + self.block_size).min(self.total_units);
        Ok(BlockContext {
            block_id,
            range: start..end,
        })
    }
}

/// Per-block metadata supplied to processors.
#[derive(Debug, Clone)]
pub struct BlockContext {
    /// 1-indexed block identifier.
    pub block_id: usize,
    /// Range within the logical input covered by the block.
    pub range: Range<usize>,
}

impl BlockContext {
    /// Number of logical units covered by this block.
    pub fn len(&self) -> usize {
        self.range.end.saturating_sub(self.range.start)
    }

    /// Whether the block covers no units.
    pub fn is_empty(&self) -> bool {
        self.range.end <= self.range.start
    }
}

/// Trait implemented by domain-specific processors that operate on blocks.
pub trait BlockProcessor: Sync {
    /// Type describing the full input workload.
    type Input: Sync;
    /// Summary emitted per block (must be mergeable).
    type BlockSummary: Send;
    /// Final output type produced after evaluation.
    type Output;

    /// Summary for an empty stretch of input; identity for [`Self::merge`].
    fn empty_summary(&self, input: &Self::Input) -> Self::BlockSummary;

    /// Process a single block.
    fn process_block(
        &self,
        input: &Self::Input,
        context: &BlockContext,
    ) -> Result<Self::BlockSummary, FrameworkError>;

    /// Merge summaries from adjacent blocks (associative).
    fn merge(
        &self,
        left: Self::BlockSummary,
        right: Self::BlockSummary,
    ) -> Result<Self::BlockSummary, FrameworkError>;

    /// Finalize result from the fully merged summary.
    fn finalize(
        &self,
        root: Self::BlockSummary,
        input: &Self::Input,
    ) -> Result<Self::Output, FrameworkError>;
}

/// Result returned by the chunked evaluator.
#[derive(Debug)]
pub struct EvaluationResult<O> {
    /// Final output synthesized from the merged summary.
    pub output: O,
    /// Number of blocks that were processed.
    pub blocks_processed: usize,
}

/// Evaluator that splits the input into blocks, processes them independently
/// and reduces the summaries in block order.
#[derive(Debug)]
pub struct ChunkedEvaluator<P: BlockProcessor> {
    processor: P,
    config: EvaluatorConfig,
}

impl<P: BlockProcessor> ChunkedEvaluator<P> {
    /// Create a new evaluator with the provided processor and configuration.
    pub fn new(processor: P, config: EvaluatorConfig) -> Self {
        Self { processor, config }
    }

    /// Access configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Access the processor.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Execute evaluation using the block processor and return the final output.
    pub fn evaluate(&self, input: &P::Input) -> Result<EvaluationResult<P::Output>, FrameworkError> {
        let processor = &self.processor;
        let config = &self.config;

        let run_block = |block_id: usize| -> Result<P::BlockSummary, FrameworkError> {
            let context = config.block_context(block_id)?;
            processor.process_block(input, &context)
        };

        let root = if config.parallel {
            (1..=config.num_blocks)
                .into_par_iter()
                .map(run_block)
                .try_reduce(
                    || processor.empty_summary(input),
                    |left, right| processor.merge(left, right),
                )?
        } else {
            (1..=config.num_blocks).try_fold(processor.empty_summary(input), |acc, block_id| {
                processor.merge(acc, run_block(block_id)?)
            })?
        };

        debug!(
            blocks = config.num_blocks,
            units = config.total_units,
            parallel = config.parallel,
            "chunked evaluation complete"
        );

        Ok(EvaluationResult {
            output: processor.finalize(root, input)?,
            blocks_processed: config.num_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SumProcessor;

    impl BlockProcessor for SumProcessor {
        type Input = Vec<u64>;
        type BlockSummary = Vec<u64>;
        type Output = (u64, Vec<u64>);

        fn empty_summary(&self, _input: &Self::Input) -> Self::BlockSummary {
            Vec::new()
        }

        fn process_block(
            &self,
            input: &Self::Input,
            context: &BlockContext,
        ) -> Result<Self::BlockSummary, FrameworkError> {
            Ok(input[context.range.clone()].to_vec())
        }

        fn merge(
            &self,
            mut left: Self::BlockSummary,
            right: Self::BlockSummary,
        ) -> Result<Self::BlockSummary, FrameworkError> {
            left.extend(right);
            Ok(left)
        }

        fn finalize(
            &self,
            root: Self::BlockSummary,
            _input: &Self::Input,
        ) -> Result<Self::Output, FrameworkError> {
            Ok((root.iter().sum(), root))
        }
    }

    #[test]
    fn block_contexts_cover_input() {
        let config = EvaluatorConfig::with_block_size(10, 4).unwrap();
        assert_eq!(config.num_blocks, 3);
        assert_eq!(config.block_context(3).unwrap().range, 8..10);
        assert!(config.block_context(0).is_err());
        assert!(config.block_context(4).is_err());
    }

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(EvaluatorConfig::with_block_size(10, 0).is_err());
    }

    #[test]
    fn parallel_reduce_preserves_block_order() {
        let input: Vec<u64> = (0..1000).collect();
        for parallel in [true, false] {
            let config = EvaluatorConfig::with_block_size(input.len(), 7)
                .unwrap()
                .with_parallelism(parallel);
            let result = ChunkedEvaluator::new(SumProcessor, config)
                .evaluate(&input)
                .unwrap();
            assert_eq!(result.output.0, 499_500);
            assert_eq!(result.output.1, input);
            assert_eq!(result.blocks_processed, 143);
        }
    }

    #[test]
    fn empty_input_finalizes_identity() {
        let config = EvaluatorConfig::with_block_size(0, 16).unwrap();
        let result = ChunkedEvaluator::new(SumProcessor, config)
            .evaluate(&Vec::new())
            .unwrap();
        assert_eq!(result.output, (0, Vec::new()));
        assert_eq!(result.blocks_processed, 0);
    }
}
