//! Generic chunked evaluation framework.
//!
//! Splits a workload into fixed-size blocks, processes each block into a
//! mergeable summary, and reduces the summaries with an associative merge.

mod chunked_eval;

pub use chunked_eval::{
    BlockContext, BlockProcessor, ChunkedEvaluator, EvaluationResult, EvaluatorConfig,
    FrameworkError,
};
