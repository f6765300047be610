/*!
 * Format-preserving translation pipeline.
 *
 * The pipeline walks a parsed document tree, isolates translatable text
 * spans, batches them under a request budget, sends each batch through
 * the injected translation backend, and writes the results back into
 * their original structural positions. It is split into:
 *
 * - `span`: span extraction from the document tree
 * - `batch`: budget-respecting, order-preserving batching
 * - `reassemble`: writing translated text back through run paths
 * - `orchestrator`: per-batch state machine, retries, concurrency, progress
 * - `report`: the translation report returned with every run
 */

// Re-export main types for easier usage
pub use self::batch::{Batch, Batcher};
pub use self::orchestrator::{
    BatchState, CancelToken, Orchestrator, PipelineOptions, PipelineOutcome, ProgressUpdate,
};
pub use self::report::{FailedBatchReport, TranslationReport};
pub use self::span::{Span, SpanExtractor};

// Submodules
pub mod batch;
pub mod orchestrator;
pub mod reassemble;
pub mod report;
pub mod span;
