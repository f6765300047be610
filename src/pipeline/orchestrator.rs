/*!
 * Pipeline orchestration.
 *
 * Drives extract -> batch -> (per batch: backend call with retry) ->
 * reassemble over one document tree. Each batch moves through an
 * explicit state machine:
 *
 * `Pending -> InFlight -> { Succeeded, Retrying, FailedPermanently }`
 *
 * Rate limits and transient network failures re-enter `InFlight` with
 * exponential backoff up to a configured ceiling. A response whose
 * segment count does not match its batch is failed permanently without
 * retry. An authentication failure aborts the whole run before any
 * output is written. Failed batches keep their original text at
 * reassembly time and are listed in the report; a single batch failure
 * degrades the run to a partial translation instead of aborting it.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use log::{debug, error, info};
use tokio::sync::Semaphore;

use crate::document::model::{DocumentTree, RunPath};
use crate::errors::{AppError, ProviderError};
use crate::pipeline::batch::{Batch, Batcher};
use crate::pipeline::reassemble::Reassembler;
use crate::pipeline::report::{FailedBatchReport, TranslationReport};
use crate::pipeline::span::SpanExtractor;
use crate::providers::TranslationBackend;

/// Lifecycle state of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Not yet dispatched
    Pending,
    /// A request for this batch is on the wire
    InFlight,
    /// A retryable failure occurred; the batch will re-enter `InFlight`
    Retrying,
    /// Translations for this batch were accepted
    Succeeded,
    /// Retries are exhausted or the failure is not retryable
    FailedPermanently,
}

/// Progress event emitted to the (fire-and-forget) observer
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    /// Translatable spans in the document
    pub spans_total: usize,
    /// Spans whose batch has reached a terminal state
    pub spans_done: usize,
    /// Batch this event is about
    pub batch_index: usize,
    /// New state of that batch
    pub batch_state: BatchState,
}

/// Cooperative cancellation flag for an in-flight pipeline run.
///
/// Cancelling stops new batches from being dispatched; batches already
/// on the wire run to completion, after which the run returns
/// `AppError::Cancelled` and the document is left unmodified.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that has not been triggered
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Tunables for one pipeline run, read once from the configuration
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Character budget per batch
    pub max_chars_per_batch: usize,
    /// Bounded parallelism for backend calls
    pub max_concurrent_requests: usize,
    /// Retry ceiling for retryable failures
    pub retry_count: u32,
    /// Base backoff in milliseconds, doubled on each retry
    pub retry_backoff_ms: u64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_chars_per_batch: 1000,
            max_concurrent_requests: 4,
            retry_count: 3,
            retry_backoff_ms: 1000,
            timeout_secs: 30,
        }
    }
}

/// Result of one pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Run summary, returned alongside the mutated tree
    pub report: TranslationReport,
    /// Paths whose runs now carry translated text
    pub applied: Vec<RunPath>,
}

/// Terminal record of one dispatched batch
struct BatchOutcome {
    batch: Batch,
    state: BatchState,
    translations: Option<Vec<String>>,
    attempts: u32,
    error: Option<String>,
    fatal: Option<String>,
}

/// Sequences the pipeline over one document tree.
///
/// The tree is owned exclusively by the orchestrator for the duration of
/// a run: extraction only reads it, translation work never touches it,
/// and reassembly is the single write pass that runs strictly after
/// every batch has reached a terminal state.
pub struct Orchestrator {
    backend: Arc<dyn TranslationBackend>,
    options: PipelineOptions,
}

impl Orchestrator {
    /// Create an orchestrator around an injected backend
    pub fn new(backend: Arc<dyn TranslationBackend>, options: PipelineOptions) -> Self {
        Self { backend, options }
    }

    /// Translate every translatable span of the tree in place.
    ///
    /// On success the tree holds translated text wherever a batch
    /// succeeded and original text everywhere else, and the report
    /// accounts for every span. On a fatal error (authentication,
    /// cancellation) the tree is returned untouched.
    pub async fn translate_tree(
        &self,
        tree: &mut DocumentTree,
        source_language: &str,
        target_language: &str,
        progress: impl Fn(ProgressUpdate) + Send + Sync + 'static,
        cancel: &CancelToken,
    ) -> Result<PipelineOutcome, AppError> {
        let started = Instant::now();

        let extraction = SpanExtractor::extract(tree);
        let spans_total = extraction.spans.len();
        let spans_skipped = extraction.skipped;
        let warnings = extraction.warnings;

        let batches = Batcher::split(extraction.spans, self.options.max_chars_per_batch);
        let batches_total = batches.len();
        info!(
            "Translating {} spans in {} batches ({} -> {})",
            spans_total, batches_total, source_language, target_language
        );

        let progress: Arc<dyn Fn(ProgressUpdate) + Send + Sync> = Arc::new(progress);
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_requests.max(1)));
        let spans_done = Arc::new(AtomicUsize::new(0));
        let auth_failed = Arc::new(AtomicBool::new(false));

        let mut outcomes: Vec<BatchOutcome> = stream::iter(batches)
            .map(|batch| {
                let semaphore = Arc::clone(&semaphore);
                let spans_done = Arc::clone(&spans_done);
                let auth_failed = Arc::clone(&auth_failed);
                let progress = Arc::clone(&progress);
                let cancel = cancel.clone();
                let source_language = source_language.to_string();
                let target_language = target_language.to_string();

                async move {
                    let _permit = semaphore.acquire().await.expect("semaphore never closes");
                    if cancel.is_cancelled() || auth_failed.load(Ordering::SeqCst) {
                        return BatchOutcome {
                            batch,
                            state: BatchState::Pending,
                            translations: None,
                            attempts: 0,
                            error: None,
                            fatal: None,
                        };
                    }
                    self.run_batch(
                        batch,
                        &source_language,
                        &target_language,
                        spans_total,
                        &spans_done,
                        progress.as_ref(),
                        &auth_failed,
                    )
                    .await
                }
            })
            .buffer_unordered(self.options.max_concurrent_requests.max(1))
            .collect()
            .await;

        // restore dispatch order before the single write pass
        outcomes.sort_by_key(|outcome| outcome.batch.index);

        if let Some(message) = outcomes.iter().find_map(|o| o.fatal.clone()) {
            error!("Aborting run: {}", message);
            return Err(AppError::Provider(ProviderError::AuthenticationError(message)));
        }

        if cancel.is_cancelled() {
            info!("Run cancelled, discarding partial results");
            return Err(AppError::Cancelled);
        }

        let mut pairs: Vec<(RunPath, String)> = Vec::new();
        let mut spans_failed = 0usize;
        let mut failed_batches = Vec::new();

        for outcome in &outcomes {
            match (&outcome.state, &outcome.translations) {
                (BatchState::Succeeded, Some(translations)) => {
                    for (span, text) in outcome.batch.spans.iter().zip(translations.iter()) {
                        pairs.push((span.path.clone(), text.clone()));
                    }
                }
                _ => {
                    spans_failed += outcome.batch.spans.len();
                    failed_batches.push(FailedBatchReport {
                        index: outcome.batch.index,
                        span_count: outcome.batch.spans.len(),
                        attempts: outcome.attempts,
                        error: outcome
                            .error
                            .clone()
                            .unwrap_or_else(|| "batch was never dispatched".to_string()),
                        original_texts: outcome.batch.texts(),
                    });
                }
            }
        }

        let stats = Reassembler::apply(tree, pairs);

        let report = TranslationReport {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            provider: String::new(),
            model: String::new(),
            spans_total,
            spans_translated: stats.applied.len(),
            spans_skipped,
            spans_failed,
            spans_unresolved: stats.missed.len(),
            batches_total,
            failed_batches,
            warnings,
            elapsed_ms: started.elapsed().as_millis() as u64,
            completed_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        Ok(PipelineOutcome {
            report,
            applied: stats.applied,
        })
    }

    /// Run one batch through the state machine until a terminal state
    async fn run_batch(
        &self,
        batch: Batch,
        source_language: &str,
        target_language: &str,
        spans_total: usize,
        spans_done: &AtomicUsize,
        progress: &(dyn Fn(ProgressUpdate) + Send + Sync),
        auth_failed: &AtomicBool,
    ) -> BatchOutcome {
        let texts = batch.texts();
        let timeout = Duration::from_secs(self.options.timeout_secs);
        let mut attempt: u32 = 0;

        loop {
            progress(ProgressUpdate {
                spans_total,
                spans_done: spans_done.load(Ordering::SeqCst),
                batch_index: batch.index,
                batch_state: BatchState::InFlight,
            });

            let call = self
                .backend
                .translate(&texts, source_language, target_language);
            let result = match tokio::time::timeout(timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::ConnectionError(format!(
                    "request timed out after {}s",
                    self.options.timeout_secs
                ))),
            };

            let terminal = match result {
                Ok(translations) if translations.len() == texts.len() => BatchOutcome {
                    state: BatchState::Succeeded,
                    translations: Some(translations),
                    attempts: attempt + 1,
                    error: None,
                    fatal: None,
                    batch,
                },
                Ok(translations) => {
                    // never zip a mismatched response against the wrong spans
                    let error = ProviderError::InvalidResponse(format!(
                        "backend returned {} segments for a batch of {}",
                        translations.len(),
                        texts.len()
                    ));
                    error!("Batch {} failed: {}", batch.index, error);
                    BatchOutcome {
                        state: BatchState::FailedPermanently,
                        translations: None,
                        attempts: attempt + 1,
                        error: Some(error.to_string()),
                        fatal: None,
                        batch,
                    }
                }
                Err(e) if e.is_fatal() => {
                    auth_failed.store(true, Ordering::SeqCst);
                    BatchOutcome {
                        state: BatchState::FailedPermanently,
                        translations: None,
                        attempts: attempt + 1,
                        error: Some(e.to_string()),
                        fatal: Some(e.to_string()),
                        batch,
                    }
                }
                Err(e) if e.is_retryable() && attempt < self.options.retry_count => {
                    debug!(
                        "Batch {} attempt {}/{} failed ({}), backing off",
                        batch.index,
                        attempt + 1,
                        self.options.retry_count + 1,
                        e
                    );
                    progress(ProgressUpdate {
                        spans_total,
                        spans_done: spans_done.load(Ordering::SeqCst),
                        batch_index: batch.index,
                        batch_state: BatchState::Retrying,
                    });
                    let backoff = self.options.retry_backoff_ms.saturating_mul(1 << attempt);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => {
                    error!("Batch {} failed permanently: {}", batch.index, e);
                    BatchOutcome {
                        state: BatchState::FailedPermanently,
                        translations: None,
                        attempts: attempt + 1,
                        error: Some(e.to_string()),
                        fatal: None,
                        batch,
                    }
                }
            };

            let done = spans_done.fetch_add(terminal.batch.spans.len(), Ordering::SeqCst)
                + terminal.batch.spans.len();
            progress(ProgressUpdate {
                spans_total,
                spans_done: done,
                batch_index: terminal.batch.index,
                batch_state: terminal.state,
            });
            return terminal;
        }
    }
}
