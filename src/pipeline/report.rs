/*!
 * Translation report.
 *
 * Every pipeline run returns a report next to the output document:
 * span counts, the batches that failed permanently (their original text
 * is retained in the document), and any extraction warnings.
 */

use std::path::Path;

use serde::Serialize;

use crate::errors::AppError;

/// A batch that ended in `FailedPermanently`
#[derive(Debug, Clone, Serialize)]
pub struct FailedBatchReport {
    /// Position of the batch in dispatch order
    pub index: usize,
    /// Number of spans whose original text was retained
    pub span_count: usize,
    /// Attempts made before giving up
    pub attempts: u32,
    /// The error that exhausted the batch
    pub error: String,
    /// Original texts of the batch, kept for manual follow-up
    pub original_texts: Vec<String>,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Default)]
pub struct TranslationReport {
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Backend that served the run
    pub provider: String,
    /// Model that served the run
    pub model: String,

    /// Translatable spans found in the document
    pub spans_total: usize,
    /// Spans whose translation was written back
    pub spans_translated: usize,
    /// Whitespace-only runs never sent for translation
    pub spans_skipped: usize,
    /// Spans left untranslated because their batch failed
    pub spans_failed: usize,
    /// Translations dropped because their location no longer resolved
    pub spans_unresolved: usize,

    /// Batches dispatched
    pub batches_total: usize,
    /// Batches that failed permanently
    pub failed_batches: Vec<FailedBatchReport>,

    /// Extraction warnings (skipped unreachable runs)
    pub warnings: Vec<String>,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
    /// Completion timestamp
    pub completed_at: String,
}

impl TranslationReport {
    /// Whether every span made it through translation
    pub fn is_complete(&self) -> bool {
        self.spans_translated == self.spans_total
            && self.failed_batches.is_empty()
            && self.warnings.is_empty()
    }

    /// Human-readable one-screen summary for the log
    pub fn summary(&self) -> String {
        format!(
            "Translation Report:\n\
             Provider: {} ({})\n\
             Languages: {} -> {}\n\
             Spans translated: {}/{}\n\
             Spans skipped (whitespace): {}\n\
             Spans failed: {}\n\
             Batches: {} total, {} failed\n\
             Warnings: {}\n\
             Elapsed: {:.2}s",
            self.provider,
            self.model,
            self.source_language,
            self.target_language,
            self.spans_translated,
            self.spans_total,
            self.spans_skipped,
            self.spans_failed,
            self.batches_total,
            self.failed_batches.len(),
            self.warnings.len(),
            self.elapsed_ms as f64 / 1000.0
        )
    }

    /// Write the report as pretty JSON
    pub fn write_to_file(&self, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Unknown(format!("cannot serialize report: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| AppError::File(format!("cannot write report {}: {}", path.display(), e)))?;
        Ok(())
    }
}
