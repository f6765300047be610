/*!
 * Span extraction.
 *
 * Walks a document tree in reading order and produces the flat, ordered
 * list of translatable spans. Whitespace-only runs are skipped so no
 * request budget is wasted on them and no translation artifacts land in
 * spacing-only runs; opaque nodes are never emitted.
 */

use log::warn;

use crate::document::model::{DocumentTree, RunPath};

/// A location key paired with the text to be translated
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// Stable path to the run inside the tree it was extracted from
    pub path: RunPath,
    /// Text content at extraction time
    pub text: String,
}

/// Result of walking one tree
#[derive(Debug, Default)]
pub struct Extraction {
    /// Translatable spans in reading order
    pub spans: Vec<Span>,
    /// Runs skipped because empty or whitespace-only
    pub skipped: usize,
    /// Non-fatal problems, surfaced in the final report
    pub warnings: Vec<String>,
}

/// Extracts translatable spans from a document tree
pub struct SpanExtractor;

impl SpanExtractor {
    /// Extract every non-empty run as a span, in reading order.
    ///
    /// Each produced path is resolved back against the tree before it is
    /// emitted; a run whose path does not resolve (a detached node) is
    /// skipped with a warning instead of poisoning reassembly.
    pub fn extract(tree: &DocumentTree) -> Extraction {
        let mut extraction = Extraction::default();

        let mut candidates = Vec::new();
        tree.visit_runs(&mut |path, run| {
            candidates.push((path, run.text.clone()));
        });

        for (path, text) in candidates {
            if text.trim().is_empty() {
                extraction.skipped += 1;
                continue;
            }
            match tree.resolve(&path) {
                Some(run) if run.text == text => {
                    extraction.spans.push(Span { path, text });
                }
                _ => {
                    let message = format!("run at {} is unreachable and was skipped", path);
                    warn!("{}", message);
                    extraction.warnings.push(message);
                }
            }
        }

        extraction
    }
}
