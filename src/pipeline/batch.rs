/*!
 * Batching of extracted spans.
 *
 * Spans are packed greedily, in extraction order, until adding the next
 * span would exceed the character budget. A span that is larger than the
 * budget on its own becomes a singleton batch; truncating it would
 * corrupt the document. Greedy maximal packing is used instead of
 * bin-packing because read order must survive and the backend benefits
 * from surrounding context, not from a minimal batch count.
 */

use log::debug;

use crate::pipeline::span::Span;

/// Floor for the configured budget, guarding degenerate configurations
const MIN_CHARS_PER_BATCH: usize = 100;

/// An ordered group of spans submitted together to the backend
#[derive(Debug, Clone)]
pub struct Batch {
    /// Position of this batch in dispatch order
    pub index: usize,
    /// Spans in extraction order
    pub spans: Vec<Span>,
}

impl Batch {
    /// Combined text length of the batch in characters
    pub fn char_len(&self) -> usize {
        self.spans.iter().map(|span| span.text.chars().count()).sum()
    }

    /// The texts of this batch, in order
    pub fn texts(&self) -> Vec<String> {
        self.spans.iter().map(|span| span.text.clone()).collect()
    }
}

/// Partitions ordered spans into request-sized batches
pub struct Batcher;

impl Batcher {
    /// Split spans into batches under `max_chars` per batch.
    ///
    /// Partition order is extraction order; no span is dropped, reordered,
    /// or truncated.
    pub fn split(spans: Vec<Span>, max_chars: usize) -> Vec<Batch> {
        if spans.is_empty() {
            return Vec::new();
        }

        let budget = max_chars.max(MIN_CHARS_PER_BATCH);
        let total = spans.len();

        let mut batches: Vec<Batch> = Vec::new();
        let mut current: Vec<Span> = Vec::new();
        let mut current_size = 0usize;

        let push_batch = |spans: Vec<Span>, batches: &mut Vec<Batch>| {
            let index = batches.len();
            batches.push(Batch { index, spans });
        };

        for span in spans {
            let span_size = span.text.chars().count();

            if span_size > budget {
                // oversized span gets its own batch, never truncated
                if !current.is_empty() {
                    push_batch(std::mem::take(&mut current), &mut batches);
                    current_size = 0;
                }
                debug!(
                    "Span at {} is oversized ({} chars), placing in its own batch",
                    span.path, span_size
                );
                push_batch(vec![span], &mut batches);
                continue;
            }

            if current_size + span_size > budget && !current.is_empty() {
                push_batch(std::mem::take(&mut current), &mut batches);
                current_size = 0;
            }

            current_size += span_size;
            current.push(span);
        }

        if !current.is_empty() {
            push_batch(current, &mut batches);
        }

        let packed: usize = batches.iter().map(|batch| batch.spans.len()).sum();
        debug_assert_eq!(packed, total, "batching must not lose spans");

        batches
    }
}
