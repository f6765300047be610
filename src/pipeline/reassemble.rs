/*!
 * Reassembly of translated text into the document tree.
 *
 * The reassembler is the only component that writes to the tree. It
 * replaces the text of existing runs through their extraction-time
 * paths; it never adds, removes, or splits a run, so the structural
 * shape of the document is invariant under reassembly.
 */

use log::warn;

use crate::document::model::{DocumentTree, RunPath};

/// Result of one reassembly pass
#[derive(Debug, Default)]
pub struct ReassemblyStats {
    /// Paths whose runs were updated
    pub applied: Vec<RunPath>,
    /// Paths that no longer resolved; their original text was retained
    pub missed: Vec<RunPath>,
}

/// Writes translated strings back through their run paths
pub struct Reassembler;

impl Reassembler {
    /// Apply `(path, translated text)` pairs to the tree.
    ///
    /// A path that fails to resolve is recorded and skipped; the run it
    /// pointed to keeps its original text, which degrades the output to
    /// a partial translation instead of corrupting it.
    pub fn apply(
        tree: &mut DocumentTree,
        translations: impl IntoIterator<Item = (RunPath, String)>,
    ) -> ReassemblyStats {
        let mut stats = ReassemblyStats::default();

        for (path, text) in translations {
            match tree.resolve_mut(&path) {
                Some(run) => {
                    run.text = text;
                    stats.applied.push(path);
                }
                None => {
                    warn!("translation for {} dropped: location no longer resolves", path);
                    stats.missed.push(path);
                }
            }
        }

        stats
    }
}
