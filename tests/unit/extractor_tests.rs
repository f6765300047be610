/*!
 * Tests for span extraction
 */

use doctran::document::model::{Block, BlockKind, DocumentTree, Inline, OpaqueKind, Run};
use doctran::pipeline::SpanExtractor;

use crate::common::build_sample_tree;

#[test]
fn test_extract_withSampleTree_shouldEmitFiveSpansInOrder() {
    let tree = build_sample_tree();
    let extraction = SpanExtractor::extract(&tree);

    let texts: Vec<&str> = extraction.spans.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Quarterly Report", "Name", "Value", "Total", "42"]);
    assert_eq!(extraction.skipped, 0);
    assert!(extraction.warnings.is_empty());
}

#[test]
fn test_extract_withWhitespaceOnlyRuns_shouldSkipWithoutWarning() {
    let tree = DocumentTree {
        blocks: vec![Block::paragraph(vec![
            Run::new("  \t  ", 0),
            Run::new("content", 1),
            Run::new("\n", 2),
        ])],
    };

    let extraction = SpanExtractor::extract(&tree);
    assert_eq!(extraction.spans.len(), 1);
    assert_eq!(extraction.skipped, 2);
    assert!(extraction.warnings.is_empty());
}

#[test]
fn test_extract_withOnlyOpaqueContent_shouldEmitNothing() {
    let tree = DocumentTree {
        blocks: vec![Block {
            kind: BlockKind::Paragraph,
            inlines: vec![
                Inline::Opaque(OpaqueKind::Image),
                Inline::Opaque(OpaqueKind::Formula),
            ],
            children: Vec::new(),
        }],
    };

    let extraction = SpanExtractor::extract(&tree);
    assert!(extraction.spans.is_empty());
    assert_eq!(extraction.skipped, 0);
}

#[test]
fn test_extract_withEmptyTree_shouldEmitNothing() {
    let extraction = SpanExtractor::extract(&DocumentTree::new());
    assert!(extraction.spans.is_empty());
    assert!(extraction.warnings.is_empty());
}

#[test]
fn test_extract_pathsResolveAgainstSourceTree() {
    let tree = build_sample_tree();
    let extraction = SpanExtractor::extract(&tree);

    for span in &extraction.spans {
        let run = tree.resolve(&span.path).unwrap();
        assert_eq!(run.text, span.text);
    }
}
