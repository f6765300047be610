/*!
 * Tests for the document tree model
 */

use doctran::document::model::{Block, BlockKind, DocumentTree, Inline, OpaqueKind, Run, RunPath};

use crate::common::{build_sample_tree, run_texts};

#[test]
fn test_visit_runs_withSampleTree_shouldFollowReadingOrder() {
    let tree = build_sample_tree();
    assert_eq!(
        run_texts(&tree),
        vec!["Quarterly Report", "Name", "Value", "Total", "42"]
    );
}

#[test]
fn test_visit_runs_calledTwice_shouldBeDeterministic() {
    let tree = build_sample_tree();

    let mut first = Vec::new();
    tree.visit_runs(&mut |path, _| first.push(path));
    let mut second = Vec::new();
    tree.visit_runs(&mut |path, _| second.push(path));

    assert_eq!(first, second);
}

#[test]
fn test_every_visited_path_shouldResolveToItsRun() {
    let tree = build_sample_tree();

    let mut pairs: Vec<(RunPath, String)> = Vec::new();
    tree.visit_runs(&mut |path, run| pairs.push((path, run.text.clone())));

    for (path, text) in pairs {
        assert_eq!(tree.resolve(&path).unwrap().text, text);
    }
}

#[test]
fn test_run_count_withSampleTree_shouldCountAllRuns() {
    let tree = build_sample_tree();
    assert_eq!(tree.run_count(), 5);
}

#[test]
fn test_table_shapes_withSampleTree_shouldBeTwoByTwo() {
    let tree = build_sample_tree();
    assert_eq!(tree.table_shapes(), vec![(2, 2)]);
}

#[test]
fn test_opaque_count_withMixedInlines_shouldOnlyCountOpaques() {
    let tree = DocumentTree {
        blocks: vec![Block {
            kind: BlockKind::Paragraph,
            inlines: vec![
                Inline::Text(Run::new("text", 0)),
                Inline::Opaque(OpaqueKind::Image),
                Inline::Opaque(OpaqueKind::Formula),
            ],
            children: Vec::new(),
        }],
    };
    assert_eq!(tree.opaque_count(), 2);
    assert_eq!(tree.run_count(), 1);
}

#[test]
fn test_resolve_withStalePathAfterNoMutation_shouldStillResolve() {
    // paths derive from structure; text mutation must not invalidate them
    let mut tree = build_sample_tree();
    let path = RunPath::new(vec![0, 0]);
    tree.resolve_mut(&path).unwrap().text = "translated".to_string();
    assert_eq!(tree.resolve(&path).unwrap().text, "translated");
    assert_eq!(tree.run_count(), 5);
}
