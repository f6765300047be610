/*!
 * Tests for reassembly of translated text
 */

use doctran::document::model::RunPath;
use doctran::pipeline::SpanExtractor;
use doctran::pipeline::reassemble::Reassembler;

use crate::common::{build_sample_tree, run_texts};

#[test]
fn test_apply_withIdentityTranslations_shouldRoundTrip() {
    let mut tree = build_sample_tree();
    let reference = tree.clone();

    let extraction = SpanExtractor::extract(&tree);
    let identity: Vec<(RunPath, String)> = extraction
        .spans
        .into_iter()
        .map(|span| (span.path, span.text))
        .collect();

    let stats = Reassembler::apply(&mut tree, identity);

    assert_eq!(stats.applied.len(), 5);
    assert!(stats.missed.is_empty());
    assert_eq!(tree, reference);
}

#[test]
fn test_apply_shouldKeepRunAndTableCountsInvariant() {
    let mut tree = build_sample_tree();
    let runs_before = tree.run_count();
    let shapes_before = tree.table_shapes();

    let extraction = SpanExtractor::extract(&tree);
    let translated: Vec<(RunPath, String)> = extraction
        .spans
        .into_iter()
        .map(|span| (span.path, format!("XX {}", span.text)))
        .collect();
    Reassembler::apply(&mut tree, translated);

    assert_eq!(tree.run_count(), runs_before);
    assert_eq!(tree.table_shapes(), shapes_before);
}

#[test]
fn test_apply_withMixOfValidAndStalePaths_shouldDegradeGracefully() {
    let mut tree = build_sample_tree();

    let stats = Reassembler::apply(
        &mut tree,
        vec![
            (RunPath::new(vec![0, 0]), "Rapport trimestriel".to_string()),
            (RunPath::new(vec![7, 7, 7]), "nowhere".to_string()),
        ],
    );

    assert_eq!(stats.applied.len(), 1);
    assert_eq!(stats.missed.len(), 1);

    let texts = run_texts(&tree);
    assert_eq!(texts[0], "Rapport trimestriel");
    // everything else untouched
    assert_eq!(&texts[1..], &["Name", "Value", "Total", "42"]);
}
