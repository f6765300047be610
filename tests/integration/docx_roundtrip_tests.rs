/*!
 * Word document round-trip tests: parse, translate, rewrite, reparse
 */

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use doctran::document::docx;
use doctran::document::model::BlockKind;
use doctran::pipeline::{CancelToken, Orchestrator, PipelineOptions};
use doctran::providers::mock::MockBackend;

use crate::common::{
    SAMPLE_DOCUMENT_XML, SAMPLE_IMAGE_BYTES, create_temp_dir, create_test_docx, run_texts,
};

#[test]
fn test_parse_file_withSampleDocx_shouldBuildExpectedTree() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_docx(&dir.path().to_path_buf(), "sample.docx", SAMPLE_DOCUMENT_XML).unwrap();

    let (tree, _package) = docx::parse_file(&path).unwrap();

    assert_eq!(
        run_texts(&tree),
        vec!["Quarterly Report", "Name", "Value", "Total", "42"]
    );
    assert_eq!(tree.blocks[0].kind, BlockKind::Heading(1));
    assert_eq!(tree.table_shapes(), vec![(2, 2)]);
    // the drawing and the formula are present but opaque
    assert_eq!(tree.opaque_count(), 2);
}

#[test]
fn test_write_file_withNoReplacements_shouldPreserveDocumentExactly() {
    let dir = create_temp_dir().unwrap();
    let base = dir.path().to_path_buf();
    let input = create_test_docx(&base, "in.docx", SAMPLE_DOCUMENT_XML).unwrap();
    let output = base.join("out.docx");

    let (tree, package) = docx::parse_file(&input).unwrap();
    docx::write_file(&package, &HashMap::new(), &output).unwrap();

    let (reparsed, _) = docx::parse_file(&output).unwrap();
    assert_eq!(reparsed, tree);
}

#[test]
fn test_write_file_shouldCopyNonBodyEntriesByteForByte() {
    let dir = create_temp_dir().unwrap();
    let base = dir.path().to_path_buf();
    let input = create_test_docx(&base, "in.docx", SAMPLE_DOCUMENT_XML).unwrap();
    let output = base.join("out.docx");

    let (_, package) = docx::parse_file(&input).unwrap();
    let mut replacements = HashMap::new();
    replacements.insert(0usize, "Rapport trimestriel".to_string());
    docx::write_file(&package, &replacements, &output).unwrap();

    let file = std::fs::File::open(&output).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let mut image = Vec::new();
    archive
        .by_name("word/media/image1.png")
        .unwrap()
        .read_to_end(&mut image)
        .unwrap();
    assert_eq!(image, SAMPLE_IMAGE_BYTES);

    let mut body = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    assert!(body.contains("Rapport trimestriel"));
    assert!(body.contains("<m:t>E=mc^2</m:t>"));
    assert!(body.contains(r#"<w:pStyle w:val="Heading1"/>"#));
}

#[tokio::test]
async fn test_full_docx_translation_shouldPreserveStructure() {
    let dir = create_temp_dir().unwrap();
    let base = dir.path().to_path_buf();
    let input = create_test_docx(&base, "report.docx", SAMPLE_DOCUMENT_XML).unwrap();
    let output = base.join("report.en.docx");

    // parse
    let (mut tree, package) = docx::parse_file(&input).unwrap();

    // translate
    let orchestrator = Orchestrator::new(
        Arc::new(MockBackend::uppercase()),
        PipelineOptions {
            retry_backoff_ms: 1,
            ..PipelineOptions::default()
        },
    );
    let outcome = orchestrator
        .translate_tree(&mut tree, "en", "en", |_| {}, &CancelToken::new())
        .await
        .unwrap();
    assert!(outcome.report.is_complete());

    // rewrite, using only the runs the reassembler touched
    let mut replacements = HashMap::new();
    for path in &outcome.applied {
        let run = tree.resolve(path).unwrap();
        replacements.insert(run.source_index, run.text.clone());
    }
    docx::write_file(&package, &replacements, &output).unwrap();

    // reparse and verify
    let (translated, _) = docx::parse_file(&output).unwrap();
    assert_eq!(
        run_texts(&translated),
        vec!["QUARTERLY REPORT", "NAME", "VALUE", "TOTAL", "42"]
    );
    assert_eq!(translated.blocks[0].kind, BlockKind::Heading(1));
    assert_eq!(translated.table_shapes(), vec![(2, 2)]);
    assert_eq!(translated.run_count(), tree.run_count());
    assert_eq!(translated.opaque_count(), 2);
}

#[test]
fn test_parse_file_withNonZipBytes_shouldBeParseError() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("fake.docx");
    std::fs::write(&path, b"this is not a zip archive").unwrap();

    let result = docx::parse_file(&path);
    assert!(result.is_err());
}
