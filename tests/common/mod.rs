/*!
 * Common test utilities for the doctran test suite
 */

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::FileOptions;

use doctran::document::model::{Block, BlockKind, DocumentTree, Run};

/// Word body used by the docx tests: one heading plus a 2x2 table,
/// five non-empty runs in total, with an image and a formula that must
/// survive translation untouched.
pub const SAMPLE_DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:m="http://schemas.openxmlformats.org/officeDocument/2006/math">
<w:body>
<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t>Quarterly Report</w:t></w:r></w:p>
<w:p><w:r><w:drawing><wp:inline xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"></wp:inline></w:drawing></w:r></w:p>
<w:p><w:r><m:oMath><m:r><m:t>E=mc^2</m:t></m:r></m:oMath></w:r></w:p>
<w:tbl>
<w:tr><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Value</w:t></w:r></w:p></w:tc></w:tr>
<w:tr><w:tc><w:p><w:r><w:t>Total</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>42</w:t></w:r></w:p></w:tc></w:tr>
</w:tbl>
</w:body>
</w:document>"#;

/// Bytes of a fake embedded image, copied verbatim through translation
pub const SAMPLE_IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

/// Initialize logging for tests that want to inspect pipeline output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a minimal but valid Word document for testing
pub fn create_test_docx(dir: &PathBuf, filename: &str, document_xml: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    let file = File::create(&file_path)?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions = FileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
    )?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
    )?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(document_xml.as_bytes())?;

    zip.start_file("word/media/image1.png", options)?;
    zip.write_all(SAMPLE_IMAGE_BYTES)?;

    zip.finish()?;
    Ok(file_path)
}

/// Builds the in-memory equivalent of `SAMPLE_DOCUMENT_XML`: a heading
/// plus a 2x2 table, five non-empty runs in total.
pub fn build_sample_tree() -> DocumentTree {
    let mut heading = Block::new(BlockKind::Heading(1));
    heading
        .inlines
        .push(doctran::document::model::Inline::Text(Run::new("Quarterly Report", 0)));

    let cell_texts = [["Name", "Value"], ["Total", "42"]];
    let mut table = Block::new(BlockKind::Table);
    let mut source_index = 1;
    for row_texts in cell_texts {
        let mut row = Block::new(BlockKind::TableRow);
        for text in row_texts {
            let mut cell = Block::new(BlockKind::TableCell);
            cell.children.push(Block::paragraph(vec![Run::new(text, source_index)]));
            source_index += 1;
            row.children.push(cell);
        }
        table.children.push(row);
    }

    DocumentTree {
        blocks: vec![heading, table],
    }
}

/// Collect every run text of a tree in reading order
pub fn run_texts(tree: &DocumentTree) -> Vec<String> {
    let mut texts = Vec::new();
    tree.visit_runs(&mut |_, run| texts.push(run.text.clone()));
    texts
}
