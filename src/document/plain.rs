/*!
 * Plain-text front-end.
 *
 * Each line of the input becomes one paragraph with a single run, so
 * blank lines survive the round trip untouched (the extractor skips
 * them, the serializer writes them back as-is).
 */

use std::fs;
use std::path::Path;

use crate::document::model::{Block, DocumentTree, Inline, Run};
use crate::errors::DocumentError;

/// Parse a plain-text file into a document tree
pub fn parse_file(path: &Path) -> Result<DocumentTree, DocumentError> {
    let content = fs::read_to_string(path)
        .map_err(|e| DocumentError::Parse(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(parse_str(&content))
}

/// Parse raw text into a document tree
pub fn parse_str(content: &str) -> DocumentTree {
    let blocks = content
        .lines()
        .enumerate()
        .map(|(index, line)| Block::paragraph(vec![Run::new(line, index)]))
        .collect();
    DocumentTree { blocks }
}

/// Serialize a (possibly translated) tree back to text
pub fn serialize(tree: &DocumentTree) -> String {
    let mut lines = Vec::new();
    tree.visit_runs(&mut |_, run| lines.push(run.text.clone()));
    lines.join("\n")
}

/// Write the tree to a file, appending the trailing newline text files carry
pub fn write_file(tree: &DocumentTree, output: &Path) -> Result<(), DocumentError> {
    let mut content = serialize(tree);
    content.push('\n');
    fs::write(output, content)
        .map_err(|e| DocumentError::Serialization(format!("cannot write {}: {}", output.display(), e)))
}
