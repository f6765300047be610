/*!
 * Word document front-end.
 *
 * A `.docx` file is a ZIP archive whose body lives in `word/document.xml`.
 * Parsing builds a `DocumentTree` from the body XML; writing streams the
 * original XML back out event by event, substituting only the text of
 * runs that were translated, and repacks every other archive entry
 * byte for byte. Styles, images, formulas, and table structure are never
 * rewritten, which is what keeps the output visually identical to the
 * input.
 */

use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::document::model::{Block, BlockKind, DocumentTree, Inline, OpaqueKind, Run};
use crate::errors::DocumentError;

/// Archive entry holding the document body
const DOCUMENT_XML: &str = "word/document.xml";

/// A parsed Word package: the original archive bytes plus its body XML.
///
/// Kept alongside the tree for the whole pipeline run so the writer can
/// reproduce everything that is not translated text.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    /// Raw bytes of the source archive
    archive_bytes: Vec<u8>,
    /// Decoded `word/document.xml`
    document_xml: String,
}

/// Parse a `.docx` file into a document tree plus its backing package
pub fn parse_file(path: &Path) -> Result<(DocumentTree, DocxPackage), DocumentError> {
    let bytes = fs::read(path)
        .map_err(|e| DocumentError::Parse(format!("cannot read {}: {}", path.display(), e)))?;
    parse_bytes(bytes)
}

/// Parse in-memory `.docx` bytes into a document tree plus its backing package
pub fn parse_bytes(bytes: Vec<u8>) -> Result<(DocumentTree, DocxPackage), DocumentError> {
    let document_xml = read_document_xml(&bytes)?;
    let tree = parse_document_xml(&document_xml)?;
    debug!(
        "Parsed Word document: {} top-level blocks, {} runs, {} opaque nodes",
        tree.blocks.len(),
        tree.run_count(),
        tree.opaque_count()
    );
    Ok((
        tree,
        DocxPackage {
            archive_bytes: bytes,
            document_xml,
        },
    ))
}

/// Write the translated document.
///
/// `replacements` maps a run's `source_index` (the ordinal of its `w:t`
/// node) to its new text. Output goes through a temporary file in the
/// target directory, so a failed write leaves nothing behind.
pub fn write_file(
    package: &DocxPackage,
    replacements: &HashMap<usize, String>,
    output: &Path,
) -> Result<(), DocumentError> {
    let rewritten = rewrite_document_xml(&package.document_xml, replacements)?;

    let parent = output.parent().filter(|p| !p.as_os_str().is_empty());
    let mut staged = match parent {
        Some(dir) => tempfile::NamedTempFile::new_in(dir),
        None => tempfile::NamedTempFile::new(),
    }
    .map_err(|e| DocumentError::Serialization(format!("cannot stage output file: {}", e)))?;

    repack_archive(&package.archive_bytes, rewritten.as_bytes(), staged.as_file_mut())?;

    staged
        .persist(output)
        .map_err(|e| DocumentError::Serialization(format!("cannot write {}: {}", output.display(), e)))?;
    Ok(())
}

fn read_document_xml(bytes: &[u8]) -> Result<String, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocumentError::Parse(format!("not a Word archive: {}", e)))?;
    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|_| DocumentError::Parse(format!("archive has no {}", DOCUMENT_XML)))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Parse(format!("cannot decode {}: {}", DOCUMENT_XML, e)))?;
    Ok(xml)
}

/// Incremental tree builder driven by the XML event stream
struct TreeBuilder {
    tree: DocumentTree,
    stack: Vec<Block>,
    /// Global ordinal of `w:t` nodes, in document order
    text_nodes_seen: usize,
    /// Depth of open math containers; their inner text is never a run
    math_depth: usize,
    in_text_node: bool,
    pending_text: String,
    pending_index: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            tree: DocumentTree::new(),
            stack: Vec::new(),
            text_nodes_seen: 0,
            math_depth: 0,
            in_text_node: false,
            pending_text: String::new(),
            pending_index: 0,
        }
    }

    fn open_block(&mut self, kind: BlockKind) {
        self.stack.push(Block::new(kind));
    }

    fn close_block(&mut self) {
        if let Some(block) = self.stack.pop() {
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(block),
                None => self.tree.blocks.push(block),
            }
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        if let Some(block) = self.stack.last_mut() {
            block.inlines.push(inline);
        }
    }

    fn start_text_node(&mut self) {
        self.in_text_node = true;
        self.pending_index = self.text_nodes_seen;
        self.text_nodes_seen += 1;
        self.pending_text.clear();
    }

    fn finish_text_node(&mut self) {
        if self.in_text_node {
            let run = Run::new(self.pending_text.clone(), self.pending_index);
            self.push_inline(Inline::Text(run));
            self.in_text_node = false;
        }
    }

    fn apply_paragraph_style(&mut self, element: &BytesStart) {
        let Some(style) = attribute_value(element, b"w:val") else {
            return;
        };
        let Some(level) = heading_level(&style) else {
            return;
        };
        if let Some(block) = self.stack.last_mut() {
            if block.kind == BlockKind::Paragraph {
                block.kind = BlockKind::Heading(level);
            }
        }
    }
}

fn parse_document_xml(xml: &str) -> Result<DocumentTree, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut builder = TreeBuilder::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Parse(format!("malformed document XML: {}", e)))?;
        match event {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:p" => builder.open_block(BlockKind::Paragraph),
                b"w:tbl" => builder.open_block(BlockKind::Table),
                b"w:tr" => builder.open_block(BlockKind::TableRow),
                b"w:tc" => builder.open_block(BlockKind::TableCell),
                b"w:pStyle" => builder.apply_paragraph_style(e),
                b"w:t" => builder.start_text_node(),
                b"w:drawing" => builder.push_inline(Inline::Opaque(OpaqueKind::Image)),
                b"w:pict" => builder.push_inline(Inline::Opaque(OpaqueKind::Drawing)),
                b"m:oMath" | b"m:oMathPara" => {
                    if builder.math_depth == 0 {
                        builder.push_inline(Inline::Opaque(OpaqueKind::Formula));
                    }
                    builder.math_depth += 1;
                }
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"w:pStyle" => builder.apply_paragraph_style(e),
                b"w:p" => {
                    builder.open_block(BlockKind::Paragraph);
                    builder.close_block();
                }
                b"w:t" => {
                    // empty text node still consumes an ordinal
                    builder.start_text_node();
                    builder.finish_text_node();
                }
                b"w:drawing" => builder.push_inline(Inline::Opaque(OpaqueKind::Image)),
                b"w:pict" => builder.push_inline(Inline::Opaque(OpaqueKind::Drawing)),
                _ => {}
            },
            Event::Text(e) => {
                if builder.in_text_node && builder.math_depth == 0 {
                    let fragment = e
                        .unescape()
                        .map_err(|err| DocumentError::Parse(format!("bad text node: {}", err)))?;
                    builder.pending_text.push_str(&fragment);
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"w:p" | b"w:tbl" | b"w:tr" | b"w:tc" => {
                    builder.finish_text_node();
                    builder.close_block();
                }
                b"w:t" => builder.finish_text_node(),
                b"m:oMath" | b"m:oMathPara" => {
                    builder.math_depth = builder.math_depth.saturating_sub(1);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(builder.tree)
}

/// Stream the body XML through unchanged, substituting text only inside
/// `w:t` nodes listed in `replacements`.
fn rewrite_document_xml(
    xml: &str,
    replacements: &HashMap<usize, String>,
) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut text_nodes_seen = 0usize;
    let mut active: Option<&String> = None;
    let mut substituted = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Serialization(format!("malformed document XML: {}", e)))?;
        let write_result = match event {
            Event::Start(e) if e.name().as_ref() == b"w:t" => {
                active = replacements.get(&text_nodes_seen);
                text_nodes_seen += 1;
                substituted = false;
                writer.write_event(Event::Start(e))
            }
            Event::Empty(e) if e.name().as_ref() == b"w:t" => {
                // whitespace-only nodes are never replaced, copy as-is
                text_nodes_seen += 1;
                writer.write_event(Event::Empty(e))
            }
            Event::End(e) if e.name().as_ref() == b"w:t" => {
                active = None;
                writer.write_event(Event::End(e))
            }
            Event::Text(e) => match active {
                Some(replacement) => {
                    if substituted {
                        // a multi-fragment node collapses into one replacement
                        Ok(())
                    } else {
                        substituted = true;
                        writer.write_event(Event::Text(BytesText::new(replacement)))
                    }
                }
                None => writer.write_event(Event::Text(e)),
            },
            Event::Eof => break,
            other => writer.write_event(other),
        };
        write_result
            .map_err(|e| DocumentError::Serialization(format!("cannot rewrite document XML: {}", e)))?;
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| DocumentError::Serialization(format!("rewritten XML is not UTF-8: {}", e)))
}

/// Copy every archive entry verbatim, replacing only the document body
fn repack_archive(
    original: &[u8],
    new_document_xml: &[u8],
    output: &mut (impl Write + Seek),
) -> Result<(), DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(original))
        .map_err(|e| DocumentError::Serialization(format!("cannot reopen source archive: {}", e)))?;
    let mut zip_out = ZipWriter::new(output);

    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| DocumentError::Serialization(format!("cannot read archive entry: {}", e)))?;
        if entry.name() == DOCUMENT_XML {
            drop(entry);
            zip_out
                .start_file(DOCUMENT_XML, FileOptions::default())
                .map_err(|e| DocumentError::Serialization(format!("cannot start body entry: {}", e)))?;
            zip_out
                .write_all(new_document_xml)
                .map_err(|e| DocumentError::Serialization(format!("cannot write body entry: {}", e)))?;
        } else {
            zip_out
                .raw_copy_file(entry)
                .map_err(|e| DocumentError::Serialization(format!("cannot copy archive entry: {}", e)))?;
        }
    }

    zip_out
        .finish()
        .map_err(|e| DocumentError::Serialization(format!("cannot finalize archive: {}", e)))?;
    Ok(())
}

fn attribute_value(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| String::from_utf8(attr.value.into_owned()).ok())
}

/// Map a paragraph style id like `Heading2` to its outline level
fn heading_level(style: &str) -> Option<u8> {
    let rest = style.strip_prefix("Heading")?;
    if rest.is_empty() {
        return Some(1);
    }
    rest.parse::<u8>().ok().filter(|level| (1..=9).contains(level))
}
