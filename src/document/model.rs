/*!
 * In-memory document model.
 *
 * A parsed document is an ordered tree of blocks (paragraphs, headings,
 * tables) whose leaves are either translatable text runs or opaque nodes
 * (images, formulas, drawings) that the pipeline must never touch.
 *
 * Traversal order is structural and therefore deterministic: repeated
 * walks of the same tree visit runs in the same order, which is what lets
 * extraction and reassembly agree on locations.
 */

use std::fmt;

/// The smallest styled text unit in a document.
///
/// A run owns its text content and remembers which text node of the
/// source serialization it came from (`source_index`), so the format
/// writers can map a mutated run back to its backing node.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Text content of the run
    pub text: String,

    /// Ordinal of the backing text node in the source document
    /// (the k-th `w:t` of a docx body, the k-th line of a text file)
    pub source_index: usize,
}

impl Run {
    /// Create a new run
    pub fn new(text: impl Into<String>, source_index: usize) -> Self {
        Run {
            text: text.into(),
            source_index,
        }
    }

    /// Whether the run carries any translatable content
    pub fn is_translatable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Kind of an opaque, non-text leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    /// Embedded image or picture
    Image,
    /// Mathematical formula object
    Formula,
    /// Any other drawing object
    Drawing,
}

/// An inline element of a block: either translatable text or an opaque leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// A translatable text run
    Text(Run),
    /// A non-text node, kept addressable but never modified
    Opaque(OpaqueKind),
}

/// Kind of a structural block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A body paragraph
    Paragraph,
    /// A heading paragraph with its outline level (1-based)
    Heading(u8),
    /// A table; children are rows
    Table,
    /// A table row; children are cells
    TableRow,
    /// A table cell; children are paragraphs
    TableCell,
}

/// A paragraph, heading, or table container holding inlines and/or nested blocks
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// What kind of container this is
    pub kind: BlockKind,

    /// Ordered inline content (runs and opaque leaves)
    pub inlines: Vec<Inline>,

    /// Ordered nested blocks (table rows, cells, cell paragraphs)
    pub children: Vec<Block>,
}

impl Block {
    /// Create an empty block of the given kind
    pub fn new(kind: BlockKind) -> Self {
        Block {
            kind,
            inlines: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a paragraph block from a sequence of runs
    pub fn paragraph(runs: Vec<Run>) -> Self {
        Block {
            kind: BlockKind::Paragraph,
            inlines: runs.into_iter().map(Inline::Text).collect(),
            children: Vec::new(),
        }
    }
}

/// A stable path from the tree root to exactly one run.
///
/// All components but the last descend through block children (the first
/// indexes the tree's top-level blocks); the last component indexes the
/// run's slot in the final block's inline list. A path resolves to at
/// most one run for the lifetime of the tree it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunPath(pub Vec<usize>);

impl RunPath {
    /// Create a path from raw components
    pub fn new(components: Vec<usize>) -> Self {
        RunPath(components)
    }

    /// Block components of the path (everything but the inline index)
    fn block_steps(&self) -> &[usize] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    /// The inline index of the final block
    fn inline_step(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl fmt::Display for RunPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// An ordered tree of blocks representing one parsed document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTree {
    /// Top-level blocks in document order
    pub blocks: Vec<Block>,
}

impl DocumentTree {
    /// Create an empty tree
    pub fn new() -> Self {
        DocumentTree { blocks: Vec::new() }
    }

    /// Visit every run in reading order (depth-first, inlines before
    /// nested blocks), passing its path and a shared reference.
    pub fn visit_runs(&self, visit: &mut impl FnMut(RunPath, &Run)) {
        for (index, block) in self.blocks.iter().enumerate() {
            Self::visit_block(block, vec![index], visit);
        }
    }

    fn visit_block(block: &Block, prefix: Vec<usize>, visit: &mut impl FnMut(RunPath, &Run)) {
        for (index, inline) in block.inlines.iter().enumerate() {
            if let Inline::Text(run) = inline {
                let mut components = prefix.clone();
                components.push(index);
                visit(RunPath(components), run);
            }
        }
        for (index, child) in block.children.iter().enumerate() {
            let mut components = prefix.clone();
            components.push(index);
            Self::visit_block(child, components, visit);
        }
    }

    /// Resolve a path to its run, if the path is valid for this tree
    pub fn resolve(&self, path: &RunPath) -> Option<&Run> {
        let block = self.resolve_block(path.block_steps())?;
        match block.inlines.get(path.inline_step()?) {
            Some(Inline::Text(run)) => Some(run),
            _ => None,
        }
    }

    /// Resolve a path to a mutable run, if the path is valid for this tree
    pub fn resolve_mut(&mut self, path: &RunPath) -> Option<&mut Run> {
        let steps = path.block_steps().to_vec();
        let inline_step = path.inline_step()?;

        let mut steps_iter = steps.iter();
        let mut block = self.blocks.get_mut(*steps_iter.next()?)?;
        for step in steps_iter {
            block = block.children.get_mut(*step)?;
        }
        match block.inlines.get_mut(inline_step) {
            Some(Inline::Text(run)) => Some(run),
            _ => None,
        }
    }

    fn resolve_block(&self, steps: &[usize]) -> Option<&Block> {
        let mut steps_iter = steps.iter();
        let mut block = self.blocks.get(*steps_iter.next()?)?;
        for step in steps_iter {
            block = block.children.get(*step)?;
        }
        Some(block)
    }

    /// Total number of runs in the tree, translatable or not
    pub fn run_count(&self) -> usize {
        let mut count = 0;
        self.visit_runs(&mut |_, _| count += 1);
        count
    }

    /// Number of opaque (non-text) leaves in the tree
    pub fn opaque_count(&self) -> usize {
        fn count_block(block: &Block) -> usize {
            let own = block
                .inlines
                .iter()
                .filter(|inline| matches!(inline, Inline::Opaque(_)))
                .count();
            own + block.children.iter().map(count_block).sum::<usize>()
        }
        self.blocks.iter().map(count_block).sum()
    }

    /// Shape of every table in the tree as (rows, cells-per-first-row)
    pub fn table_shapes(&self) -> Vec<(usize, usize)> {
        self.blocks
            .iter()
            .filter(|block| block.kind == BlockKind::Table)
            .map(|table| {
                let rows = table.children.len();
                let cells = table
                    .children
                    .first()
                    .map(|row| row.children.len())
                    .unwrap_or(0);
                (rows, cells)
            })
            .collect()
    }
}
