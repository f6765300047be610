/*!
 * Structured document handling.
 *
 * This module contains the in-memory document model and the format
 * front-ends that read and write it:
 *
 * - `model`: the document tree (blocks, runs, opaque leaves) and run paths
 * - `docx`: Word document parsing and format-preserving rewrite
 * - `plain`: plain-text documents
 * - `web`: URL-sourced content (fetch + text extraction boundary)
 */

// Re-export main types for easier usage
pub use self::model::{Block, BlockKind, DocumentTree, Inline, OpaqueKind, Run, RunPath};

// Submodules
pub mod docx;
pub mod model;
pub mod plain;
pub mod web;
