/*!
 * # doctran - AI Document Translator
 *
 * A Rust library for format-preserving translation of structured
 * documents using AI chat-completion backends.
 *
 * ## Features
 *
 * - Translate Word (.docx) documents, plain text, and URL-sourced content
 * - Preserve headings, paragraph styles, tables, images, and formulas
 * - OpenAI and Azure OpenAI backends behind one capability interface
 * - Budget-respecting batching with a per-batch retry state machine
 * - Partial-translation degradation with a per-run report
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Document model and format front-ends:
 *   - `document::model`: the block/run tree and run paths
 *   - `document::docx`: Word parsing and format-preserving rewrite
 *   - `document::plain`: plain-text documents
 *   - `document::web`: URL fetching and text extraction boundary
 * - `pipeline`: the translation pipeline:
 *   - `pipeline::span`: span extraction
 *   - `pipeline::batch`: batching under a character budget
 *   - `pipeline::reassemble`: writing translations back
 *   - `pipeline::orchestrator`: state machine, retries, concurrency
 *   - `pipeline::report`: the translation report
 * - `providers`: client implementations for translation backends:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::azure`: Azure OpenAI client
 *   - `providers::mock`: scripted backends for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod providers;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document::{DocumentTree, RunPath};
pub use errors::{AppError, DocumentError, ProviderError};
pub use pipeline::{Orchestrator, PipelineOptions, TranslationReport};
pub use providers::TranslationBackend;
