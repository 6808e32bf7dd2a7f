/*!
 * # bookwai - Book translation With AI
 *
 * A Rust library for translating EPUB books with an AI language model.
 *
 * ## Features
 *
 * - Split an EPUB into per-chapter HTML fragments
 * - Translate fragments chunk by chunk under a token budget
 * - Preserve document structure (tags, ids, language attributes)
 * - Bounded retry around the translation service
 * - Reassemble translated fragments into a new EPUB
 * - Resumable at file granularity: existing output is skipped
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: XHTML document tree model
 * - `preprocess`: Chapter normalization before translation
 * - `chunker`: Token-budgeted chunking of content elements
 * - `translation`: AI-powered translation of markup chunks:
 *   - `translation::core`: Client with retry and response extraction
 * - `pipeline`: Per-file translation orchestration
 * - `ebook`: EPUB container splitting and reassembly
 * - `file_utils`: File system operations
 * - `providers`: Client implementations for the translation service:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::mock`: Scripted provider for tests
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
pub mod chunker;
pub mod document;
pub mod ebook;
pub mod errors;
pub mod file_utils;
pub mod pipeline;
pub mod preprocess;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use chunker::{Chunk, chunk_elements};
pub use document::Document;
pub use errors::{AppError, DocumentError, ProviderError, TranslationError};
pub use pipeline::Pipeline;
pub use translation::TranslationClient;
