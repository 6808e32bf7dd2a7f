/*!
 * Translate-stage orchestrator.
 *
 * Walks the two-level group/file layout produced by the chunk stage, and for
 * each fragment file: parses it, translates every section chunk by chunk,
 * stamps the target language on the root element and writes the result.
 * Fragments whose output already exists are skipped, which makes a re-run
 * resume at file granularity.
 */

use std::path::Path;

use log::{info, warn};

use crate::app_config::Config;
use crate::chunker;
use crate::document::Document;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::translation::TranslationClient;

/// Tag names whose elements form the translatable content of a section
const CONTENT_TAGS: [&str; 2] = ["p", "h1"];

/// Counts of what one pipeline run did
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PipelineSummary {
    /// Files translated and written
    pub translated: usize,
    /// Files skipped because their output already existed
    pub skipped: usize,
}

/// Orchestrates translation of a directory of chapter fragments
pub struct Pipeline {
    /// Client used for every chunk request
    client: TranslationClient,
    /// Token budget for one chunk
    max_chunk_tokens: usize,
}

impl Pipeline {
    /// Create a pipeline from the configuration
    pub fn new(config: &Config) -> Self {
        Self {
            client: TranslationClient::new(config),
            max_chunk_tokens: config.max_chunk_tokens,
        }
    }

    /// Create a pipeline around an existing client.
    ///
    /// Used by tests to drive the pipeline with a scripted provider.
    pub fn with_client(client: TranslationClient, max_chunk_tokens: usize) -> Self {
        Self {
            client,
            max_chunk_tokens,
        }
    }

    /// Translate every fragment file under `input_dir` into `output_dir`.
    ///
    /// Groups and files are processed in sorted order, chunks strictly
    /// sequentially. A chunk failure aborts the run with the file's context;
    /// files already written stay on disk.
    pub async fn translate_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        target_language: &str,
    ) -> Result<PipelineSummary, AppError> {
        FileManager::ensure_dir(output_dir)?;

        let mut summary = PipelineSummary::default();

        for group_dir in FileManager::sorted_subdirs(input_dir)? {
            let group_name = group_dir
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();

            for input_file in FileManager::sorted_files(&group_dir)? {
                let file_name = input_file
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                let output_file = output_dir.join(&group_name).join(&file_name);

                if FileManager::file_exists(&output_file) {
                    info!("Skipping {}/{}: output already exists", group_name, file_name);
                    summary.skipped += 1;
                    continue;
                }

                let content = FileManager::read_to_string(&input_file)?;
                let translated = self
                    .translate_file(&content, target_language)
                    .await
                    .map_err(|e| {
                        warn!("Aborting run while translating {}/{}", group_name, file_name);
                        e
                    })?;

                FileManager::write_to_file(&output_file, &translated)?;
                info!("Translated {} and saved to {:?}", file_name, output_file);
                summary.translated += 1;
            }
        }

        info!(
            "Translation run finished: {} translated, {} skipped",
            summary.translated, summary.skipped
        );
        Ok(summary)
    }

    /// Translate the content of one fragment file.
    pub async fn translate_file(
        &self,
        content: &str,
        target_language: &str,
    ) -> Result<String, AppError> {
        let mut document = Document::parse(content)?;

        // Collect the per-section chunks up front so no borrow of the tree
        // is held across await points.
        let mut section_chunks = Vec::new();
        document.for_each_section(|section| {
            let elements = section.content_elements(&CONTENT_TAGS);
            section_chunks.push(chunker::chunk_elements(&elements, self.max_chunk_tokens));
        });

        let mut translated_sections = Vec::with_capacity(section_chunks.len());
        for chunks in &section_chunks {
            let mut translated = String::new();
            for chunk in chunks {
                translated.push_str(&self.client.translate(&chunk.markup(), target_language).await?);
            }
            translated_sections.push(translated);
        }

        let mut replacements = translated_sections.into_iter();
        document.for_each_section_mut(|section| {
            if let Some(markup) = replacements.next() {
                section.set_raw_content(markup);
            }
        });

        document.set_root_attr("lang", target_language);
        document.set_root_attr("xml:lang", target_language);

        Ok(document.to_markup())
    }
}
