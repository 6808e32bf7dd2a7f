/*!
 * Container boundary: EPUB splitting and reassembly.
 *
 * The chunk stage opens the source EPUB, runs the structural pre-processor
 * over every content document and writes one fragment file per chapter. The
 * assemble stage packs the translated fragments back into a single EPUB.
 * Both sides are thin I/O around the translation core.
 */

use std::fs::File;
use std::path::{Path, PathBuf};

use epub::doc::EpubDoc;
use epub_builder::{EpubBuilder, EpubContent, ZipLibrary};
use log::{error, info, warn};
use walkdir::WalkDir;

use crate::document::Document;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::preprocess;

/// Group directory for spine items that sit at the archive root
const DEFAULT_GROUP: &str = "sections";
/// File name of the assembled container
const OUTPUT_BOOK_NAME: &str = "translation.epub";

/// Split an EPUB into per-chapter fragment files.
///
/// Every HTML content document in the spine is parsed, normalized by the
/// pre-processor and written under `fragments_dir` at its path inside the
/// archive. Returns the number of fragments written.
pub fn split_epub(input: &Path, fragments_dir: &Path) -> Result<usize, AppError> {
    info!("Starting the chunking process for {:?}", input);
    FileManager::ensure_dir(fragments_dir)?;

    let mut book = EpubDoc::new(input)
        .map_err(|e| AppError::Container(format!("Unable to read {:?}: {}", input, e)))?;
    info!("eBook read successfully: {:?}", input);

    let mut written = 0;
    loop {
        if let Some((content, mime)) = book.get_current_str() {
            if mime.contains("html") {
                let relative = fragment_path(book.get_current_path(), written);
                let mut document = Document::parse(&content).map_err(|e| {
                    error!("Unable to process {:?}: {}", relative, e);
                    AppError::Document(e)
                })?;

                preprocess::normalize_chapters(&mut document);

                FileManager::write_to_file(fragments_dir.join(&relative), &document.to_markup())?;
                info!("Chunked {:?} into {:?}", relative, fragments_dir);
                written += 1;
            }
        }

        if !book.go_next() {
            break;
        }
    }

    info!("Chunking process completed for {:?}", input);
    Ok(written)
}

// Spine items without a parent directory are grouped under a default group
// so the two-level group/file layout always holds.
fn fragment_path(item_path: Option<PathBuf>, index: usize) -> PathBuf {
    let path = item_path.unwrap_or_else(|| PathBuf::from(format!("section_{:03}.xhtml", index)));
    match path.parent() {
        Some(parent) if parent != Path::new("") => path,
        _ => Path::new(DEFAULT_GROUP).join(path),
    }
}

/// Assemble translated fragments into the final EPUB.
///
/// Collects every HTML fragment under `<output_dir>/output`, sorted
/// lexicographically by file name, and writes them as a linear spine to
/// `<output_dir>/translation.epub`. Returns the path of the created file.
pub fn assemble_epub(output_dir: &Path) -> Result<PathBuf, AppError> {
    info!("Starting the EPUB assembly");
    let fragments_root = output_dir.join("output");

    let mut fragments = Vec::new();
    for entry in WalkDir::new(&fragments_root).into_iter().flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_html = path
            .extension()
            .map(|ext| {
                ext.eq_ignore_ascii_case("xhtml")
                    || ext.eq_ignore_ascii_case("html")
                    || ext.eq_ignore_ascii_case("htm")
            })
            .unwrap_or(false);
        if is_html {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            fragments.push((name, path.to_path_buf()));
        }
    }
    fragments.sort();

    if fragments.is_empty() {
        warn!("No translated fragments found under {:?}", fragments_root);
    }

    let zip = ZipLibrary::new().map_err(container_error)?;
    let mut builder = EpubBuilder::new(zip).map_err(container_error)?;
    builder.metadata("title", "Translation").map_err(container_error)?;

    for (name, path) in &fragments {
        let content = FileManager::read_to_string(path)?;
        let stem = Path::new(name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| name.clone());

        builder
            .add_content(EpubContent::new(name.clone(), content.as_bytes()).title(stem))
            .map_err(container_error)?;
        info!("Added {} to the EPUB book", name);
    }

    let book_path = output_dir.join(OUTPUT_BOOK_NAME);
    let mut file = File::create(&book_path)
        .map_err(|e| AppError::Container(format!("Unable to create {:?}: {}", book_path, e)))?;
    builder.generate(&mut file).map_err(container_error)?;

    info!("EPUB assembled and saved to {:?}", book_path);
    Ok(book_path)
}

fn container_error<E: std::fmt::Display>(error: E) -> AppError {
    AppError::Container(error.to_string())
}
