/*!
 * Tests for EPUB splitting and reassembly
 */

use std::fs::File;
use std::path::{Path, PathBuf};

use epub::doc::EpubDoc;
use epub_builder::{EpubBuilder, EpubContent, ZipLibrary};
use walkdir::WalkDir;

use bookwai::ebook::{assemble_epub, split_epub};

use crate::common::{chapter_xhtml, create_temp_dir, create_test_file};

/// Builds a small EPUB with the given chapter documents
fn build_epub(dir: &Path, chapters: &[(&str, String)]) -> PathBuf {
    let path = dir.join("source.epub");
    let mut builder = EpubBuilder::new(ZipLibrary::new().unwrap()).unwrap();
    builder.metadata("title", "Test Book").unwrap();

    for (name, content) in chapters {
        builder
            .add_content(EpubContent::new(name.to_string(), content.as_bytes()).title(*name))
            .unwrap();
    }

    let mut file = File::create(&path).unwrap();
    builder.generate(&mut file).unwrap();
    path
}

fn find_fragment(root: &Path, file_name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .flatten()
        .map(|entry| entry.path().to_path_buf())
        .find(|path| {
            path.is_file() && path.file_name().is_some_and(|name| name == file_name)
        })
}

/// Test that splitting writes one pre-processed fragment per chapter
#[test]
fn test_split_epub_withChapters_shouldWriteNormalizedFragments() {
    let temp = create_temp_dir().unwrap();
    let fragments_dir = temp.path().join("input");

    let book = build_epub(
        temp.path(),
        &[
            (
                "chapter1.xhtml",
                chapter_xhtml(Some("Chapter 1: Anfang"), &["Erster Text."]),
            ),
            (
                "chapter2.xhtml",
                chapter_xhtml(Some("Chapter 2: Mitte"), &["Zweiter Text."]),
            ),
        ],
    );

    let written = split_epub(&book, &fragments_dir).unwrap();
    assert_eq!(written, 2);

    let fragment = find_fragment(&fragments_dir, "chapter1.xhtml").expect("fragment missing");
    // Fragments keep the two-level group/file layout
    assert_ne!(fragment.parent(), Some(fragments_dir.as_path()));

    let content = std::fs::read_to_string(&fragment).unwrap();
    assert!(content.contains("id=\"chapter1\""));
    assert!(content.contains("<title>Chapter 1: Anfang</title>"));
    assert!(content.contains("Erster Text."));
}

/// Test that splitting a missing file is a container error
#[test]
fn test_split_epub_withMissingFile_shouldFail() {
    let temp = create_temp_dir().unwrap();
    let result = split_epub(&temp.path().join("absent.epub"), &temp.path().join("input"));
    assert!(result.is_err());
}

/// Test assembly of translated fragments into a spined EPUB
#[test]
fn test_assemble_epub_withFragments_shouldPackThemInNameOrder() {
    let temp = create_temp_dir().unwrap();
    let translated_dir = temp.path().join("output").join("sections");

    let first = chapter_xhtml(Some("Chapter 1"), &["TRANSLATED: eins."]);
    let second = chapter_xhtml(Some("Chapter 2"), &["TRANSLATED: zwei."]);
    // Created out of order on purpose; assembly sorts by file name
    create_test_file(&translated_dir, "b_chapter2.xhtml", &second).unwrap();
    create_test_file(&translated_dir, "a_chapter1.xhtml", &first).unwrap();

    let book_path = assemble_epub(temp.path()).unwrap();
    assert!(book_path.ends_with("translation.epub"));
    assert!(book_path.exists());

    let mut book = EpubDoc::new(&book_path).unwrap();
    let mut spine_docs = Vec::new();
    loop {
        if let Some((content, mime)) = book.get_current_str() {
            if mime.contains("html") {
                spine_docs.push(content);
            }
        }
        if !book.go_next() {
            break;
        }
    }

    let first_pos = spine_docs.iter().position(|doc| doc.contains("eins"));
    let second_pos = spine_docs.iter().position(|doc| doc.contains("zwei"));
    assert!(first_pos.is_some(), "first chapter missing from spine");
    assert!(second_pos.is_some(), "second chapter missing from spine");
    assert!(first_pos < second_pos, "spine order does not follow file names");
}

/// Test a split of the source book followed by assembly of its fragments
#[test]
fn test_split_then_assemble_withUntranslatedFragments_shouldRoundTrip() {
    let temp = create_temp_dir().unwrap();
    let work_dir = temp.path().join("work");
    let input_dir = work_dir.join("input");
    let output_dir = work_dir.join("output");

    let book = build_epub(
        temp.path(),
        &[(
            "chapter1.xhtml",
            chapter_xhtml(Some("Chapter 1"), &["Inhalt."]),
        )],
    );

    split_epub(&book, &input_dir).unwrap();

    // Promote the fragments as if the translate stage had run
    for entry in WalkDir::new(&input_dir).into_iter().flatten() {
        if entry.path().is_file() {
            let relative = entry.path().strip_prefix(&input_dir).unwrap();
            let target = output_dir.join(relative);
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }

    let book_path = assemble_epub(&work_dir).unwrap();
    let book = EpubDoc::new(&book_path).unwrap();
    assert!(!book.spine.is_empty());
}
