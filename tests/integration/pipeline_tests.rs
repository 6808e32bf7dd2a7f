/*!
 * End-to-end tests for the translate-stage pipeline
 */

use std::sync::Arc;

use bookwai::document::Document;
use bookwai::errors::AppError;
use bookwai::pipeline::Pipeline;
use bookwai::providers::mock::{MOCK_TRANSLATION_MARKER, MockProvider};
use bookwai::translation::TranslationClient;

use crate::common::{create_temp_dir, create_test_file, two_section_xhtml};

fn pipeline_with(provider: MockProvider) -> (Pipeline, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let client = TranslationClient::with_provider(provider.clone(), "mock-model");
    (Pipeline::with_client(client, 600), provider)
}

/// Test the full per-file flow: two sections, echo translation, language
/// attributes on the root element
#[tokio::test]
async fn test_translate_directory_withTwoSections_shouldTranslateInPlace() {
    let temp = create_temp_dir().unwrap();
    let input_dir = temp.path().join("input");
    let output_dir = temp.path().join("output");

    let markup = two_section_xhtml("Erster Abschnitt.", "Zweiter Abschnitt.");
    create_test_file(&input_dir.join("OEBPS"), "chapter1.xhtml", &markup).unwrap();

    let (pipeline, provider) = pipeline_with(MockProvider::working());
    let summary = pipeline
        .translate_directory(&input_dir, &output_dir, "de")
        .await
        .unwrap();

    assert_eq!(summary.translated, 1);
    assert_eq!(summary.skipped, 0);
    // One chunk per section, translated sequentially
    assert_eq!(provider.request_count(), 2);

    let output_path = output_dir.join("OEBPS").join("chapter1.xhtml");
    let translated = std::fs::read_to_string(&output_path).unwrap();
    assert!(translated.contains("lang=\"de\""));
    assert!(translated.contains("xml:lang=\"de\""));

    // The marker must land inside the right section
    let document = Document::parse(&translated).unwrap();
    let mut sections = Vec::new();
    document.for_each_section(|section| sections.push(section.to_markup()));

    assert_eq!(sections.len(), 2);
    assert!(sections[0].contains(MOCK_TRANSLATION_MARKER));
    assert!(sections[0].contains("Erster Abschnitt."));
    assert!(!sections[0].contains("Zweiter Abschnitt."));
    assert!(sections[1].contains(MOCK_TRANSLATION_MARKER));
    assert!(sections[1].contains("Zweiter Abschnitt."));
}

/// Test that a re-run over existing output performs no re-translation
#[tokio::test]
async fn test_translate_directory_withExistingOutput_shouldSkipAndLeaveUntouched() {
    let temp = create_temp_dir().unwrap();
    let input_dir = temp.path().join("input");
    let output_dir = temp.path().join("output");

    let markup = two_section_xhtml("Eins.", "Zwei.");
    create_test_file(&input_dir.join("OEBPS"), "chapter1.xhtml", &markup).unwrap();

    let (first_pipeline, _) = pipeline_with(MockProvider::working());
    first_pipeline
        .translate_directory(&input_dir, &output_dir, "de")
        .await
        .unwrap();

    let output_path = output_dir.join("OEBPS").join("chapter1.xhtml");
    let first_result = std::fs::read_to_string(&output_path).unwrap();

    let (second_pipeline, second_provider) = pipeline_with(MockProvider::working());
    let summary = second_pipeline
        .translate_directory(&input_dir, &output_dir, "de")
        .await
        .unwrap();

    assert_eq!(summary.translated, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(second_provider.request_count(), 0);
    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), first_result);
}

/// Test that a translation failure aborts the file without writing output
#[tokio::test]
async fn test_translate_directory_withFailingProvider_shouldAbortWithoutOutput() {
    let temp = create_temp_dir().unwrap();
    let input_dir = temp.path().join("input");
    let output_dir = temp.path().join("output");

    let markup = two_section_xhtml("Eins.", "Zwei.");
    create_test_file(&input_dir.join("OEBPS"), "chapter1.xhtml", &markup).unwrap();

    let (pipeline, provider) = pipeline_with(MockProvider::failing());
    let result = pipeline
        .translate_directory(&input_dir, &output_dir, "de")
        .await;

    assert!(matches!(result, Err(AppError::Translation(_))));
    assert!(!output_dir.join("OEBPS").join("chapter1.xhtml").exists());
    // Three attempts for the first chunk, then the run stops
    assert_eq!(provider.request_count(), 3);
}

/// Test that groups and files are processed in sorted order
#[tokio::test]
async fn test_translate_directory_withSeveralFiles_shouldProcessAll() {
    let temp = create_temp_dir().unwrap();
    let input_dir = temp.path().join("input");
    let output_dir = temp.path().join("output");

    for (group, file) in [("b-group", "y.xhtml"), ("a-group", "x.xhtml")] {
        let markup = two_section_xhtml("Inhalt eins.", "Inhalt zwei.");
        create_test_file(&input_dir.join(group), file, &markup).unwrap();
    }

    let (pipeline, _) = pipeline_with(MockProvider::working());
    let summary = pipeline
        .translate_directory(&input_dir, &output_dir, "de")
        .await
        .unwrap();

    assert_eq!(summary.translated, 2);
    assert!(output_dir.join("a-group").join("x.xhtml").exists());
    assert!(output_dir.join("b-group").join("y.xhtml").exists());
}

/// Test that a section with no content elements is emptied, not corrupted
#[tokio::test]
async fn test_translate_file_withEmptySection_shouldEmptySection() {
    let markup = "<html lang=\"en\"><head><title>t</title></head>\
                  <body><section id=\"s1\"><hr/></section></body></html>";

    let (pipeline, provider) = pipeline_with(MockProvider::working());
    let translated = pipeline.translate_file(markup, "de").await.unwrap();

    assert!(translated.contains("<section id=\"s1\"></section>"));
    assert_eq!(provider.request_count(), 0);
}
