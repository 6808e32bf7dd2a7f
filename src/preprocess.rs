/*!
 * Structural pre-processing of chapter documents.
 *
 * Runs once per chapter file before translation: the document title is kept
 * in sync with the chapter heading, and chapters get a stable id derived
 * from the number in their heading. Pure mutation of the given document, no
 * failure modes; a chapter without a heading degrades to an empty title.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, Element};

/// Attribute marking a section as a chapter
const CHAPTER_TYPE_ATTR: &str = "epub:type";
/// Prefix for derived chapter ids
const CHAPTER_ID_PREFIX: &str = "chapter";

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Normalize every chapter section of a document.
///
/// For each outermost `<section epub:type="chapter">`:
/// - the document title is set to the section's first `<h1>` text (empty
///   when the section has no heading);
/// - when the heading contains digits, the section id becomes `chapter`
///   followed by the first digit run; otherwise any existing id is left
///   alone.
pub fn normalize_chapters(document: &mut Document) {
    let mut title: Option<String> = None;

    document.for_each_section_mut(|section| {
        if !is_chapter(section) {
            return;
        }

        let heading = section
            .find_first("h1")
            .map(|h1| h1.text())
            .unwrap_or_default();

        if let Some(number) = first_number(&heading) {
            section.set_attr("id", &format!("{}{}", CHAPTER_ID_PREFIX, number));
        }

        title = Some(heading);
    });

    if let Some(text) = title {
        document.set_title(&text);
    }
}

/// Check whether a section is marked as a chapter
fn is_chapter(section: &Element) -> bool {
    section
        .attr(CHAPTER_TYPE_ATTR)
        .is_some_and(|value| value.eq_ignore_ascii_case("chapter"))
}

/// First run of digit characters in a string, if any
fn first_number(text: &str) -> Option<&str> {
    FIRST_NUMBER.find(text).map(|m| m.as_str())
}
