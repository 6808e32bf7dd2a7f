/*!
 * Tests for token-budgeted chunking
 */

use bookwai::chunker::{Chunk, chunk_elements, token_count};

use crate::common::element_with_words;

fn elements(word_counts: &[usize]) -> Vec<String> {
    word_counts
        .iter()
        .map(|&count| element_with_words(count))
        .collect()
}

fn chunk_token_sums(chunks: &[Chunk]) -> Vec<usize> {
    chunks.iter().map(|chunk| chunk.tokens).collect()
}

/// Test the token approximation
#[test]
fn test_token_count_withMarkup_shouldCountWhitespaceWords() {
    assert_eq!(token_count("<p>one two three</p>"), 3);
    assert_eq!(token_count("<h1>Title</h1>"), 1);
    assert_eq!(token_count(""), 0);
    assert_eq!(token_count("  spaced   out  "), 2);
}

/// Test that a sequence under budget stays in one chunk
#[test]
fn test_chunk_elements_withEverythingUnderBudget_shouldProduceSingleChunk() {
    let input = elements(&[100, 400, 50]);
    let chunks = chunk_elements(&input, 600);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].elements, input);
    assert_eq!(chunks[0].tokens, 550);
}

/// Test the flush just before an element would exceed the budget
#[test]
fn test_chunk_elements_withBudgetOverflow_shouldFlushBeforeElement() {
    let input = elements(&[300, 300, 300]);
    let chunks = chunk_elements(&input, 600);

    // 300+300 fills the budget exactly; the third element starts a new chunk
    assert_eq!(chunk_token_sums(&chunks), vec![600, 300]);
    assert_eq!(chunks[0].elements, input[..2].to_vec());
    assert_eq!(chunks[1].elements, input[2..].to_vec());
}

/// Boundary case: every element that would push past the budget closes the
/// running chunk, so no multi-element chunk ever exceeds it
#[test]
fn test_chunk_elements_withTightBudget_shouldKeepEveryChunkUnderBudget() {
    let input = elements(&[100, 550, 600]);
    let chunks = chunk_elements(&input, 600);

    assert_eq!(chunk_token_sums(&chunks), vec![100, 550, 600]);
    for chunk in &chunks {
        assert!(chunk.tokens <= 600 || chunk.elements.len() == 1);
    }
}

/// Test that an oversized single element becomes its own chunk
#[test]
fn test_chunk_elements_withOversizedElement_shouldEmitItAlone() {
    let input = elements(&[700]);
    let chunks = chunk_elements(&input, 600);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].tokens, 700);
    assert_eq!(chunks[0].elements.len(), 1);
}

/// Test that an oversized leading element does not swallow its successor
#[test]
fn test_chunk_elements_withOversizedThenSmall_shouldSplitAfterOversized() {
    let input = elements(&[700, 10]);
    let chunks = chunk_elements(&input, 600);

    assert_eq!(chunk_token_sums(&chunks), vec![700, 10]);
}

/// Test that chunking loses, duplicates and reorders nothing
#[test]
fn test_chunk_elements_withMixedSizes_shouldPreserveOrderAndContent() {
    let input = elements(&[1, 250, 90, 610, 3, 3, 3, 580, 20, 42]);
    let chunks = chunk_elements(&input, 600);

    let reassembled: Vec<String> = chunks
        .iter()
        .flat_map(|chunk| chunk.elements.iter().cloned())
        .collect();
    assert_eq!(reassembled, input);

    for chunk in &chunks {
        assert!(chunk.tokens <= 600 || chunk.elements.len() == 1);
        assert!(!chunk.elements.is_empty());
    }
}

/// Test that empty input yields no chunks
#[test]
fn test_chunk_elements_withNoElements_shouldProduceNoChunks() {
    let chunks = chunk_elements(&[], 600);
    assert!(chunks.is_empty());
}

/// Test the chunk markup join
#[test]
fn test_chunk_markup_withMultipleElements_shouldJoinWithNewlines() {
    let input = vec!["<p>a b</p>".to_string(), "<p>c d</p>".to_string()];
    let chunks = chunk_elements(&input, 600);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].markup(), "<p>a b</p>\n<p>c d</p>");
}
