/*!
 * Token-budgeted chunking of content elements.
 *
 * Serialized elements are packed greedily, in document order, into chunks
 * that stay under a token budget. The token count is a whitespace word
 * count, an approximation of model tokenization that matches how the budget
 * is calibrated.
 */

/// A token-bounded run of serialized content elements, sent as one
/// translation request
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Serialized elements, in document order
    pub elements: Vec<String>,
    /// Sum of the elements' token counts
    pub tokens: usize,
}

impl Chunk {
    fn new() -> Self {
        Self {
            elements: Vec::new(),
            tokens: 0,
        }
    }

    fn push(&mut self, element: String, tokens: usize) {
        self.elements.push(element);
        self.tokens += tokens;
    }

    fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The chunk's markup: its elements joined by newlines
    pub fn markup(&self) -> String {
        self.elements.join("\n")
    }
}

/// Approximate token count of a serialized element: the number of
/// whitespace-delimited words
pub fn token_count(element: &str) -> usize {
    element.split_whitespace().count()
}

/// Pack serialized elements into token-bounded chunks.
///
/// Single greedy scan, no lookahead: an element that would push the current
/// non-empty chunk over the budget closes it and starts the next one. An
/// element whose own token count exceeds the budget still becomes a chunk of
/// its own; elements are never split or dropped.
pub fn chunk_elements(elements: &[String], max_tokens: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = Chunk::new();

    for element in elements {
        let tokens = token_count(element);
        if current.tokens + tokens > max_tokens && !current.is_empty() {
            chunks.push(std::mem::replace(&mut current, Chunk::new()));
        }
        current.push(element.clone(), tokens);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
