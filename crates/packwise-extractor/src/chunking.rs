//! Token-budgeted chunking of line-oriented text

/// Estimate the token count of `text` (one token per four characters)
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Cost of a line inside a chunk, counting its joining newline
fn line_cost(line: &str) -> usize {
    (line.chars().count() + 1).div_ceil(4)
}

/// A contiguous run of lines sized to fit the provider's budget
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Position of this chunk in document order
    pub index: usize,

    /// Lines in document order
    pub lines: Vec<String>,

    /// Estimated tokens of the joined text
    pub estimated_tokens: usize,

    /// Priority keyword occurrences (ordering only)
    pub relevance: usize,
}

impl TextChunk {
    fn new(index: usize, lines: Vec<String>) -> Self {
        let estimated_tokens = estimate_tokens(&lines.join("\n"));
        Self {
            index,
            lines,
            estimated_tokens,
            relevance: 0,
        }
    }

    /// Lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Splits text into chunks whose estimated size stays within a budget
#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    budget: usize,
}

impl TextChunker {
    /// Create a chunker for a per-chunk token budget
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    /// Chunk `text` on line boundaries
    ///
    /// Text within budget becomes exactly one chunk. Otherwise lines are
    /// packed greedily; a single line over budget becomes its own chunk
    /// and is never split or dropped.
    ///
    /// Packing charges each line `ceil((chars + 1) / 4)`, counting the
    /// newline that joins it to the chunk. Charging `ceil(chars / 4)` alone
    /// lets the joined chunk estimate overshoot the budget (five 4-char
    /// lines cost 5 but join to 24 chars, 6 tokens), so chunks here close
    /// slightly earlier than a per-line-only count would.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        if estimate_tokens(text) <= self.budget {
            let lines = text.lines().map(str::to_string).collect();
            return vec![TextChunk::new(0, lines)];
        }

        let mut chunks = Vec::new();
        let mut current: Vec<String> = Vec::new();
        let mut accumulated = 0;

        for line in text.lines() {
            let cost = line_cost(line);
            if accumulated + cost > self.budget && !current.is_empty() {
                chunks.push(TextChunk::new(chunks.len(), std::mem::take(&mut current)));
                accumulated = 0;
            }
            current.push(line.to_string());
            accumulated += cost;
        }

        if !current.is_empty() {
            chunks.push(TextChunk::new(chunks.len(), current));
        }

        chunks
    }
}
