//! Chunk ordering by product-signal density

use crate::chunking::TextChunk;

/// Count non-overlapping occurrences of `keywords` in `text`, case-insensitively
pub fn keyword_occurrences(text: &str, keywords: &[String]) -> usize {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .map(|k| haystack.matches(k.as_str()).count())
        .sum()
}

/// Score each chunk and order them most relevant first
///
/// The sort is stable: chunks with equal scores keep document order.
pub fn prioritize(mut chunks: Vec<TextChunk>, keywords: &[String]) -> Vec<TextChunk> {
    for chunk in &mut chunks {
        chunk.relevance = keyword_occurrences(&chunk.text(), keywords);
    }
    chunks.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    chunks
}
