//! Cross-chunk deduplication of product candidates
//!
//! Identity is the exact case-insensitive `name|category` pair. Near
//! duplicates ("Bottle A 250ml" vs "Bottle A - 250 ml") are kept; they are
//! left for the reviewer, helped by the similarity annotations.

use crate::types::ProductCandidate;
use std::collections::HashSet;

/// Identity of a candidate across chunks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    /// Key for `product`
    pub fn of(product: &ProductCandidate) -> Self {
        DedupKey(format!(
            "{}|{}",
            product.name.trim().to_lowercase(),
            product.category.trim().to_lowercase()
        ))
    }

    /// Key as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Deduplicated candidates
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    /// Unique candidates, first occurrence kept, input order preserved
    pub products: Vec<ProductCandidate>,

    /// Input position of each kept candidate, parallel to `products`
    pub kept: Vec<usize>,

    /// Number of candidates dropped as duplicates
    pub removed: usize,
}

/// Drop candidates whose key has already been seen
pub fn dedupe(candidates: Vec<ProductCandidate>) -> DedupOutcome {
    let total = candidates.len();
    let mut seen = HashSet::with_capacity(total);
    let (kept, products): (Vec<usize>, Vec<ProductCandidate>) = candidates
        .into_iter()
        .enumerate()
        .filter(|(_, product)| seen.insert(DedupKey::of(product)))
        .unzip();

    DedupOutcome {
        removed: total - products.len(),
        products,
        kept,
    }
}
