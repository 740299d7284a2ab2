//! Similarity between extracted candidates and existing catalog products

use crate::types::{Capacity, CatalogProduct, ProductCandidate, SimilarProduct};

const NAME_WEIGHT: f64 = 0.4;
const CATEGORY_WEIGHT: f64 = 0.3;
const MATERIAL_WEIGHT: f64 = 0.2;
const CAPACITY_WEIGHT: f64 = 0.1;

/// Fields compared by [`score`]
pub trait SimilarityProfile {
    /// Product name
    fn name(&self) -> &str;
    /// Category
    fn category(&self) -> &str;
    /// Primary material, if known
    fn material(&self) -> Option<&str>;
    /// Nominal capacity, if known
    fn capacity(&self) -> Option<&Capacity>;
}

impl SimilarityProfile for ProductCandidate {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn material(&self) -> Option<&str> {
        ProductCandidate::material(self)
    }

    fn capacity(&self) -> Option<&Capacity> {
        self.specifications.capacity.as_ref()
    }
}

impl SimilarityProfile for CatalogProduct {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    fn capacity(&self) -> Option<&Capacity> {
        self.capacity.as_ref()
    }
}

/// Edit distance between `a` and `b`, counted in chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Case-insensitive normalized name similarity in [0, 1]
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(&a, &b) as f64 / longest as f64
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Weighted similarity of two profiles in [0, 1]
///
/// Only signals present on both sides count; the weights of the signals
/// that do count are renormalized to sum to one.
pub fn score<A, B>(a: &A, b: &B) -> f64
where
    A: SimilarityProfile + ?Sized,
    B: SimilarityProfile + ?Sized,
{
    let mut total = 0.0;
    let mut weight = 0.0;

    if !a.name().trim().is_empty() && !b.name().trim().is_empty() {
        total += NAME_WEIGHT * name_similarity(a.name(), b.name());
        weight += NAME_WEIGHT;
    }

    if !a.category().trim().is_empty() && !b.category().trim().is_empty() {
        if same_text(a.category(), b.category()) {
            total += CATEGORY_WEIGHT;
        }
        weight += CATEGORY_WEIGHT;
    }

    if let (Some(ma), Some(mb)) = (a.material(), b.material()) {
        if same_text(ma, mb) {
            total += MATERIAL_WEIGHT;
        }
        weight += MATERIAL_WEIGHT;
    }

    if let (Some(ca), Some(cb)) = (a.capacity(), b.capacity()) {
        if let Some((va, vb)) = ca.comparable(cb) {
            if va > 0.0 && vb > 0.0 {
                total += CAPACITY_WEIGHT * (1.0 - (va - vb).abs() / va.max(vb));
                weight += CAPACITY_WEIGHT;
            }
        }
    }

    if weight == 0.0 {
        0.0
    } else {
        (total / weight).clamp(0.0, 1.0)
    }
}

/// Catalog products scoring at least `threshold`, best first, at most `limit`
pub fn find_similar(
    candidate: &ProductCandidate,
    catalog: &[CatalogProduct],
    threshold: f64,
    limit: usize,
) -> Vec<SimilarProduct> {
    let mut matches: Vec<SimilarProduct> = catalog
        .iter()
        .map(|existing| SimilarProduct {
            existing_product_id: existing.id.clone(),
            name: existing.name.clone(),
            score: score(candidate, existing),
        })
        .filter(|m| m.score >= threshold)
        .collect();

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(limit);
    matches
}
