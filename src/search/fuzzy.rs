use crate::catalog::CatalogItem;
use rapidfuzz::distance::indel;
use std::collections::BTreeSet;

/// A catalog row paired with its request-local fuzzy score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub item: &'a CatalogItem,
    /// 0-100
    pub score: u8,
    /// Row index in the catalog.
    pub position: usize,
}

/// Best alignment of the shorter string against any equal-length window of
/// the longer one, as a 0-100 percentage of indel similarity
/// (`2 * matching / total` characters).
///
/// An exact substring scores 100; an empty side scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, short_chars, long, long_chars) = if a_chars.len() <= b_chars.len() {
        (a, a_chars, b, b_chars)
    } else {
        (b, b_chars, a, a_chars)
    };

    if short_chars.is_empty() {
        return 0;
    }
    if long.contains(short) {
        return 100;
    }

    let width = short_chars.len();
    let mut best = 0.0_f64;
    for window in long_chars.windows(width) {
        let similarity =
            indel::normalized_similarity(short_chars.iter().copied(), window.iter().copied());
        if similarity > best {
            best = similarity;
        }
    }
    (best * 100.0).round() as u8
}

/// Text a term is scored against: name and category, lower-cased.
fn haystack(item: &CatalogItem) -> Option<String> {
    item.match_fields()
        .map(|(name, category)| format!("{name} {category}").to_lowercase())
}

/// Score each item by its best term, keep those above `threshold`, and order
/// by score descending. The sort is stable, so equal scores stay in catalog
/// order.
pub fn fuzzy_matches<'a>(
    items: &'a [CatalogItem],
    terms: &BTreeSet<String>,
    threshold: u8,
) -> Vec<ScoredCandidate<'a>> {
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredCandidate<'a>> = items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| {
            let text = haystack(item)?;
            let score = terms
                .iter()
                .map(|term| partial_ratio(term, &text))
                .max()
                .unwrap_or(0);
            (score > threshold).then_some(ScoredCandidate {
                item,
                score,
                position,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
