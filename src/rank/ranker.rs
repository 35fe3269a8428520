use std::collections::BTreeSet;

use crate::docs::types::ScoredPage;
use crate::docs::PageIndex;

/// Score every page against `keywords` and return the best `top_k`, highest first.
///
/// A page's score is the number of case-insensitive, non-overlapping substring
/// occurrences of each keyword in its raw content, summed over keywords. This is
/// a plain substring count, so "cat" also counts inside "category". Pages scoring
/// zero are dropped; ties keep index order. An empty result means nothing matched.
pub fn rank<'a>(
    index: &'a PageIndex,
    keywords: &BTreeSet<String>,
    top_k: usize,
) -> Vec<ScoredPage<'a>> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredPage<'a>> = index
        .lowered()
        .map(|(page, content)| ScoredPage {
            page,
            score: score(content, keywords),
        })
        .filter(|sp| sp.score > 0)
        .collect();

    // Stable sort: equal scores stay in index order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(top_k);
    scored
}

/// Keyword hits in already-lowercased content.
pub fn score(lowered_content: &str, keywords: &BTreeSet<String>) -> usize {
    keywords
        .iter()
        .map(|k| lowered_content.matches(k.as_str()).count())
        .sum()
}
