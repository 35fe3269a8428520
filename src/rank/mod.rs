pub mod assemble;
pub mod keywords;
pub mod ranker;

use tracing::debug;

use crate::docs::PageIndex;

/// Turn a question into the bounded context blob for the model:
/// keywords, then ranking, then assembly (falling back to the site structure
/// when nothing matches).
pub fn relevant_context(
    index: &PageIndex,
    question: &str,
    top_k: usize,
    context_size: usize,
) -> String {
    let keywords = keywords::extract_keywords(question);
    let ranked = ranker::rank(index, &keywords, top_k);

    debug!(
        keywords = ?keywords,
        ranked = ranked.len(),
        top_score = ranked.first().map(|sp| sp.score).unwrap_or(0),
        "Ranked pages"
    );
    for sp in &ranked {
        debug!(page = %sp.page.id, score = sp.score, "  candidate");
    }

    let context = assemble::assemble(index, &ranked, context_size);
    debug!(
        context_len = context.chars().count(),
        fallback = ranked.is_empty(),
        "Context assembled"
    );
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::types::Page;

    fn index() -> PageIndex {
        PageIndex::new(vec![
            Page {
                id: "pricing.txt".to_string(),
                url: "https://example.com/pricing".to_string(),
                title: "Pricing".to_string(),
                headings: vec!["Plans".to_string()],
                raw_content: "--- Content ---\nThe Pro plan costs 20 EUR.".to_string(),
            },
            Page {
                id: "about.txt".to_string(),
                url: "https://example.com/about".to_string(),
                title: "About".to_string(),
                headings: vec!["History".to_string()],
                raw_content: "--- Content ---\nFounded in 2019.".to_string(),
            },
        ])
    }

    #[test]
    fn test_relevant_context_detail() {
        let context = relevant_context(&index(), "How much is the Pro plan?", 5, 8000);
        assert!(context.starts_with("--- Page: Pricing ---"));
        assert!(context.contains("The Pro plan costs 20 EUR."));
        assert!(!context.contains("About"));
    }

    #[test]
    fn test_relevant_context_fallback() {
        let context = relevant_context(&index(), "Who are you?", 5, 8000);
        assert!(context.starts_with("Website structure:"));
        assert!(context.contains("Page: Pricing"));
        assert!(context.contains("Page: About"));
        assert!(context.contains("- History"));
    }
}
