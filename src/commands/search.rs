use std::fmt::Write as _;

use crate::docs::PageIndex;

/// Pages containing `term`, each with a highlighted snippet.
pub fn search(index: &PageIndex, term: &str) -> String {
    let mut output = format!("\nSearching for '{}':\n", term);
    let hits = index.search(term);

    for hit in &hits {
        let _ = writeln!(output, "  Found in: {}", hit.page.title);
        let _ = writeln!(output, "  URL: {}", hit.page.url);
        let _ = writeln!(output, "  Context: \"...{}...\"", hit.snippet);
        output.push('\n');
    }

    if hits.is_empty() {
        output.push_str("  No matches found on the website.\n");
    } else {
        let _ = writeln!(output, "  Found matches in {} pages.", hits.len());
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::ingest::parse_page;

    fn index() -> PageIndex {
        PageIndex::new(vec![
            parse_page("a.txt", "Title: Home\n--- Content ---\nWelcome to Acme support."),
            parse_page("b.txt", "Title: Jobs\n--- Content ---\nWe are hiring."),
        ])
    }

    #[test]
    fn test_search_reports_hits() {
        let output = search(&index(), "SUPPORT");
        assert!(output.contains("  Found in: Home\n"));
        assert!(output.contains("[support]"));
        assert!(!output.contains("Jobs"));
        assert!(output.ends_with("  Found matches in 1 pages.\n"));
    }

    #[test]
    fn test_search_no_hits() {
        let output = search(&index(), "pricing");
        assert!(output.ends_with("  No matches found on the website.\n"));
    }
}
