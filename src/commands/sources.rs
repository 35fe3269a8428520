use std::fmt::Write as _;

use crate::docs::PageIndex;

/// Numbered listing of every indexed page.
pub fn list(index: &PageIndex) -> String {
    let mut output = String::from("\nIndexed Website Pages:\n");
    for (i, page) in index.pages().iter().enumerate() {
        let _ = writeln!(output, "  {}. {}", i + 1, page.title);
        let _ = writeln!(output, "     URL: {}", page.url);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::ingest::parse_page;

    #[test]
    fn test_list_numbers_pages_in_order() {
        let index = PageIndex::new(vec![
            parse_page("a.txt", "Source URL: https://a.example\nTitle: Home"),
            parse_page("b.txt", "Title: Contact"),
        ]);
        let output = list(&index);
        assert_eq!(
            output,
            "\nIndexed Website Pages:\n  1. Home\n     URL: https://a.example\n  2. Contact\n     URL: Unknown URL\n"
        );
    }
}
