pub mod ingest;
pub mod types;

use regex::RegexBuilder;

use types::{Page, SearchHit};

/// Characters shown before the first match in a search snippet.
const SNIPPET_LEAD: usize = 50;
/// Total snippet width in characters.
const SNIPPET_LEN: usize = 100;

/// Every loaded page in load order.
///
/// Built once at startup and read-only afterwards, so it can be shared
/// behind an `Arc` by any number of concurrent questions without locking.
#[derive(Debug)]
pub struct PageIndex {
    pages: Vec<Page>,
    /// Lowercased `raw_content`, parallel to `pages`, for case-insensitive scoring.
    lowered: Vec<String>,
}

impl PageIndex {
    pub fn new(pages: Vec<Page>) -> Self {
        let lowered = pages.iter().map(|p| p.raw_content.to_lowercase()).collect();
        Self { pages, lowered }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Pages alongside their lowercased content, in index order.
    pub(crate) fn lowered(&self) -> impl Iterator<Item = (&Page, &str)> {
        self.pages
            .iter()
            .zip(self.lowered.iter().map(String::as_str))
    }

    /// Case-insensitive substring search over page content.
    /// Returns one hit per matching page with a snippet around the first match.
    pub fn search(&self, term: &str) -> Vec<SearchHit<'_>> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }

        let Ok(pattern) = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        else {
            return Vec::new();
        };

        let mut hits = Vec::new();
        for page in &self.pages {
            let Some(found) = pattern.find(&page.raw_content) else {
                continue;
            };
            let match_char = page.raw_content[..found.start()].chars().count();
            let start = match_char.saturating_sub(SNIPPET_LEAD);
            let window: String = page
                .raw_content
                .chars()
                .skip(start)
                .take(SNIPPET_LEN)
                .collect();
            let snippet = pattern.replace_all(&window, "[$0]").into_owned();
            hits.push(SearchHit { page, snippet });
        }
        hits
    }
}
