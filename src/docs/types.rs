/// Page identifier: the crawled file name, unique within an index.
pub type PageId = String;

/// One crawled page, parsed once at load time and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub url: String,
    pub title: String,
    pub headings: Vec<String>,
    /// Full text of the crawled file, header lines included.
    pub raw_content: String,
}

/// A page paired with its relevance score for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredPage<'a> {
    pub page: &'a Page,
    pub score: usize,
}

/// A substring hit from the shell's `search` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<'a> {
    pub page: &'a Page,
    /// Window around the first match with every occurrence bracketed.
    pub snippet: String,
}
