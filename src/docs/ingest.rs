use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::types::Page;
use super::PageIndex;
use crate::error::AssistantError;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Source URL: (.+)").expect("static regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Title: (.+)").expect("static regex"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"H\d: (.+)").expect("static regex"));

const UNKNOWN_URL: &str = "Unknown URL";
const UNTITLED: &str = "Untitled Page";

/// Parse one crawled file. Header lines written by the crawler look like
/// `Source URL: ...`, `Title: ...` and `H2: ...`; missing ones get placeholders.
pub fn parse_page(id: &str, raw: &str) -> Page {
    let first = |re: &Regex| {
        re.captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    Page {
        id: id.to_string(),
        url: first(&URL_RE).unwrap_or_else(|| UNKNOWN_URL.to_string()),
        title: first(&TITLE_RE).unwrap_or_else(|| UNTITLED.to_string()),
        headings: HEADING_RE
            .captures_iter(raw)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect(),
        raw_content: raw.to_string(),
    }
}

/// Load every `*.txt` file in `dir` into a fresh index, in file-name order.
///
/// Empty files and byte-identical duplicates are skipped; unreadable files are
/// logged and skipped. A missing folder or an empty result is a configuration error.
pub fn load_pages(dir: &Path) -> Result<PageIndex, AssistantError> {
    if !dir.is_dir() {
        return Err(AssistantError::Configuration(format!(
            "Folder '{}' not found. Please run the web crawler first.",
            dir.display()
        )));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        AssistantError::Configuration(format!("Cannot read folder '{}': {}", dir.display(), e))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    let mut seen = HashSet::new();
    let mut pages = Vec::with_capacity(files.len());

    for path in &files {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %path.display(), "Failed to read page: {}", e);
                continue;
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        if text.trim().is_empty() {
            debug!(path = %path.display(), "Skipping empty page");
            continue;
        }

        if !seen.insert(blake3::hash(&bytes)) {
            debug!(path = %path.display(), "Skipping duplicate page");
            continue;
        }

        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pages.push(parse_page(&id, &text));
    }

    if pages.is_empty() {
        return Err(AssistantError::Configuration(format!(
            "No text files found in the '{}' folder. Please run the web crawler first.",
            dir.display()
        )));
    }

    info!(pages = pages.len(), files = files.len(), "Pages loaded");
    Ok(PageIndex::new(pages))
}

/// Load pages off the async runtime; the crawl folder may hold thousands of files.
pub async fn load(dir: PathBuf) -> Result<PageIndex, AssistantError> {
    tokio::task::spawn_blocking(move || load_pages(&dir))
        .await
        .map_err(|e| AssistantError::Configuration(format!("Page loader task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Source URL: https://example.com/pricing \n\
        Title: Pricing Plans\n\
        H1: Plans\n\
        H2: Enterprise\n\
        --- Content ---\n\
        Our plans start at 10 EUR.";

    #[test]
    fn test_parse_page_headers() {
        let page = parse_page("pricing.txt", SAMPLE);
        assert_eq!(page.id, "pricing.txt");
        assert_eq!(page.url, "https://example.com/pricing");
        assert_eq!(page.title, "Pricing Plans");
        assert_eq!(page.headings, vec!["Plans", "Enterprise"]);
        assert_eq!(page.raw_content, SAMPLE);
    }

    #[test]
    fn test_parse_page_placeholders() {
        let page = parse_page("bare.txt", "just some text");
        assert_eq!(page.url, "Unknown URL");
        assert_eq!(page.title, "Untitled Page");
        assert!(page.headings.is_empty());
    }

    #[test]
    fn test_load_missing_folder() {
        let err = load_pages(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, AssistantError::Configuration(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        let err = load_pages(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No text files"));
    }

    #[test]
    fn test_load_sorted_skips_empty_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "Title: B\nbody b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "Title: A\nbody a").unwrap();
        std::fs::write(dir.path().join("a_copy.txt"), "Title: A\nbody a").unwrap();
        std::fs::write(dir.path().join("empty.txt"), "  \n").unwrap();
        std::fs::write(dir.path().join("skip.html"), "Title: H").unwrap();

        let index = load_pages(dir.path()).unwrap();
        let ids: Vec<&str> = index.pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a.txt", "b.txt"]);
        assert_eq!(index.pages()[1].title, "B");
    }

    #[tokio::test]
    async fn test_async_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), "Title: One\nhello").unwrap();
        let index = load(dir.path().to_path_buf()).await.unwrap();
        assert_eq!(index.len(), 1);
    }
}
