use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::docs::types::{Page, ScoredPage};
use crate::docs::PageIndex;

/// Everything after the crawler's content marker is the page body.
static CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--- Content ---\s*([\s\S]*)").expect("static regex"));

/// Headings listed per page in the structural fallback.
pub const FALLBACK_HEADINGS: usize = 5;

const ELLIPSIS: &str = "...";

/// Build the context blob handed to the model.
///
/// With ranked pages, each gets a detail block whose body is cut to an equal
/// share of `context_size` characters. With none, every indexed page is listed
/// structurally (title, URL, first headings) so the model can still see what
/// the site covers. Block headers are not charged against the budget.
pub fn assemble(index: &PageIndex, ranked: &[ScoredPage<'_>], context_size: usize) -> String {
    if ranked.is_empty() {
        structure(index)
    } else {
        details(ranked, context_size)
    }
}

fn structure(index: &PageIndex) -> String {
    let mut out = String::from("Website structure:\n");
    for page in index.pages() {
        let _ = writeln!(out, "Page: {}", page.title);
        let _ = writeln!(out, "URL: {}", page.url);
        if !page.headings.is_empty() {
            out.push_str("Headings:\n");
            for heading in page.headings.iter().take(FALLBACK_HEADINGS) {
                let _ = writeln!(out, "- {}", heading);
            }
        }
        out.push('\n');
    }
    out
}

fn details(ranked: &[ScoredPage<'_>], context_size: usize) -> String {
    let share = context_size / ranked.len();
    let mut out = String::new();
    for sp in ranked {
        let _ = writeln!(out, "--- Page: {} ---", sp.page.title);
        let _ = writeln!(out, "URL: {}", sp.page.url);
        let _ = writeln!(out, "{}", truncate_chars(page_body(sp.page), share));
        out.push('\n');
    }
    out
}

/// The text after `--- Content ---` (trimmed), or the whole page if the marker is absent.
pub fn page_body(page: &Page) -> &str {
    CONTENT_RE
        .captures(&page.raw_content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(&page.raw_content)
}

/// Cut `text` to `max_chars` characters, appending an ellipsis when anything was dropped.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
