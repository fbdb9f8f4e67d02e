//! Page splitting.
//!
//! Extracted text arrives as one string with a marker line in front of every
//! page:
//!
//! ```text
//! === PÁGINA 1 ===
//! Introduction
//! Hello world
//! === PÁGINA 2 ===
//! Conclusion
//! ```
//!
//! Markers are matched case-insensitively and tolerate extra whitespace
//! around their tokens (`  ===página   7=== ` is page 7). Lines before the
//! first marker belong to no page and are dropped.

use std::sync::LazyLock;

use regex::Regex;

static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*===\s*PÁGINA\s*(\d+)\s*===\s*$").unwrap());

/// One page of extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBlock {
    /// One-based page number taken from the marker.
    pub page_number: u32,
    /// The page's lines, in order, without line terminators.
    pub lines: Vec<String>,
}

impl PageBlock {
    /// Create a page block.
    #[must_use]
    pub fn new(page_number: u32, lines: Vec<String>) -> Self {
        Self { page_number, lines }
    }

    /// Number of lines on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the page has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parse a page marker line, returning its page number.
///
/// Page `0` and numbers that overflow `u32` are not markers.
///
/// ```rust
/// use folio::page_marker_number;
///
/// assert_eq!(page_marker_number("=== PÁGINA 12 ==="), Some(12));
/// assert_eq!(page_marker_number("  === página 3===  "), Some(3));
/// assert_eq!(page_marker_number("PÁGINA 3"), None);
/// ```
#[must_use]
pub fn page_marker_number(line: &str) -> Option<u32> {
    let caps = PAGE_MARKER_RE.captures(line)?;
    caps[1].parse::<u32>().ok().filter(|&n| n > 0)
}

/// Whether `line` is a page marker.
#[must_use]
pub fn is_page_marker(line: &str) -> bool {
    page_marker_number(line).is_some()
}

/// Render the canonical marker line for a page.
#[must_use]
pub fn page_marker(page_number: u32) -> String {
    format!("=== PÁGINA {page_number} ===")
}

/// Split raw text into pages.
///
/// Returns an empty vector when the text has no markers.
///
/// ```rust
/// use folio::split_pages;
///
/// let pages = split_pages("preamble\n=== PÁGINA 1 ===\na\nb\n=== PÁGINA 2 ===\nc");
/// assert_eq!(pages.len(), 2);
/// assert_eq!(pages[0].lines, vec!["a", "b"]);
/// assert_eq!(pages[1].page_number, 2);
/// ```
#[must_use]
pub fn split_pages(text: &str) -> Vec<PageBlock> {
    let mut pages = Vec::new();
    let mut current: Option<PageBlock> = None;

    for line in text.lines() {
        if let Some(number) = page_marker_number(line) {
            if let Some(page) = current.take() {
                pages.push(page);
            }
            current = Some(PageBlock::new(number, Vec::new()));
        } else if let Some(page) = current.as_mut() {
            page.lines.push(line.to_string());
        }
    }

    if let Some(page) = current {
        pages.push(page);
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers() {
        assert!(split_pages("just some text\nwithout pages").is_empty());
        assert!(split_pages("").is_empty());
    }

    #[test]
    fn test_preamble_dropped() {
        let pages = split_pages("cover\n=== PÁGINA 1 ===\nbody");
        assert_eq!(pages, vec![PageBlock::new(1, vec!["body".into()])]);
    }

    #[test]
    fn test_marker_tolerance() {
        assert_eq!(page_marker_number("===PÁGINA 4==="), Some(4));
        assert_eq!(page_marker_number("=== página 4 ==="), Some(4));
        assert_eq!(page_marker_number("\t===   PÁGINA   4   ===  "), Some(4));
        assert_eq!(page_marker_number("== PÁGINA 4 =="), None);
        assert_eq!(page_marker_number("see === PÁGINA 4 ==="), None);
    }

    #[test]
    fn test_invalid_page_numbers() {
        assert_eq!(page_marker_number("=== PÁGINA 0 ==="), None);
        assert_eq!(page_marker_number("=== PÁGINA 99999999999 ==="), None);

        // An invalid marker is kept as content
        let pages = split_pages("=== PÁGINA 1 ===\n=== PÁGINA 0 ===");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines, vec!["=== PÁGINA 0 ==="]);
    }

    #[test]
    fn test_empty_pages_kept() {
        let pages = split_pages("=== PÁGINA 1 ===\n=== PÁGINA 2 ===\nx");
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_empty());
        assert_eq!(pages[1].len(), 1);
    }

    #[test]
    fn test_crlf() {
        let pages = split_pages("=== PÁGINA 1 ===\r\nline one\r\nline two\r\n");
        assert_eq!(pages[0].lines, vec!["line one", "line two"]);
    }

    #[test]
    fn test_marker_round_trip() {
        assert_eq!(page_marker_number(&page_marker(17)), Some(17));
    }
}
