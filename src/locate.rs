//! Chapter location.
//!
//! A chapter starts at the first line matching its title and ends right
//! before the first line, after that start, matching the next chapter's
//! title:
//!
//! ```text
//! page 3 │ ...
//!        │ 2. Methods          <- start (first match of "Methods")
//!        │ We sampled ...
//! page 4 │ ... and so on.
//!        │ 3. Results          <- end, exclusive (first match of "Results"
//! page 5 │ ...                    after the start)
//! ```
//!
//! When the next title never appears, or there is no next chapter, the
//! chapter runs to the end of the document.
//!
//! The first physical occurrence wins on both ends. A table of contents
//! that repeats the headings verbatim will capture the start; restrict
//! heading candidates with [`TitleMatcher::with_max_line_chars`] or disable
//! the substring tier when that is a problem.

use crate::{normalize, page_marker, ChapterIndexEntry, PageBlock, TitleMatcher};

/// A line position inside a page sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PagePosition {
    /// Index into the page slice (not the page number).
    pub page_index: usize,
    /// Index into that page's lines.
    pub line_index: usize,
}

impl PagePosition {
    /// Create a position.
    #[must_use]
    pub const fn new(page_index: usize, line_index: usize) -> Self {
        Self {
            page_index,
            line_index,
        }
    }
}

/// The located extent of a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterSpan {
    /// The chapter's title line.
    pub start: PagePosition,
    /// One past the chapter's last line.
    pub end: PagePosition,
}

/// A line mentioning part of a title that could not be located.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearMiss {
    /// Page number of the line.
    pub page_number: u32,
    /// The line, trimmed.
    pub line: String,
}

/// Find the first line at or after `from` matching `title`.
fn find_title(
    pages: &[PageBlock],
    title: &str,
    from: PagePosition,
    matcher: &TitleMatcher,
) -> Option<PagePosition> {
    for (page_index, page) in pages.iter().enumerate().skip(from.page_index) {
        let first_line = if page_index == from.page_index {
            from.line_index
        } else {
            0
        };
        for (line_index, line) in page.lines.iter().enumerate().skip(first_line) {
            if let Some(tier) = matcher.match_tier(line, title) {
                tracing::debug!(
                    title,
                    page = page.page_number,
                    line = line_index,
                    %tier,
                    "title matched"
                );
                return Some(PagePosition::new(page_index, line_index));
            }
        }
    }
    None
}

/// Locate the span of `current`, bounded by `next` when it can be found.
///
/// Returns `None` when the current title appears nowhere.
#[must_use]
pub fn locate_span(
    pages: &[PageBlock],
    current: &ChapterIndexEntry,
    next: Option<&ChapterIndexEntry>,
    matcher: &TitleMatcher,
) -> Option<ChapterSpan> {
    let start = find_title(pages, &current.chapter_title, PagePosition::new(0, 0), matcher)?;

    let after_start = PagePosition::new(start.page_index, start.line_index + 1);
    let end = next
        .and_then(|next| find_title(pages, &next.chapter_title, after_start, matcher))
        .unwrap_or_else(|| {
            let last = pages.len() - 1;
            PagePosition::new(last, pages[last].lines.len())
        });

    Some(ChapterSpan { start, end })
}

/// Rebuild the text of a span, with a marker line in front of each page.
///
/// A final page that contributes no lines is left out.
#[must_use]
pub fn render(pages: &[PageBlock], span: ChapterSpan) -> String {
    let mut lines: Vec<String> = Vec::new();

    for page_index in span.start.page_index..=span.end.page_index {
        let page = &pages[page_index];
        let from = if page_index == span.start.page_index {
            span.start.line_index
        } else {
            0
        };
        let to = if page_index == span.end.page_index {
            span.end.line_index.min(page.lines.len())
        } else {
            page.lines.len()
        };
        if page_index != span.start.page_index && page_index == span.end.page_index && to == 0 {
            break;
        }

        lines.push(page_marker(page.page_number));
        lines.extend(page.lines[from..to.max(from)].iter().cloned());
    }

    lines.join("\n")
}

/// Locate a chapter and rebuild its content.
///
/// The content starts with the marker of the chapter's first page, followed
/// by the title line. Returns `None` when the title appears nowhere.
///
/// ```rust
/// use folio::{locate_chapter, split_pages, ChapterIndexEntry, TitleMatcher};
///
/// let pages = split_pages("=== PÁGINA 1 ===\nIntro\nhello\n=== PÁGINA 2 ===\nEnd\nbye");
/// let content = locate_chapter(
///     &pages,
///     &ChapterIndexEntry::flat("Intro"),
///     Some(&ChapterIndexEntry::flat("End")),
///     &TitleMatcher::new(),
/// );
/// assert_eq!(content.as_deref(), Some("=== PÁGINA 1 ===\nIntro\nhello"));
/// ```
#[must_use]
pub fn locate_chapter(
    pages: &[PageBlock],
    current: &ChapterIndexEntry,
    next: Option<&ChapterIndexEntry>,
    matcher: &TitleMatcher,
) -> Option<String> {
    locate_span(pages, current, next, matcher).map(|span| render(pages, span))
}

/// Lines that share a significant word with `title`.
///
/// Words match when one contains the other, so plurals and inflections
/// still hit.
///
/// Used to explain a missing chapter: if the outline says
/// `"Análisis de riesgos"` and the text has `"ANALISIS DE RIESGO"`, the near
/// misses point at it. Words shorter than `min_word_len` characters are
/// ignored. At most `limit` lines are returned, in document order.
#[must_use]
pub fn near_misses(
    pages: &[PageBlock],
    title: &str,
    min_word_len: usize,
    limit: usize,
) -> Vec<NearMiss> {
    let normalized = normalize(title);
    let keywords: Vec<&str> = normalized
        .split(' ')
        .filter(|w| !w.is_empty() && w.chars().count() >= min_word_len)
        .collect();
    if keywords.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for page in pages {
        for line in &page.lines {
            let candidate = normalize(line);
            if candidate
                .split(' ')
                .filter(|word| !word.is_empty() && word.chars().count() >= min_word_len)
                .any(|word| keywords.iter().any(|k| word.contains(k) || k.contains(word)))
            {
                hits.push(NearMiss {
                    page_number: page.page_number,
                    line: line.trim().to_string(),
                });
                if hits.len() == limit {
                    return hits;
                }
            }
        }
    }
    hits
}
