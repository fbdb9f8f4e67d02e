//! Segmenting located chapter content.
//!
//! Chapter content comes from [`locate_chapter`](crate::locate_chapter): page
//! marker lines interleaved with text lines, starting with the chapter's
//! title. Two shapes of chapter are handled.
//!
//! ## With subchapters
//!
//! Each declared subchapter title is searched independently; the first
//! matching line wins. Found titles are sorted by position, and each segment
//! runs from the line after its title to the line before the next found
//! title:
//!
//! ```text
//! === PÁGINA 4 ===
//! Methods                 (chapter title, before any subchapter: dropped)
//! 1. Data                 ─┐ title of "1. Data"
//! We collected ...         │ segment "1. Data"
//! === PÁGINA 5 ===         │ (marker: page bookkeeping only)
//! ... 300 samples.        ─┘
//! 2. Models               ─┐ title of "2. Models"
//! We fit ...              ─┘ segment "2. Models", runs to the end
//! ```
//!
//! Segments follow document order, not outline order: an outline that lists
//! `["B", "A"]` for a document with A before B yields A first.
//! Subchapters that cannot be found are skipped.
//!
//! ## Flat
//!
//! The whole chapter is one segment, titled like the chapter, with the
//! heading line removed if it is among the first few lines.
//!
//! ## Pages
//!
//! Marker lines never appear in segment text. A segment's page range covers
//! every page on which it has a non-blank line; an empty segment sits on the
//! page of its heading.

use serde::Serialize;

use crate::{page_marker_number, TitleMatcher, TokenCounter};

/// A bounded span of text attributed to one chapter or subchapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubChapterSegment {
    /// Title of the owning chapter.
    pub chapter_title: String,
    /// Subchapter title, or the chapter title for a flat chapter.
    pub title: String,
    /// The segment's lines, joined with `\n`, without page markers.
    pub text: String,
    /// Tokens in `text`, or 0 if counting failed.
    pub token_count: usize,
    /// First page with content. A segment that starts partway down a page
    /// reports that page, even when no marker falls inside its text.
    pub from_page: u32,
    /// Last page with content.
    pub to_page: u32,
}

/// One extracted section, ready for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResult {
    /// Title of the chapter, as given by the outline.
    pub chapter_title: String,
    /// First page of the section.
    pub from_page: u32,
    /// Last page of the section.
    pub to_page: u32,
    /// The segment itself.
    pub subchapter: SubChapterSegment,
}

impl From<SubChapterSegment> for SectionResult {
    fn from(segment: SubChapterSegment) -> Self {
        Self {
            chapter_title: segment.chapter_title.clone(),
            from_page: segment.from_page,
            to_page: segment.to_page,
            subchapter: segment,
        }
    }
}

impl std::fmt::Display for SectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Section {{ chapter: {:?}, title: {:?}, pages: {}..={}, tokens: {} }}",
            self.chapter_title,
            self.subchapter.title,
            self.from_page,
            self.to_page,
            self.subchapter.token_count
        )
    }
}

/// Sections produced for one chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterSegments {
    /// Sections in document order.
    pub sections: Vec<SectionResult>,
    /// How many segments got a zero count because the counter failed.
    pub token_failures: usize,
}

/// Chapter content split into lines, with the page in effect at each line.
struct ContentLines<'a> {
    lines: Vec<&'a str>,
    markers: Vec<bool>,
    pages: Vec<Option<u32>>,
}

impl<'a> ContentLines<'a> {
    fn parse(content: &'a str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        let mut markers = Vec::with_capacity(lines.len());
        let mut pages = Vec::with_capacity(lines.len());
        let mut current = None;
        for line in &lines {
            let marker = page_marker_number(line);
            if marker.is_some() {
                current = marker;
            }
            markers.push(marker.is_some());
            pages.push(current);
        }
        Self {
            lines,
            markers,
            pages,
        }
    }

    fn is_marker(&self, index: usize) -> bool {
        self.markers[index]
    }

    /// Text of the given lines, marker lines removed.
    fn text(&self, indices: &[usize]) -> String {
        indices
            .iter()
            .filter(|&&i| !self.is_marker(i))
            .map(|&i| self.lines[i])
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Page range of the non-blank lines among `indices`.
    ///
    /// `anchor` is the heading line the lines belong to, used when none of
    /// them has content.
    fn page_range(&self, indices: &[usize], anchor: Option<usize>) -> (u32, u32) {
        let content_pages = indices
            .iter()
            .filter(|&&i| !self.is_marker(i) && !self.lines[i].trim().is_empty())
            .filter_map(|&i| self.pages[i]);

        let bounds = content_pages.fold(None, |bounds, page| match bounds {
            Some((from, to)) => Some((page.min(from), page.max(to))),
            None => Some((page, page)),
        });

        bounds.unwrap_or_else(|| {
            let page = anchor
                .and_then(|i| self.pages[i])
                .or_else(|| indices.iter().find_map(|&i| self.pages[i]))
                .unwrap_or(1);
            (page, page)
        })
    }
}

fn count_tokens(
    counter: &dyn TokenCounter,
    chapter_title: &str,
    title: &str,
    text: &str,
    failures: &mut usize,
) -> usize {
    match counter.count_tokens(text) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(chapter = chapter_title, title, error = %e, "token count failed, using 0");
            *failures += 1;
            0
        }
    }
}

/// Split a chapter into its declared subchapters.
///
/// ```rust
/// use folio::{segment_subchapters, TitleMatcher};
///
/// let content = "=== PÁGINA 2 ===\nGuide\n1. Overview\nintro\n2. Details\nmore\n=== PÁGINA 3 ===\nend";
/// let titles = vec!["1. Overview".to_string(), "2. Details".to_string()];
/// let counter = |text: &str| text.split_whitespace().count();
///
/// let out = segment_subchapters("Guide", &titles, content, &TitleMatcher::new(), &counter);
/// assert_eq!(out.sections.len(), 2);
/// assert_eq!(out.sections[0].subchapter.text, "intro");
/// assert_eq!(out.sections[1].subchapter.text, "more\nend");
/// assert_eq!((out.sections[1].from_page, out.sections[1].to_page), (2, 3));
/// ```
#[must_use]
pub fn segment_subchapters(
    chapter_title: &str,
    subchapter_titles: &[String],
    content: &str,
    matcher: &TitleMatcher,
    counter: &dyn TokenCounter,
) -> ChapterSegments {
    let content = ContentLines::parse(content);

    let mut found: Vec<(usize, &str)> = Vec::with_capacity(subchapter_titles.len());
    for title in subchapter_titles {
        let hit = (0..content.lines.len())
            .filter(|&i| !content.is_marker(i))
            .find(|&i| matcher.matches_enumerated(content.lines[i], title));

        match hit {
            Some(index) if found.iter().any(|&(taken, _)| taken == index) => {
                tracing::debug!(
                    chapter = chapter_title,
                    title = title.as_str(),
                    line = index,
                    "subchapter heading already claimed by an earlier title"
                );
            }
            Some(index) => found.push((index, title.as_str())),
            None => {
                tracing::debug!(chapter = chapter_title, title = title.as_str(), "subchapter not found");
            }
        }
    }
    found.sort_by_key(|&(index, _)| index);

    let mut out = ChapterSegments::default();
    for (i, &(heading, title)) in found.iter().enumerate() {
        let end = found
            .get(i + 1)
            .map_or(content.lines.len(), |&(next, _)| next);
        let body: Vec<usize> = (heading + 1..end).collect();

        let text = content.text(&body);
        let (from_page, to_page) = content.page_range(&body, Some(heading));
        let token_count = count_tokens(counter, chapter_title, title, &text, &mut out.token_failures);

        out.sections.push(
            SubChapterSegment {
                chapter_title: chapter_title.to_string(),
                title: title.to_string(),
                text,
                token_count,
                from_page,
                to_page,
            }
            .into(),
        );
    }

    tracing::info!(
        chapter = chapter_title,
        found = found.len(),
        declared = subchapter_titles.len(),
        "subchapters segmented"
    );
    out
}

/// Turn a chapter without subchapters into a single section.
///
/// The first line among the first `lookahead` lines that matches the chapter
/// title is removed; everything else is the segment's text.
///
/// ```rust
/// use folio::{segment_flat, TitleMatcher, WordCount};
///
/// let out = segment_flat(
///     "Conclusion",
///     "=== PÁGINA 2 ===\nConclusion\nBye",
///     3,
///     &TitleMatcher::new(),
///     &WordCount,
/// );
/// assert_eq!(out.sections[0].subchapter.text, "Bye");
/// assert_eq!(out.sections[0].from_page, 2);
/// ```
#[must_use]
pub fn segment_flat(
    chapter_title: &str,
    content: &str,
    lookahead: usize,
    matcher: &TitleMatcher,
    counter: &dyn TokenCounter,
) -> ChapterSegments {
    let content = ContentLines::parse(content);
    let len = content.lines.len();

    let heading = (0..len.min(lookahead))
        .filter(|&i| !content.is_marker(i))
        .find(|&i| matcher.matches(content.lines[i], chapter_title));

    let body: Vec<usize> = (0..len).filter(|&i| Some(i) != heading).collect();
    let text = content.text(&body);
    let (from_page, to_page) = content.page_range(&body, heading);

    let mut out = ChapterSegments::default();
    let token_count = count_tokens(
        counter,
        chapter_title,
        chapter_title,
        &text,
        &mut out.token_failures,
    );
    out.sections.push(
        SubChapterSegment {
            chapter_title: chapter_title.to_string(),
            title: chapter_title.to_string(),
            text,
            token_count,
            from_page,
            to_page,
        }
        .into(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TokenCountError, WordCount};

    struct Failing;

    impl TokenCounter for Failing {
        fn count_tokens(&self, _text: &str) -> Result<usize, TokenCountError> {
            Err(TokenCountError::new("tokenizer offline"))
        }
    }

    fn titles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_subchapters_in_order() {
        let content = "=== PÁGINA 1 ===\nGuide\n1. Overview\na\nb\n2. Details\nc\n=== PÁGINA 2 ===\nd";
        let out = segment_subchapters(
            "Guide",
            &titles(&["1. Overview", "2. Details"]),
            content,
            &TitleMatcher::new(),
            &WordCount,
        );

        assert_eq!(out.sections.len(), 2);
        let first = &out.sections[0].subchapter;
        assert_eq!(first.title, "1. Overview");
        assert_eq!(first.text, "a\nb");
        assert_eq!((first.from_page, first.to_page), (1, 1));
        assert_eq!(first.token_count, 2);

        let second = &out.sections[1].subchapter;
        assert_eq!(second.text, "c\nd");
        assert_eq!((second.from_page, second.to_page), (1, 2));
    }

    #[test]
    fn test_numbered_titles_stay_distinct() {
        let content = "=== PÁGINA 1 ===\nReport\n2021 Results\nx\n2020 Results\ny";
        let out = segment_subchapters(
            "Report",
            &titles(&["2020 Results", "2021 Results"]),
            content,
            &TitleMatcher::new(),
            &WordCount,
        );

        assert_eq!(out.sections.len(), 2);
        assert_eq!(out.sections[0].subchapter.title, "2021 Results");
        assert_eq!(out.sections[0].subchapter.text, "x");
        assert_eq!(out.sections[1].subchapter.title, "2020 Results");
        assert_eq!(out.sections[1].subchapter.text, "y");
    }

    #[test]
    fn test_document_order_wins() {
        let content = "=== PÁGINA 1 ===\nA\nx\nB\ny";
        let out = segment_subchapters(
            "Ch",
            &titles(&["B", "A"]),
            content,
            &TitleMatcher::new(),
            &WordCount,
        );
        let found: Vec<_> = out.sections.iter().map(|s| s.subchapter.title.as_str()).collect();
        assert_eq!(found, ["A", "B"]);
        assert_eq!(out.sections[0].subchapter.text, "x");
    }

    #[test]
    fn test_missing_subchapter_skipped() {
        let content = "=== PÁGINA 1 ===\nCh\nAlpha\none\nGamma\nthree";
        let out = segment_subchapters(
            "Ch",
            &titles(&["Alpha", "Beta", "Gamma"]),
            content,
            &TitleMatcher::new(),
            &WordCount,
        );
        assert_eq!(out.sections.len(), 2);
        assert_eq!(out.sections[0].subchapter.text, "one");
        assert_eq!(out.sections[1].subchapter.text, "three");
    }

    #[test]
    fn test_shared_heading_line() {
        // "Details" would also match the "More Details" line first
        let content = "=== PÁGINA 1 ===\nMore Details\nx\nDetails\ny";
        let out = segment_subchapters(
            "Ch",
            &titles(&["More Details", "Details"]),
            content,
            &TitleMatcher::new(),
            &WordCount,
        );
        assert_eq!(out.sections.len(), 1);
        assert_eq!(out.sections[0].subchapter.text, "x\nDetails\ny");
    }

    #[test]
    fn test_page_of_heading_without_marker() {
        let content = "=== PÁGINA 7 ===\nCh\nfiller\nOnly\nbody";
        let out = segment_subchapters(
            "Ch",
            &titles(&["Only"]),
            content,
            &TitleMatcher::new(),
            &WordCount,
        );
        assert_eq!(out.sections[0].from_page, 7);
        assert_eq!(out.sections[0].to_page, 7);
    }

    #[test]
    fn test_empty_segment_sits_on_heading_page() {
        let content = "=== PÁGINA 3 ===\nCh\nA\n=== PÁGINA 4 ===\nB\nbody";
        let out = segment_subchapters(
            "Ch",
            &titles(&["A", "B"]),
            content,
            &TitleMatcher::new(),
            &WordCount,
        );
        let a = &out.sections[0];
        assert_eq!(a.subchapter.text, "");
        assert_eq!((a.from_page, a.to_page), (3, 3));
        assert_eq!((out.sections[1].from_page, out.sections[1].to_page), (4, 4));
    }

    #[test]
    fn test_flat_removes_heading() {
        let out = segment_flat(
            "Introduction",
            "=== PÁGINA 1 ===\nIntroduction\nHello world",
            3,
            &TitleMatcher::new(),
            &WordCount,
        );
        assert_eq!(out.sections.len(), 1);
        let section = &out.sections[0];
        assert_eq!(section.chapter_title, "Introduction");
        assert_eq!(section.subchapter.title, "Introduction");
        assert_eq!(section.subchapter.text, "Hello world");
        assert_eq!(section.subchapter.token_count, 2);
        assert_eq!((section.from_page, section.to_page), (1, 1));
    }

    #[test]
    fn test_flat_heading_beyond_lookahead_kept() {
        let out = segment_flat(
            "Intro",
            "=== PÁGINA 1 ===\na\nb\nIntro\nc",
            3,
            &TitleMatcher::new(),
            &WordCount,
        );
        assert_eq!(out.sections[0].subchapter.text, "a\nb\nIntro\nc");
    }

    #[test]
    fn test_flat_spanning_pages() {
        let out = segment_flat(
            "Annex",
            "=== PÁGINA 9 ===\nAnnex\nx\n=== PÁGINA 10 ===\ny\n=== PÁGINA 11 ===\nz",
            3,
            &TitleMatcher::new(),
            &WordCount,
        );
        let section = &out.sections[0];
        assert_eq!(section.subchapter.text, "x\ny\nz");
        assert_eq!((section.from_page, section.to_page), (9, 11));
    }

    #[test]
    fn test_no_markers_defaults_to_page_one() {
        let out = segment_flat("T", "T\nbody", 3, &TitleMatcher::new(), &WordCount);
        assert_eq!((out.sections[0].from_page, out.sections[0].to_page), (1, 1));
    }

    #[test]
    fn test_token_failure_is_zero() {
        let out = segment_flat(
            "Intro",
            "=== PÁGINA 1 ===\nIntro\ntext",
            3,
            &TitleMatcher::new(),
            &Failing,
        );
        assert_eq!(out.token_failures, 1);
        assert_eq!(out.sections[0].subchapter.token_count, 0);
        assert_eq!(out.sections[0].subchapter.text, "text");
    }

    #[test]
    fn test_section_mirrors_segment() {
        let out = segment_flat(
            "X",
            "=== PÁGINA 5 ===\nX\nbody",
            3,
            &TitleMatcher::new(),
            &WordCount,
        );
        let section = &out.sections[0];
        assert_eq!(section.chapter_title, section.subchapter.chapter_title);
        assert_eq!(section.from_page, section.subchapter.from_page);
        assert_eq!(section.to_page, section.subchapter.to_page);
    }
}
