//! The extraction loop.
//!
//! ```text
//! raw text ──split_pages──> [PageBlock]
//!                              │
//! outline ── for each chapter ─┤
//!                              ├─ locate_chapter ── None ──> NotFound (warn, skip)
//!                              │        │
//!                              │      Some(content)
//!                              │        │
//!                              │   shape()? ── WithSubchapters ──> segment_subchapters
//!                              │        └───── Flat ─────────────> segment_flat
//!                              ▼
//!                  Vec<SectionResult> + DiagnosticsReport
//! ```
//!
//! No chapter can fail the run. The only errors are input validation errors,
//! and [`Extractor::extract`] turns even those into an empty result.

use std::sync::Arc;

use crate::{
    locate_chapter, near_misses, segment_flat, segment_subchapters, split_pages,
    ChapterIndexEntry, ChapterReport, ChapterSegments, ChapterShape, ChapterStatus, ConfigError,
    DiagnosticsReport, Error, ExtractConfig, PageBlock, Result, SectionResult, TitleMatcher,
    TokenCounter,
};
use crate::outline::validate_outline;

/// Sections extracted from one document, with diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Sections in outline order; within a chapter, in document order.
    pub sections: Vec<SectionResult>,
    /// What was found and what was not.
    pub report: DiagnosticsReport,
}

impl Extraction {
    /// Drop the report, keeping the sections.
    #[must_use]
    pub fn into_sections(self) -> Vec<SectionResult> {
        self.sections
    }
}

/// Extracts outline sections from paginated text.
///
/// ## Example
///
/// ```rust
/// use folio::{ChapterIndexEntry, Extractor, WordCount};
///
/// let text = "=== PÁGINA 1 ===\nIntroduction\nHello world\n=== PÁGINA 2 ===\nConclusion\nBye";
/// let outline = [
///     ChapterIndexEntry::flat("Introduction"),
///     ChapterIndexEntry::flat("Conclusion"),
/// ];
///
/// let extraction = Extractor::new(WordCount).extract(text, &outline);
/// assert_eq!(extraction.sections.len(), 2);
/// assert_eq!(extraction.sections[1].subchapter.text, "Bye");
/// assert_eq!(extraction.sections[1].from_page, 2);
/// assert!(extraction.report.is_complete());
/// ```
#[derive(Clone)]
pub struct Extractor {
    config: ExtractConfig,
    matcher: TitleMatcher,
    counter: Arc<dyn TokenCounter>,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Extractor {
    /// Create an extractor with default settings.
    pub fn new(counter: impl TokenCounter + 'static) -> Self {
        Self::with_counter(Arc::new(counter))
    }

    /// Create an extractor sharing an existing counter.
    #[must_use]
    pub fn with_counter(counter: Arc<dyn TokenCounter>) -> Self {
        let config = ExtractConfig::default();
        Self {
            matcher: config.matcher(),
            config,
            counter,
        }
    }

    /// Replace the settings.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`ExtractConfig::validate`], for settings
    /// that were deserialized rather than built with the `with_*` setters.
    pub fn with_config(self, config: ExtractConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            matcher: config.matcher(),
            config,
            ..self
        })
    }

    /// The current settings.
    #[must_use]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract sections, reporting invalid input as an error.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyText`] when `text` is blank.
    /// - [`Error::EmptyOutline`] / [`Error::InvalidOutline`] from
    ///   [`validate_outline`](crate::validate_outline).
    pub fn try_extract(&self, text: &str, outline: &[ChapterIndexEntry]) -> Result<Extraction> {
        let pages = self.prepare(text, outline)?;

        #[cfg(feature = "parallel")]
        let outcomes: Vec<_> = {
            use rayon::prelude::*;
            (0..outline.len())
                .into_par_iter()
                .map(|index| self.process_chapter(&pages, outline, index))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<_> = (0..outline.len())
            .map(|index| self.process_chapter(&pages, outline, index))
            .collect();

        let mut extraction = Extraction {
            sections: Vec::new(),
            report: DiagnosticsReport {
                declared: outline.len(),
                pages: pages.len(),
                ..DiagnosticsReport::default()
            },
        };
        for (segments, chapter) in outcomes {
            extraction.sections.extend(segments.sections);
            extraction.report.chapters.push(chapter);
        }

        log_summary(&extraction.report);
        Ok(extraction)
    }

    /// Extract sections. Never fails.
    ///
    /// Invalid input yields an empty extraction whose report carries the
    /// error.
    pub fn extract(&self, text: &str, outline: &[ChapterIndexEntry]) -> Extraction {
        self.try_extract(text, outline)
            .unwrap_or_else(|e| failed(&e, outline))
    }

    /// Extract sections, checking `should_stop` before each chapter.
    ///
    /// When it returns `true` the run ends early: sections extracted so far
    /// are returned, the remaining chapters are reported as skipped, and the
    /// report is marked cancelled. Always sequential.
    pub fn extract_until<F>(
        &self,
        text: &str,
        outline: &[ChapterIndexEntry],
        mut should_stop: F,
    ) -> Extraction
    where
        F: FnMut() -> bool,
    {
        let pages = match self.prepare(text, outline) {
            Ok(pages) => pages,
            Err(e) => return failed(&e, outline),
        };

        let mut extraction = Extraction {
            sections: Vec::new(),
            report: DiagnosticsReport {
                declared: outline.len(),
                pages: pages.len(),
                ..DiagnosticsReport::default()
            },
        };

        for index in 0..outline.len() {
            if should_stop() {
                tracing::info!(
                    processed = index,
                    declared = outline.len(),
                    "extraction cancelled"
                );
                extraction.report.cancelled = true;
                extraction
                    .report
                    .chapters
                    .extend(outline[index..].iter().map(skipped));
                break;
            }
            let (segments, chapter) = self.process_chapter(&pages, outline, index);
            extraction.sections.extend(segments.sections);
            extraction.report.chapters.push(chapter);
        }

        log_summary(&extraction.report);
        extraction
    }

    fn prepare(&self, text: &str, outline: &[ChapterIndexEntry]) -> Result<Vec<PageBlock>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        validate_outline(outline)?;

        let pages = split_pages(text);
        if pages.is_empty() {
            tracing::warn!(bytes = text.len(), "no page markers in text");
        } else {
            tracing::debug!(pages = pages.len(), "text split into pages");
        }
        Ok(pages)
    }

    fn process_chapter(
        &self,
        pages: &[PageBlock],
        outline: &[ChapterIndexEntry],
        index: usize,
    ) -> (ChapterSegments, ChapterReport) {
        let entry = &outline[index];
        let title = entry.chapter_title.as_str();

        let Some(content) = locate_chapter(pages, entry, outline.get(index + 1), &self.matcher)
        else {
            let near_misses = near_misses(
                pages,
                title,
                self.config.near_miss_min_word_len(),
                self.config.near_miss_limit(),
            );
            let hints: Vec<(u32, &str)> = near_misses
                .iter()
                .map(|m| (m.page_number, m.line.as_str()))
                .collect();
            tracing::warn!(chapter = title, near_misses = ?hints, "chapter not found");
            return (
                ChapterSegments::default(),
                ChapterReport {
                    title: title.to_string(),
                    status: ChapterStatus::NotFound { near_misses },
                    sections: 0,
                    token_failures: 0,
                },
            );
        };

        let counter = self.counter.as_ref();
        let (segments, status) = match entry.shape() {
            ChapterShape::WithSubchapters(titles) => {
                let segments =
                    segment_subchapters(title, titles, &content, &self.matcher, counter);
                let status = ChapterStatus::Located {
                    subchapters_found: segments.sections.len(),
                    subchapters_declared: titles.len(),
                };
                (segments, status)
            }
            ChapterShape::Flat => {
                let segments = segment_flat(
                    title,
                    &content,
                    self.config.title_lookahead(),
                    &self.matcher,
                    counter,
                );
                let status = ChapterStatus::Located {
                    subchapters_found: 0,
                    subchapters_declared: 0,
                };
                (segments, status)
            }
        };

        tracing::info!(
            chapter = title,
            sections = segments.sections.len(),
            lines = content.lines().count(),
            "chapter located"
        );

        let report = ChapterReport {
            title: title.to_string(),
            status,
            sections: segments.sections.len(),
            token_failures: segments.token_failures,
        };
        (segments, report)
    }
}

fn skipped(entry: &ChapterIndexEntry) -> ChapterReport {
    ChapterReport {
        title: entry.chapter_title.clone(),
        status: ChapterStatus::Skipped,
        sections: 0,
        token_failures: 0,
    }
}

fn failed(error: &Error, outline: &[ChapterIndexEntry]) -> Extraction {
    tracing::warn!(error = %error, "extraction skipped: invalid input");
    Extraction {
        sections: Vec::new(),
        report: DiagnosticsReport {
            declared: outline.len(),
            chapters: outline.iter().map(skipped).collect(),
            error: Some(error.to_string()),
            ..DiagnosticsReport::default()
        },
    }
}

fn log_summary(report: &DiagnosticsReport) {
    let missing = report.missing();
    if missing.is_empty() {
        tracing::info!(
            found = report.found(),
            declared = report.declared,
            pages = report.pages,
            "extraction finished"
        );
    } else {
        tracing::warn!(
            found = report.found(),
            declared = report.declared,
            pages = report.pages,
            ?missing,
            "extraction finished with missing chapters"
        );
    }
    if report.token_failures() > 0 {
        tracing::warn!(
            failures = report.token_failures(),
            "token counts fell back to zero"
        );
    }
}

/// Extract sections with default settings.
///
/// Shorthand for `Extractor::new(counter).extract(text, outline).sections`.
pub fn extract_sections(
    text: &str,
    outline: &[ChapterIndexEntry],
    counter: impl TokenCounter + 'static,
) -> Vec<SectionResult> {
    Extractor::new(counter).extract(text, outline).into_sections()
}
