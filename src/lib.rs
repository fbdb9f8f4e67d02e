//! # folio
//!
//! Outline-guided section extraction from paginated OCR text.
//!
//! ## The Problem
//!
//! A document has gone through OCR and comes back as one long string, with a
//! marker line in front of every page. Separately, something upstream (a
//! person, an AI chaptering step) has produced an outline: the chapter
//! titles, in order, and for some chapters the subchapter titles. Indexing
//! wants one piece of text per chapter or subchapter, with the pages it
//! came from and its token count.
//!
//! This sounds like a string search, but consider:
//!
//! - The outline says "2. Methods", the page says "METHODS"
//! - The outline says "Risk factors", the page says "Risk-factors:"
//! - A chapter starts halfway down page 14 and ends on page 19
//! - One subchapter title never made it through OCR
//!
//! Nothing here should fail the run. A chapter that cannot be found is left
//! out and reported; everything else is still extracted.
//!
//! ## The Pipeline
//!
//! ```text
//! "=== PÁGINA 1 ===\n..."                     [{chapterTitle, subchapterTitles}]
//!          │                                               │
//!    split_pages ──> [PageBlock]                           │
//!                        │                                 │
//!                        └────── for each chapter ◄────────┘
//!                                      │
//!                  locate_chapter (title … next chapter's title)
//!                                      │
//!                ┌─────────────────────┴─────────────────────┐
//!        WithSubchapters                                    Flat
//!      segment_subchapters                              segment_flat
//!                └─────────────────────┬─────────────────────┘
//!                                      ▼
//!                      Vec<SectionResult> + DiagnosticsReport
//! ```
//!
//! ### Title Matching
//!
//! Three tiers, first success wins: exact (trimmed, case-insensitive),
//! substring, and normalized (punctuation folded to spaces). Subchapters also
//! retry with a leading `"1."`-style enumerator stripped. There is no fuzzy
//! matching: OCR typos in headings are not recovered.
//!
//! ### Boundaries
//!
//! The first physical occurrence of a title wins. A chapter ends where the
//! next outline chapter's title first occurs after it, or at the end of the
//! document. Tables of contents and cross-references can capture a title
//! early; [`ExtractConfig`] can restrict what counts as a heading.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::{ChapterIndexEntry, Extractor, WordCount};
//!
//! let text = "=== PÁGINA 1 ===\n\
//!             Guide\n\
//!             1. Overview\n\
//!             What this is.\n\
//!             === PÁGINA 2 ===\n\
//!             2. Details\n\
//!             How it works.";
//!
//! let outline = [ChapterIndexEntry::with_subchapters(
//!     "Guide",
//!     ["1. Overview", "2. Details"],
//! )];
//!
//! let extraction = Extractor::new(WordCount).extract(text, &outline);
//!
//! assert_eq!(extraction.sections.len(), 2);
//! assert_eq!(extraction.sections[0].subchapter.text, "What this is.");
//! assert_eq!(extraction.sections[1].from_page, 2);
//! println!("{}", extraction.report); // 1/1 chapters found across 2 pages
//! ```
//!
//! ## Token Counting
//!
//! Bring your own tokenizer through [`TokenCounter`]; any
//! `Fn(&str) -> usize` closure qualifies. [`CharEstimate`] and [`WordCount`]
//! are rough stand-ins. A counter that fails yields a count of zero, never
//! an error.
//!
//! ## Diagnostics
//!
//! Progress is logged through `tracing` (`info` per chapter, `warn` for
//! missing chapters, a summary per run). The same facts come back as a
//! [`DiagnosticsReport`] value, so callers can act on them without parsing
//! logs.
//!
//! ## Features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `parallel` | Chapters are segmented concurrently with rayon. Output is unchanged. |

mod config;
mod error;
mod extract;
mod locate;
mod matcher;
mod outline;
mod page;
mod report;
mod segment;
mod tokens;

pub use config::{ConfigError, ExtractConfig};
pub use error::{Error, Result};
pub use extract::{extract_sections, Extraction, Extractor};
pub use locate::{
    locate_chapter, locate_span, near_misses, render, ChapterSpan, NearMiss, PagePosition,
};
pub use matcher::{normalize, strip_enumerator, MatchTier, TitleMatcher};
pub use outline::{validate_outline, ChapterIndexEntry, ChapterShape, Outline};
pub use page::{is_page_marker, page_marker, page_marker_number, split_pages, PageBlock};
pub use report::{ChapterReport, ChapterStatus, DiagnosticsReport};
pub use segment::{
    segment_flat, segment_subchapters, ChapterSegments, SectionResult, SubChapterSegment,
};
pub use tokens::{CharEstimate, TokenCountError, TokenCounter, WordCount};
