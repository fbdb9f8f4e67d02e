//! The caller-supplied outline.
//!
//! An outline is an ordered list of chapters, each with an ordered and
//! possibly empty list of subchapter titles. Order is the only positional
//! information: the outline says nothing about pages.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One chapter of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterIndexEntry {
    /// The chapter heading as the outline knows it.
    pub chapter_title: String,
    /// Declared subchapter headings, in expected document order.
    #[serde(default)]
    pub subchapter_titles: Vec<String>,
}

/// How a chapter is segmented, decided once from the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterShape<'a> {
    /// The chapter declares subchapters; each becomes its own segment.
    WithSubchapters(&'a [String]),
    /// No subchapters; the whole chapter is one segment.
    Flat,
}

impl ChapterIndexEntry {
    /// A chapter without subchapters.
    #[must_use]
    pub fn flat(chapter_title: impl Into<String>) -> Self {
        Self {
            chapter_title: chapter_title.into(),
            subchapter_titles: Vec::new(),
        }
    }

    /// A chapter with the given subchapters.
    #[must_use]
    pub fn with_subchapters<I, S>(chapter_title: impl Into<String>, subchapters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chapter_title: chapter_title.into(),
            subchapter_titles: subchapters.into_iter().map(Into::into).collect(),
        }
    }

    /// The segmentation shape of this chapter.
    #[must_use]
    pub fn shape(&self) -> ChapterShape<'_> {
        if self.subchapter_titles.is_empty() {
            ChapterShape::Flat
        } else {
            ChapterShape::WithSubchapters(&self.subchapter_titles)
        }
    }
}

/// A validated, ordered outline.
///
/// ```rust
/// use folio::Outline;
///
/// let outline = Outline::from_json(r#"[
///     {"chapterTitle": "Introduction"},
///     {"chapterTitle": "Methods", "subchapterTitles": ["1. Data", "2. Models"]}
/// ]"#).unwrap();
///
/// assert_eq!(outline.len(), 2);
/// assert_eq!(outline.chapters()[1].subchapter_titles.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Outline {
    chapters: Vec<ChapterIndexEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OutlineDocument {
    Entries(Vec<ChapterIndexEntry>),
    Wrapped { chapters: Vec<ChapterIndexEntry> },
}

impl Outline {
    /// Validate chapters into an outline.
    ///
    /// # Errors
    ///
    /// See [`validate_outline`].
    pub fn new(chapters: Vec<ChapterIndexEntry>) -> Result<Self> {
        validate_outline(&chapters)?;
        Ok(Self { chapters })
    }

    /// Parse and validate an outline from JSON.
    ///
    /// Accepts either an array of entries or an object with a `chapters`
    /// array. `subchapterTitles` may be omitted.
    ///
    /// # Errors
    ///
    /// [`Error::OutlineJson`] when the JSON does not have either shape, or
    /// any error of [`validate_outline`].
    pub fn from_json(json: &str) -> Result<Self> {
        let chapters = match serde_json::from_str::<OutlineDocument>(json)? {
            OutlineDocument::Entries(chapters) | OutlineDocument::Wrapped { chapters } => chapters,
        };
        Self::new(chapters)
    }

    /// The chapters in document order.
    #[must_use]
    pub fn chapters(&self) -> &[ChapterIndexEntry] {
        &self.chapters
    }

    /// Number of chapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// Always false for a validated outline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Consume the outline, returning its chapters.
    #[must_use]
    pub fn into_chapters(self) -> Vec<ChapterIndexEntry> {
        self.chapters
    }
}

impl AsRef<[ChapterIndexEntry]> for Outline {
    fn as_ref(&self) -> &[ChapterIndexEntry] {
        &self.chapters
    }
}

/// Check that an outline can drive an extraction.
///
/// # Errors
///
/// - [`Error::EmptyOutline`] when there are no chapters.
/// - [`Error::InvalidOutline`] when a chapter title or a subchapter title is
///   blank.
pub fn validate_outline(chapters: &[ChapterIndexEntry]) -> Result<()> {
    if chapters.is_empty() {
        return Err(Error::EmptyOutline);
    }

    for (index, entry) in chapters.iter().enumerate() {
        if entry.chapter_title.trim().is_empty() {
            return Err(Error::InvalidOutline {
                index,
                reason: "chapter title is blank".to_string(),
            });
        }
        if let Some(pos) = entry
            .subchapter_titles
            .iter()
            .position(|t| t.trim().is_empty())
        {
            return Err(Error::InvalidOutline {
                index,
                reason: format!("subchapter title {pos} is blank"),
            });
        }
    }

    Ok(())
}
