//! Extraction diagnostics.
//!
//! Every run returns a [`DiagnosticsReport`] next to its sections. It records
//! what the logs say, as a value: which chapters were found, how many of
//! their subchapters, and which chapters are missing. Nothing in the
//! extraction depends on it; it exists for operators and for callers that
//! want to flag incomplete extractions.

use serde::Serialize;

use crate::NearMiss;

/// What happened to one outline chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ChapterStatus {
    /// The chapter title was found and segmented.
    #[serde(rename_all = "camelCase")]
    Located {
        /// Declared subchapters that were found (0 for a flat chapter).
        subchapters_found: usize,
        /// Declared subchapters.
        subchapters_declared: usize,
    },
    /// The chapter title appears nowhere in the text.
    #[serde(rename_all = "camelCase")]
    NotFound {
        /// Lines sharing a keyword with the title.
        near_misses: Vec<NearMiss>,
    },
    /// The run was cancelled before reaching this chapter.
    Skipped,
}

/// Diagnostics for one outline chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterReport {
    /// The outline title.
    pub title: String,
    /// Outcome.
    #[serde(flatten)]
    pub status: ChapterStatus,
    /// Sections emitted for the chapter.
    pub sections: usize,
    /// Segments whose token count failed.
    pub token_failures: usize,
}

impl ChapterReport {
    /// Whether the chapter made it into the output.
    #[must_use]
    pub fn is_located(&self) -> bool {
        matches!(self.status, ChapterStatus::Located { .. })
    }
}

/// Diagnostics for a whole extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    /// Chapters declared by the outline.
    pub declared: usize,
    /// Pages found in the raw text.
    pub pages: usize,
    /// Per-chapter outcomes, in outline order.
    pub chapters: Vec<ChapterReport>,
    /// Whether the run stopped early.
    pub cancelled: bool,
    /// Why the run produced nothing, if input validation failed.
    pub error: Option<String>,
}

impl DiagnosticsReport {
    /// Chapters represented in the output.
    #[must_use]
    pub fn found(&self) -> usize {
        self.chapters.iter().filter(|c| c.is_located()).count()
    }

    /// Titles of declared chapters missing from the output.
    ///
    /// Chapters never reached, because of a validation error or
    /// cancellation, count as missing.
    #[must_use]
    pub fn missing(&self) -> Vec<&str> {
        self.chapters
            .iter()
            .filter(|c| !c.is_located())
            .map(|c| c.title.as_str())
            .collect()
    }

    /// Total segments whose token count fell back to zero.
    #[must_use]
    pub fn token_failures(&self) -> usize {
        self.chapters.iter().map(|c| c.token_failures).sum()
    }

    /// Whether every declared chapter was extracted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && !self.cancelled && self.found() == self.declared
    }
}

impl std::fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(error) = &self.error {
            return write!(f, "extraction failed: {error}");
        }
        write!(
            f,
            "{}/{} chapters found across {} pages",
            self.found(),
            self.declared,
            self.pages
        )?;
        let missing = self.missing();
        if !missing.is_empty() {
            write!(f, "; missing: {}", missing.join(", "))?;
        }
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(title: &str, status: ChapterStatus) -> ChapterReport {
        ChapterReport {
            title: title.to_string(),
            status,
            sections: 0,
            token_failures: 0,
        }
    }

    #[test]
    fn test_counts_and_display() {
        let report = DiagnosticsReport {
            declared: 3,
            pages: 12,
            chapters: vec![
                chapter(
                    "A",
                    ChapterStatus::Located {
                        subchapters_found: 1,
                        subchapters_declared: 2,
                    },
                ),
                chapter("B", ChapterStatus::NotFound { near_misses: vec![] }),
                chapter("C", ChapterStatus::Skipped),
            ],
            cancelled: true,
            error: None,
        };
        assert_eq!(report.found(), 1);
        assert_eq!(report.missing(), ["B", "C"]);
        assert!(!report.is_complete());
        assert_eq!(
            report.to_string(),
            "1/3 chapters found across 12 pages; missing: B, C (cancelled)"
        );
    }

    #[test]
    fn test_error_display() {
        let report = DiagnosticsReport {
            declared: 2,
            error: Some("raw text is empty".to_string()),
            ..DiagnosticsReport::default()
        };
        assert_eq!(report.to_string(), "extraction failed: raw text is empty");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_serialize_status_tag() {
        let json = serde_json::to_value(chapter("X", ChapterStatus::Skipped)).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["title"], "X");
    }
}
