//! Title matching.
//!
//! Titles in OCR output rarely match the outline byte for byte. The matcher
//! tries three tiers, cheapest and most precise first:
//!
//! ```text
//! outline title: "Capítulo 2: Resultados"
//!
//! 1. Exact       "  capítulo 2: resultados "     trimmed, case-insensitive
//! 2. Substring   "CAPÍTULO 2: RESULTADOS (cont.)" line contains title
//! 3. Normalized  "Capítulo 2 - Resultados"       punctuation folded away
//! ```
//!
//! Normalization replaces every character that is neither alphanumeric nor
//! whitespace with a space, collapses whitespace runs, trims, and
//! upper-cases. No edit distance is computed: a title with an OCR typo does
//! not match.
//!
//! Subchapter headings are often numbered in one place and bare in the
//! other (`"1. Overview"` against `"Overview"`).
//! [`TitleMatcher::matches_enumerated`] retries with the leading enumerator
//! stripped. Two different enumerators never match, so `"1. Summary"` is not
//! a heading for `"2. Summary"`, and a bare leading number such as a year is
//! part of the title.

use std::sync::LazyLock;

use regex::Regex;

static ENUMERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)*)\.\s*").unwrap());

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    /// Trimmed, case-insensitive equality.
    Exact,
    /// Case-insensitive containment of the title in the line.
    Substring,
    /// Equality after punctuation folding.
    Normalized,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Substring => "substring",
            Self::Normalized => "normalized",
        })
    }
}

/// Decides whether a line is a heading for a given title.
///
/// ## Example
///
/// ```rust
/// use folio::{MatchTier, TitleMatcher};
///
/// let matcher = TitleMatcher::new();
/// assert_eq!(matcher.match_tier("INTRODUCTION", "Introduction"), Some(MatchTier::Exact));
/// assert!(matcher.matches("Chapter 1 - Introduction.", "introduction"));
/// assert!(matcher.matches("Results / Discussion", "Results: Discussion"));
/// assert!(!matcher.matches("Conclusion", "Introduction"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatcher {
    substring: bool,
    max_line_chars: Option<usize>,
}

impl TitleMatcher {
    /// Create a matcher with all tiers enabled and no line length limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            substring: true,
            max_line_chars: None,
        }
    }

    /// Enable or disable the substring tier.
    ///
    /// The substring tier finds headings with extra decoration
    /// (`"Chapter 3: Methods"` for `"Methods"`), but also matches
    /// cross-references inside body text.
    #[must_use]
    pub const fn with_substring(self, enabled: bool) -> Self {
        Self {
            substring: enabled,
            ..self
        }
    }

    /// Only consider lines of at most `max` characters as headings.
    ///
    /// Body paragraphs that mention a title are usually long lines; headings
    /// are short. Unlimited by default.
    #[must_use]
    pub const fn with_max_line_chars(self, max: usize) -> Self {
        Self {
            max_line_chars: Some(max),
            ..self
        }
    }

    /// Whether the substring tier is enabled.
    #[must_use]
    pub const fn substring(&self) -> bool {
        self.substring
    }

    /// The heading line length limit, if any.
    #[must_use]
    pub const fn max_line_chars(&self) -> Option<usize> {
        self.max_line_chars
    }

    /// Whether `line` matches `title` under any tier.
    #[must_use]
    pub fn matches(&self, line: &str, title: &str) -> bool {
        self.match_tier(line, title).is_some()
    }

    /// The first tier under which `line` matches `title`.
    #[must_use]
    pub fn match_tier(&self, line: &str, title: &str) -> Option<MatchTier> {
        let line = line.trim();
        let title = title.trim();
        if line.is_empty() || title.is_empty() {
            return None;
        }
        if let Some(max) = self.max_line_chars {
            if line.chars().count() > max {
                return None;
            }
        }

        let line_lower = line.to_lowercase();
        let title_lower = title.to_lowercase();

        if line_lower == title_lower {
            return Some(MatchTier::Exact);
        }
        if self.substring && line_lower.contains(&title_lower) {
            return Some(MatchTier::Substring);
        }

        let normalized_title = normalize(title);
        if !normalized_title.is_empty() && normalize(line) == normalized_title {
            return Some(MatchTier::Normalized);
        }

        None
    }

    /// Like [`match_tier`](Self::match_tier), retrying with a leading
    /// enumerator (`"1."`, `"2.3."`) stripped from both sides.
    ///
    /// The retry only applies when at most one side is enumerated, or both
    /// carry the same enumerator.
    ///
    /// ```rust
    /// use folio::TitleMatcher;
    ///
    /// let matcher = TitleMatcher::new();
    /// assert!(matcher.matches_enumerated("Overview", "1. Overview"));
    /// assert!(matcher.matches_enumerated("2.1. Scope", "Scope"));
    /// assert!(!matcher.matches_enumerated("2. Summary", "1. Summary"));
    /// assert!(!matcher.matches("Overview", "1. Overview"));
    /// ```
    #[must_use]
    pub fn match_tier_enumerated(&self, line: &str, title: &str) -> Option<MatchTier> {
        if let Some(tier) = self.match_tier(line, title) {
            return Some(tier);
        }
        if let (Some(a), Some(b)) = (enumerator(line), enumerator(title)) {
            if a != b {
                return None;
            }
        }
        self.match_tier(strip_enumerator(line), strip_enumerator(title))
    }

    /// Whether `line` matches `title`, tolerating leading enumerators.
    #[must_use]
    pub fn matches_enumerated(&self, line: &str, title: &str) -> bool {
        self.match_tier_enumerated(line, title).is_some()
    }
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold punctuation and case so that near-identical headings compare equal.
///
/// ```rust
/// use folio::normalize;
///
/// assert_eq!(normalize("  Results:  Discussion -- part 2. "), "RESULTS DISCUSSION PART 2");
/// assert_eq!(normalize("¿Qué?"), "QUÉ");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Remove a leading enumerator such as `"1. "` or `"2.3."`.
///
/// Returns the input unchanged when there is none. A number without a
/// trailing dot (`"2021 Results"`) is not an enumerator.
#[must_use]
pub fn strip_enumerator(text: &str) -> &str {
    match ENUMERATOR_RE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// The digits of a leading enumerator, without the trailing dot.
fn enumerator(text: &str) -> Option<&str> {
    ENUMERATOR_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tier() {
        let m = TitleMatcher::new();
        assert_eq!(m.match_tier("  Conclusion  ", "conclusion"), Some(MatchTier::Exact));
        assert_eq!(m.match_tier("ÍNDICE", "índice"), Some(MatchTier::Exact));
    }

    #[test]
    fn test_substring_tier() {
        let m = TitleMatcher::new();
        assert_eq!(
            m.match_tier("Chapter 2 Methods and Data", "methods"),
            Some(MatchTier::Substring)
        );
    }

    #[test]
    fn test_normalized_tier() {
        let m = TitleMatcher::new();
        assert_eq!(
            m.match_tier("Results - Discussion", "Results: Discussion"),
            Some(MatchTier::Normalized)
        );
        assert_eq!(
            m.match_tier("Risk  factors", "RISK-FACTORS"),
            Some(MatchTier::Normalized)
        );
    }

    #[test]
    fn test_substring_disabled() {
        let m = TitleMatcher::new().with_substring(false);
        assert!(!m.matches("As discussed in Methods, we", "Methods"));
        assert!(m.matches("METHODS", "Methods"));
    }

    #[test]
    fn test_max_line_chars() {
        let m = TitleMatcher::new().with_max_line_chars(20);
        assert!(m.matches("Methods", "Methods"));
        assert!(!m.matches(
            "The methods below follow the Methods section closely",
            "Methods"
        ));
    }

    #[test]
    fn test_blank_never_matches() {
        let m = TitleMatcher::new();
        assert!(!m.matches("", "Intro"));
        assert!(!m.matches("   ", "Intro"));
        assert!(!m.matches("anything", ""));
        // A title made only of punctuation normalizes to nothing
        assert!(!m.matches("---", "***"));
    }

    #[test]
    fn test_enumerated() {
        let m = TitleMatcher::new();
        assert!(m.matches_enumerated("Details", "2. Details"));
        assert!(m.matches_enumerated("3. Findings", "Findings"));
        assert!(m.matches_enumerated("1.2.Scope", "1.2. Scope"));
        assert!(!m.matches_enumerated("Details", "2. Overview"));
    }

    #[test]
    fn test_enumerators_must_agree() {
        let m = TitleMatcher::new();
        assert!(!m.matches_enumerated("2. Summary", "1. Summary"));
        assert!(!m.matches_enumerated("1.3. Scope", "1.2. Scope"));
        assert!(!m.matches_enumerated("2021 Results", "2020 Results"));
        assert!(m.matches_enumerated("2020 Results", "2020 Results"));
    }

    #[test]
    fn test_strip_enumerator() {
        assert_eq!(strip_enumerator("1. Overview"), "Overview");
        assert_eq!(strip_enumerator("  12.4. Scope"), "Scope");
        assert_eq!(strip_enumerator("3 Findings"), "3 Findings");
        assert_eq!(strip_enumerator("2023 results"), "2023 results");
        assert_eq!(strip_enumerator("Overview"), "Overview");
        assert_eq!(strip_enumerator("1984"), "1984");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a.b,c"), "A B C");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" !! "), "");
    }
}
