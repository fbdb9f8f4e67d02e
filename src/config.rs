//! Extraction configuration.
//!
//! The defaults reproduce plain first-occurrence matching with every tier
//! enabled. Two knobs tighten heading detection when a document repeats its
//! headings in a table of contents or cross-references them in body text:
//!
//! ```text
//! === PÁGINA 2 ===
//! Contents
//! 1. Introduction ........ 3     <- matched first by the substring tier
//! 2. Methods ............. 7
//! ...
//! === PÁGINA 3 ===
//! Introduction                   <- the heading actually wanted
//! ```
//!
//! - `substring_tier = false` stops "1. Introduction ........ 3" from
//!   matching "Introduction".
//! - `max_heading_chars` ignores long lines such as body sentences that
//!   happen to contain a title.
//!
//! Configuration deserializes from JSON (or any serde format) with every
//! field optional.

use serde::{Deserialize, Serialize};

use crate::TitleMatcher;

/// Settings for an [`Extractor`](crate::Extractor).
///
/// # Examples
///
/// ```rust
/// use folio::ExtractConfig;
///
/// let config = ExtractConfig::default();
/// assert_eq!(config.title_lookahead(), 3);
/// assert!(config.substring_tier());
///
/// let strict = ExtractConfig::default()
///     .with_substring_tier(false)
///     .with_max_heading_chars(80)
///     .unwrap();
/// assert_eq!(strict.max_heading_chars(), Some(80));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    title_lookahead: usize,
    substring_tier: bool,
    max_heading_chars: Option<usize>,
    near_miss_min_word_len: usize,
    near_miss_limit: usize,
}

impl ExtractConfig {
    /// How many leading lines of a flat chapter are checked for its heading.
    #[must_use]
    pub const fn title_lookahead(&self) -> usize {
        self.title_lookahead
    }

    /// Whether titles may match as substrings of longer lines.
    #[must_use]
    pub const fn substring_tier(&self) -> bool {
        self.substring_tier
    }

    /// Longest line, in characters, still considered a heading.
    #[must_use]
    pub const fn max_heading_chars(&self) -> Option<usize> {
        self.max_heading_chars
    }

    /// Shortest title word used when looking for near misses.
    #[must_use]
    pub const fn near_miss_min_word_len(&self) -> usize {
        self.near_miss_min_word_len
    }

    /// Most near misses reported per missing chapter.
    #[must_use]
    pub const fn near_miss_limit(&self) -> usize {
        self.near_miss_limit
    }

    /// Set the flat-chapter heading lookahead.
    ///
    /// # Errors
    ///
    /// Returns an error if `lines == 0`.
    pub fn with_title_lookahead(self, lines: usize) -> Result<Self, ConfigError> {
        if lines == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        Ok(Self {
            title_lookahead: lines,
            ..self
        })
    }

    /// Enable or disable the substring matching tier.
    #[must_use]
    pub const fn with_substring_tier(self, enabled: bool) -> Self {
        Self {
            substring_tier: enabled,
            ..self
        }
    }

    /// Only treat lines of at most `chars` characters as headings.
    ///
    /// # Errors
    ///
    /// Returns an error if `chars == 0`.
    pub fn with_max_heading_chars(self, chars: usize) -> Result<Self, ConfigError> {
        if chars == 0 {
            return Err(ConfigError::ZeroHeadingChars);
        }
        Ok(Self {
            max_heading_chars: Some(chars),
            ..self
        })
    }

    /// Tune near-miss reporting for missing chapters.
    ///
    /// A `limit` of 0 turns near-miss reporting off.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_word_len == 0`.
    pub fn with_near_misses(
        self,
        min_word_len: usize,
        limit: usize,
    ) -> Result<Self, ConfigError> {
        if min_word_len == 0 {
            return Err(ConfigError::ZeroNearMissWordLen);
        }
        Ok(Self {
            near_miss_min_word_len: min_word_len,
            near_miss_limit: limit,
            ..self
        })
    }

    /// Check values that deserialization cannot rule out.
    ///
    /// # Errors
    ///
    /// The same conditions as the `with_*` setters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title_lookahead == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        if self.max_heading_chars == Some(0) {
            return Err(ConfigError::ZeroHeadingChars);
        }
        if self.near_miss_min_word_len == 0 {
            return Err(ConfigError::ZeroNearMissWordLen);
        }
        Ok(())
    }

    /// The title matcher these settings describe.
    #[must_use]
    pub fn matcher(&self) -> TitleMatcher {
        let matcher = TitleMatcher::new().with_substring(self.substring_tier);
        match self.max_heading_chars {
            Some(max) => matcher.with_max_line_chars(max),
            None => matcher,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title_lookahead: 3,
            substring_tier: true,
            max_heading_chars: None,
            near_miss_min_word_len: 4,
            near_miss_limit: 3,
        }
    }
}

/// Error when configuring an extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The heading lookahead must cover at least one line.
    #[error("title lookahead must be > 0")]
    ZeroLookahead,

    /// A zero heading length would reject every line.
    #[error("max heading chars must be > 0")]
    ZeroHeadingChars,

    /// A zero word length would turn every line into a near miss.
    #[error("near miss min word length must be > 0")]
    ZeroNearMissWordLen,
}
