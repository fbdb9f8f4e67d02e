//! Token counting.
//!
//! Segments carry a token count so downstream indexers can budget context
//! windows. Counting is delegated: plug in the tokenizer of the model you
//! index for. Any `Fn(&str) -> usize` closure works:
//!
//! ```rust
//! use folio::TokenCounter;
//!
//! let by_whitespace = |text: &str| text.split_whitespace().count();
//! assert_eq!(by_whitespace.count_tokens("a b c").unwrap(), 3);
//! ```
//!
//! Two estimators ship with the crate for when no tokenizer is at hand.

use unicode_segmentation::UnicodeSegmentation;

/// A token counter failed.
///
/// The extractor never propagates this: the segment is emitted with a
/// count of zero and the failure is logged and reported.
#[derive(Debug, Clone, thiserror::Error)]
#[error("token counting failed: {0}")]
pub struct TokenCountError(pub String);

impl TokenCountError {
    /// Create an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Counts language-model tokens in a span of text.
pub trait TokenCounter: Send + Sync {
    /// Count tokens in `text`.
    ///
    /// # Errors
    ///
    /// Implementations backed by a tokenizer service or model may fail.
    fn count_tokens(&self, text: &str) -> Result<usize, TokenCountError>;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> Result<usize, TokenCountError> {
        Ok(self(text))
    }
}

/// Character-based estimate: about four characters per token.
///
/// CJK ideographs and kana/hangul are denser, about two characters per
/// token. Good enough for budgeting, not for billing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharEstimate;

impl TokenCounter for CharEstimate {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenCountError> {
        if text.is_empty() {
            return Ok(0);
        }
        if text.is_ascii() {
            return Ok(text.len().div_ceil(4));
        }

        let (cjk, other) = text.chars().fold((0usize, 0usize), |(cjk, other), c| {
            if is_cjk(c) {
                (cjk + 1, other)
            } else {
                (cjk, other + 1)
            }
        });
        Ok(cjk.div_ceil(2) + other.div_ceil(4))
    }
}

/// Counts Unicode words (UAX #29).
///
/// A lower bound for most subword tokenizers.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCount;

impl TokenCounter for WordCount {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenCountError> {
        Ok(text.unicode_words().count())
    }
}

#[inline]
fn is_cjk(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF // CJK Unified Ideographs
            | 0x3040..=0x309F // Hiragana
            | 0x30A0..=0x30FF // Katakana
            | 0xAC00..=0xD7AF // Hangul
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_estimate() {
        assert_eq!(CharEstimate.count_tokens("").unwrap(), 0);
        assert_eq!(CharEstimate.count_tokens("abcd").unwrap(), 1);
        assert_eq!(CharEstimate.count_tokens("abcde").unwrap(), 2);
        // 4 ideographs -> 2, 4 latin chars -> 1
        assert_eq!(CharEstimate.count_tokens("世界你好abcd").unwrap(), 3);
        assert_eq!(CharEstimate.count_tokens("página").unwrap(), 2);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(WordCount.count_tokens("Hello, world! ¿Qué tal?").unwrap(), 4);
        assert_eq!(WordCount.count_tokens("   ").unwrap(), 0);
    }

    #[test]
    fn test_closure_counter() {
        let counter = |text: &str| text.len();
        let dynamic: &dyn TokenCounter = &counter;
        assert_eq!(dynamic.count_tokens("abc").unwrap(), 3);
    }
}
