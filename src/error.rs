//! Error types for folio.

/// Errors that can stop an extraction before any chapter is processed.
///
/// Per-chapter problems (a title that cannot be found, a token counter that
/// fails) are never errors: they degrade to omission and show up in the
/// [`DiagnosticsReport`](crate::DiagnosticsReport).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The raw text is empty or whitespace only.
    #[error("raw text is empty")]
    EmptyText,

    /// The outline has no chapters.
    #[error("outline has no chapters")]
    EmptyOutline,

    /// An outline entry is malformed.
    #[error("invalid outline entry {index}: {reason}")]
    InvalidOutline {
        /// Zero-based position of the entry in the outline.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// The outline JSON could not be parsed.
    #[error("outline json: {0}")]
    OutlineJson(#[from] serde_json::Error),
}

/// Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;
