//! Error types for corefex.

use thiserror::Error;

/// Result type for corefex operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for corefex operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A token line failed column-count or type expectations.
    ///
    /// The reader fails fast on these rather than producing partial
    /// records, which would corrupt downstream chain matching.
    #[error("malformed token line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number in the source file.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// Spliced tree fragments did not form a well-bracketed string.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// A mention referenced a sentence index absent from its part.
    #[error("sentence {sentence} not present in part")]
    SentenceOutOfRange {
        /// The missing sentence index.
        sentence: usize,
    },

    /// A mention span referenced a token index absent from its sentence.
    #[error("token {index} not present in sentence {sentence}")]
    TokenOutOfRange {
        /// Sentence the lookup ran against.
        sentence: usize,
        /// The missing token index.
        index: usize,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed-line error.
    pub fn malformed_line(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedLine {
            line,
            reason: reason.into(),
        }
    }

    /// Create a malformed-tree error.
    pub fn malformed_tree(msg: impl Into<String>) -> Self {
        Error::MalformedTree(msg.into())
    }
}
