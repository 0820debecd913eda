//! Error types for dictionary and model loading.
//!
//! Nothing in the segmentation hot path produces an error; everything here
//! is reported at load time. Malformed individual lines are skipped by the
//! loaders and are not errors.

use std::path::PathBuf;

/// Result type used by the loaders, defaulting to [`DictError`].
pub type Result<T, E = DictError> = std::result::Result<T, E>;

/// Errors raised while loading dictionaries, caches or the emission table.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    /// Underlying I/O failure (missing file, unreadable stream).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Structurally broken input that cannot be skipped line-by-line,
    /// e.g. an emission file whose first record is not a state marker, or
    /// a corrupt dictionary cache.
    #[error("invalid format in {source_name}: {reason}")]
    InvalidFormat { source_name: String, reason: String },

    /// A caller-supplied value that cannot be used, e.g. a word containing
    /// U+0000 (the trie root reserves it).
    #[error("invalid word {word:?}: {reason}")]
    InvalidArgument { word: String, reason: String },

    /// A path that should have been a readable dictionary directory.
    #[error("cannot read dictionary directory {0}")]
    BadDictDir(PathBuf),
}

impl DictError {
    pub(crate) fn format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        DictError::InvalidFormat {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn word(word: impl Into<String>, reason: impl Into<String>) -> Self {
        DictError::InvalidArgument {
            word: word.into(),
            reason: reason.into(),
        }
    }
}
