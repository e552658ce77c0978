use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration, indexing, annotation decoding, and access failures.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("annotation document '{}' could not be parsed: {source}", path.display())]
    DocumentParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("hashtags value {value:?} is not a list of strings: {reason}")]
    HashtagFormat { value: String, reason: String },
    #[error("image ranking score {value:?} is not an integer")]
    RankingScoreFormat { value: String },
    #[error("character coordinates {value:?} are not a list of numbers")]
    CoordinateFormat { value: String },
    #[error("failed to serialize annotation: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("failed to load image '{}': {reason}", path.display())]
    ImageLoad { path: PathBuf, reason: String },
}

impl DatasetError {
    /// True for failures raised while filtering an already-loaded document.
    ///
    /// These are the errors governed by [`crate::config::FormatErrorPolicy`].
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DatasetError::HashtagFormat { .. }
                | DatasetError::RankingScoreFormat { .. }
                | DatasetError::CoordinateFormat { .. }
        )
    }

    /// True for failures to read or decode an annotation document file.
    pub fn is_document_error(&self) -> bool {
        matches!(self, DatasetError::Io(_) | DatasetError::DocumentParse { .. })
    }
}
