//! Error types shared by every pass.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    /// Failed to read or write a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid JSON (or not the expected JSON type).
    #[error("invalid JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record is missing a required field or has the wrong shape.
    #[error("malformed record at {location}: {reason}")]
    Malformed { location: String, reason: String },

    /// The same chapter/verse key occurs twice in one dataset.
    #[error("duplicate verse {key} on page {first_page} and page {second_page}")]
    DuplicateVerse {
        key: String,
        first_page: String,
        second_page: String,
    },

    /// Re-nesting needed a verse the index does not have.
    #[error("verse {key} is missing from the index")]
    MissingVerse { key: String },

    /// A `chapter:verse` reference could not be parsed.
    #[error("invalid verse reference '{reference}'")]
    InvalidReference { reference: String },

    /// The match pattern for a verse could not be compiled.
    #[error("failed to build match pattern for {key}: {source}")]
    Pattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    /// Run configuration is incomplete or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AlignError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            origin: origin.into(),
            source,
        }
    }

    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlignError>;
