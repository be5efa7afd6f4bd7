//! Vocabulary build and persistence errors.
use std::io::Error;

/// Problems with a single dictionary source. These never abort a build; the
/// affected source or record is skipped and the error kept in the report.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SourceError {
    /// No configured encoding could decode the source
    #[error("Source '{name}' could not be decoded with any of {tried} encodings")]
    Decode { name: String, tried: usize },

    /// A record of a decoded source was malformed
    #[error("Malformed record {row} in source '{name}': {reason}")]
    Parse {
        name: String,
        row: usize,
        reason: String,
    },
}

impl SourceError {
    pub fn source_name(&self) -> &str {
        match self {
            SourceError::Decode { name, .. } => name,
            SourceError::Parse { name, .. } => name,
        }
    }
}

/// Errors that stop a vocabulary from being built or loaded.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// No words were left after merging every source
    #[error("Vocabulary is empty after reading {sources} sources ({skipped} skipped)")]
    EmptyVocabulary { sources: usize, skipped: usize },

    /// A source, corpus or vocabulary file could not be read
    #[error("I/O error reading '{0}'")]
    Io(String, #[source] Error),

    /// The persisted vocabulary could not be read or written
    #[error("Failed to persist vocabulary")]
    Persist(#[from] PersistError),
}

/// Errors reading or writing the persisted vocabulary file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PersistError {
    /// I/O error on the vocabulary file
    #[error("I/O error on vocabulary file")]
    Io(#[from] Error),

    /// The vocabulary record could not be encoded or decoded
    #[error("Invalid vocabulary record")]
    Csv(#[from] csv::Error),
}
