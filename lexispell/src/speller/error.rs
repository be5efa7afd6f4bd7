//! Error types for spell-checking operations.

/// Errors that can occur while producing suggestions.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpellerError {
    /// Context reranking was requested but the language model has seen no tokens
    #[error("Language model is untrained; cannot rerank by previous word '{0}'")]
    UntrainedModel(String),
}

/// Errors applying a [`Correction`](super::correction::Correction) to text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CorrectionError {
    /// The text at the recorded offset is not the recorded word
    #[error("Expected '{expected}' at byte {index}")]
    Mismatch { expected: String, index: usize },
}
