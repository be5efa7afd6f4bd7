use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::error::CorrectionError;
use super::Misspelling;
use crate::tokenizer::case_handling::match_case;

/// A chosen replacement for one misspelled token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// the word as it appears in the text
    pub word: SmolStr,
    pub suggestion: SmolStr,
    /// byte offset of `word` in the text
    pub index: usize,
}

impl Correction {
    pub fn new(misspelling: &Misspelling, suggestion: impl Into<SmolStr>) -> Correction {
        Correction {
            word: misspelling.surface.clone(),
            suggestion: suggestion.into(),
            index: misspelling.index,
        }
    }

    /// The suggestion cased like the word it replaces.
    pub fn replacement(&self) -> SmolStr {
        match_case(&self.word, &self.suggestion)
    }

    pub fn apply(&self, text: &str) -> Result<String, CorrectionError> {
        let mismatch = || CorrectionError::Mismatch {
            expected: self.word.to_string(),
            index: self.index,
        };

        let end = self.index.checked_add(self.word.len()).ok_or_else(mismatch)?;
        if text.get(self.index..end) != Some(self.word.as_str()) {
            return Err(mismatch());
        }

        let mut out = String::with_capacity(text.len() + self.suggestion.len());
        out.push_str(&text[..self.index]);
        out.push_str(&self.replacement());
        out.push_str(&text[end..]);
        Ok(out)
    }
}

/// Applies `corrections` back to front so earlier offsets stay valid.
pub fn apply_all(text: &str, corrections: &[Correction]) -> Result<String, CorrectionError> {
    let mut sorted = corrections.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| b.index.cmp(&a.index));

    sorted
        .into_iter()
        .try_fold(text.to_string(), |text, correction| correction.apply(&text))
}
