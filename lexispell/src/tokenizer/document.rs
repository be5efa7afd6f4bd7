use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::case_handling::lower_case;
use super::Tokenize;

/// A word extracted from a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// lowercased form, used for every lookup
    pub value: SmolStr,
    /// the word as it appears in the text
    pub surface: SmolStr,
    /// byte offset of the word in the text
    pub index: usize,
    /// ordinal of the word within the document
    pub position: usize,
}

/// An ordered sequence of tokens, rebuilt for every request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    tokens: Vec<Token>,
}

impl Document {
    pub fn new(text: &str) -> Document {
        let tokens = text
            .word_runs()
            .enumerate()
            .map(|(position, (index, word))| Token {
                value: lower_case(word),
                surface: SmolStr::new(word),
                index,
                position,
            })
            .collect();

        Document { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The lowercased word immediately before the token at `position`.
    pub fn previous_word(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.value.as_str())
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_order_and_positions() {
        let doc = Document::new("Teh quick, brown fox");
        let values = doc.iter().map(|t| t.value.as_str()).collect::<Vec<_>>();

        assert_eq!(values, vec!["teh", "quick", "brown", "fox"]);
        assert_eq!(doc.tokens()[0].surface, "Teh");
        assert_eq!(doc.tokens()[2].index, 11);
        assert_eq!(doc.tokens()[3].position, 3);
    }

    #[test]
    fn previous_word() {
        let doc = Document::new("The lazy dogg");

        assert_eq!(doc.previous_word(0), None);
        assert_eq!(doc.previous_word(1), Some("the"));
        assert_eq!(doc.previous_word(2), Some("lazy"));
        assert_eq!(doc.previous_word(9), None);
    }

    #[test]
    fn numbers_are_tokens() {
        let doc = Document::new("lap 42 of 7b");
        let values = doc.iter().map(|t| t.value.as_str()).collect::<Vec<_>>();

        assert_eq!(values, vec!["lap", "42", "of", "7b"]);
        assert_eq!(doc.previous_word(2), Some("42"));
    }

    #[test]
    fn duplicates_are_preserved() {
        let doc = Document::new("the the the");
        assert_eq!(doc.len(), 3);
    }
}
