//! Word tokenization for user documents and training corpora.
use lazy_static::lazy_static;
use regex::{Matches, Regex};

pub mod case_handling;
mod document;

pub use self::document::{Document, Token};

lazy_static! {
    static ref WORD_RUN: Regex = Regex::new(r"\w+").expect("word run pattern");
    static ref CORPUS_TOKEN: Regex = Regex::new(r"[A-Za-z]\w+").expect("corpus token pattern");
}

/// Iterator over `(byte offset, word)` pairs of a string.
pub struct WordIndices<'a> {
    matches: Matches<'static, 'a>,
    letters_only: bool,
}

impl<'a> Iterator for WordIndices<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let m = self.matches.next()?;
            let word = m.as_str();

            if self.letters_only && !word.chars().any(char::is_alphabetic) {
                continue;
            }

            return Some((m.start(), word));
        }
    }
}

/// Iterator over the words of a string, without offsets.
pub struct Words<'a>(WordIndices<'a>);

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, word)| word)
    }
}

pub trait Tokenize {
    /// Every run of word characters, digits included.
    fn word_runs(&self) -> WordIndices;

    /// Runs of word characters containing at least one letter.
    fn word_indices(&self) -> WordIndices;
    fn words(&self) -> Words;

    /// Case-sensitive corpus tokens: an ASCII letter followed by one or
    /// more word characters.
    fn corpus_tokens(&self) -> Words;
}

impl Tokenize for str {
    fn word_runs(&self) -> WordIndices {
        WordIndices {
            matches: WORD_RUN.find_iter(self),
            letters_only: false,
        }
    }

    fn word_indices(&self) -> WordIndices {
        WordIndices {
            matches: WORD_RUN.find_iter(self),
            letters_only: true,
        }
    }

    fn words(&self) -> Words {
        Words(self.word_indices())
    }

    fn corpus_tokens(&self) -> Words {
        Words(WordIndices {
            matches: CORPUS_TOKEN.find_iter(self),
            letters_only: false,
        })
    }
}
