//! Vocabulary extraction from free-form domain text.
//!
//! Raw corpora are full of incidental tokens (headers, single letters, OCR
//! debris). Only tokens that are both long enough and frequent enough are
//! kept, lowercased, for merging into the vocabulary. The same pass produces
//! the cleaned corpus used to train the [`LanguageModel`](crate::model::LanguageModel).
use hashbrown::HashMap;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::tokenizer::case_handling::lower_case;
use crate::tokenizer::Tokenize;

lazy_static! {
    static ref NON_LETTERS: Regex = Regex::new(r"[^A-Za-z]+").expect("non-letter pattern");
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// tokens must be strictly longer than this
    pub min_length: usize,
    /// tokens must occur strictly more often than this
    pub min_frequency: usize,
}

impl CorpusConfig {
    pub const fn default() -> CorpusConfig {
        CorpusConfig {
            min_length: 1,
            min_frequency: 3,
        }
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub raw_chars: usize,
    pub cleaned_chars: usize,
    pub total_tokens: usize,
    pub unique_tokens: usize,
    pub filtered_tokens: usize,
}

#[derive(Clone, Debug, Default)]
pub struct CorpusExtract {
    /// lowercased tokens that passed both thresholds, sorted and unique
    pub tokens: Vec<SmolStr>,
    /// the corpus with every run of non-letters collapsed to one space
    pub cleaned: String,
    pub stats: CorpusStats,
}

/// Replaces every run of characters outside `A-Za-z` with a single space.
pub fn clean(text: &str) -> String {
    NON_LETTERS.replace_all(text, " ").into_owned()
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CorpusTokenizer {
    config: CorpusConfig,
}

impl CorpusTokenizer {
    pub fn new(config: CorpusConfig) -> CorpusTokenizer {
        CorpusTokenizer { config }
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    pub fn extract(&self, text: &str) -> CorpusExtract {
        let cleaned = clean(text);

        // Frequencies are case-sensitive and counted over the uncleaned text.
        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        let mut total_tokens = 0;
        for token in text.corpus_tokens() {
            *frequencies.entry(token).or_insert(0) += 1;
            total_tokens += 1;
        }

        let tokens = frequencies
            .iter()
            .filter(|(token, count)| {
                token.chars().count() > self.config.min_length
                    && **count > self.config.min_frequency
            })
            .map(|(token, _)| lower_case(token))
            .sorted()
            .dedup()
            .collect::<Vec<_>>();

        let stats = CorpusStats {
            raw_chars: text.chars().count(),
            cleaned_chars: cleaned.len(),
            total_tokens,
            unique_tokens: frequencies.len(),
            filtered_tokens: tokens.len(),
        };

        log::debug!(
            "corpus: {} tokens, {} unique, {} kept",
            stats.total_tokens,
            stats.unique_tokens,
            stats.filtered_tokens
        );

        CorpusExtract {
            tokens,
            cleaned,
            stats,
        }
    }
}
