use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use self::error::SpellerError;
use self::suggestion::Suggestion;
use self::worker::SuggestionWorker;
use crate::model::LanguageModel;
use crate::tokenizer::case_handling::lower_case;
use crate::tokenizer::Document;
use crate::vocabulary::Vocabulary;

pub mod correction;
pub mod error;
pub mod suggestion;
pub mod watch_list;
pub(crate) mod worker;

/// Hard upper bound on the number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Which edit distances make a vocabulary word a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceThreshold {
    AtMost(usize),
    Exactly(usize),
}

impl DistanceThreshold {
    pub fn accepts(&self, distance: usize) -> bool {
        match *self {
            DistanceThreshold::AtMost(max) => distance <= max,
            DistanceThreshold::Exactly(n) => distance == n,
        }
    }

    pub fn max_distance(&self) -> usize {
        match *self {
            DistanceThreshold::AtMost(n) | DistanceThreshold::Exactly(n) => n,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellerConfig {
    pub threshold: DistanceThreshold,
    /// clamped to [`MAX_SUGGESTIONS`]
    pub n_best: usize,
    /// order candidates by edit distance before context reranking
    pub rank_by_distance: bool,
}

impl SpellerConfig {
    pub const fn default() -> SpellerConfig {
        SpellerConfig {
            threshold: DistanceThreshold::AtMost(2),
            n_best: MAX_SUGGESTIONS,
            rank_by_distance: true,
        }
    }
}

impl Default for SpellerConfig {
    fn default() -> Self {
        SpellerConfig::default()
    }
}

/// A token that is not in the vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misspelling {
    /// lowercased word
    pub word: SmolStr,
    /// the word as written
    pub surface: SmolStr,
    /// byte offset in the checked text
    pub index: usize,
    /// ordinal of the token in the document
    pub position: usize,
    /// lowercased word immediately before, if any
    pub previous: Option<SmolStr>,
}

/// Misspelled tokens of `document`, in document order, duplicates kept.
pub fn check_document(document: &Document, vocabulary: &Vocabulary) -> Vec<Misspelling> {
    document
        .iter()
        .filter(|token| !vocabulary.contains(&token.value))
        .map(|token| Misspelling {
            word: token.value.clone(),
            surface: token.surface.clone(),
            index: token.index,
            position: token.position,
            previous: document.previous_word(token.position).map(SmolStr::new),
        })
        .collect()
}

pub trait Speller {
    /// Lookup for a single word. A word without letters is accepted, unlike
    /// in [`Speller::check`], which reports every word run not in the vocabulary.
    fn is_correct(self: Arc<Self>, word: &str) -> bool;
    fn check(self: Arc<Self>, text: &str) -> Vec<Misspelling>;
    fn suggest(
        self: Arc<Self>,
        word: &str,
        previous: Option<&str>,
    ) -> Result<Vec<Suggestion>, SpellerError>;
    fn suggest_with_config(
        self: Arc<Self>,
        word: &str,
        previous: Option<&str>,
        config: &SpellerConfig,
    ) -> Result<Vec<Suggestion>, SpellerError>;
}

/// Checks against a shared [`Vocabulary`] and reranks with a shared
/// [`LanguageModel`]. Neither is ever mutated, so one speller can serve any
/// number of threads.
#[derive(Debug)]
pub struct VocabularySpeller {
    vocabulary: Arc<Vocabulary>,
    model: Arc<LanguageModel>,
    config: SpellerConfig,
}

impl VocabularySpeller {
    pub fn new(vocabulary: Arc<Vocabulary>, model: Arc<LanguageModel>) -> Arc<VocabularySpeller> {
        VocabularySpeller::with_config(vocabulary, model, SpellerConfig::default())
    }

    pub fn with_config(
        vocabulary: Arc<Vocabulary>,
        model: Arc<LanguageModel>,
        config: SpellerConfig,
    ) -> Arc<VocabularySpeller> {
        Arc::new(VocabularySpeller {
            vocabulary,
            model,
            config,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    pub fn config(&self) -> &SpellerConfig {
        &self.config
    }
}

impl Speller for VocabularySpeller {
    fn is_correct(self: Arc<Self>, word: &str) -> bool {
        // Nothing to check in a word without letters.
        if !word.chars().any(char::is_alphabetic) {
            return true;
        }

        self.vocabulary.contains(&lower_case(word))
    }

    fn check(self: Arc<Self>, text: &str) -> Vec<Misspelling> {
        check_document(&Document::new(text), &self.vocabulary)
    }

    #[inline]
    fn suggest(
        self: Arc<Self>,
        word: &str,
        previous: Option<&str>,
    ) -> Result<Vec<Suggestion>, SpellerError> {
        let config = self.config.clone();
        self.suggest_with_config(word, previous, &config)
    }

    fn suggest_with_config(
        self: Arc<Self>,
        word: &str,
        previous: Option<&str>,
        config: &SpellerConfig,
    ) -> Result<Vec<Suggestion>, SpellerError> {
        SuggestionWorker::new(&self.vocabulary, &self.model, word, config).suggest(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speller() -> Arc<VocabularySpeller> {
        let vocabulary = Vocabulary::from_words([
            "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog",
        ]);
        let model = LanguageModel::train("the quick brown fox jumps over the lazy dog");
        VocabularySpeller::new(Arc::new(vocabulary), Arc::new(model))
    }

    #[test]
    fn is_correct() {
        let speller = speller();

        assert!(speller.clone().is_correct("Quick"));
        assert!(speller.clone().is_correct("42"));
        assert!(!speller.clone().is_correct("qiuck"));
    }

    #[test]
    fn check_keeps_order_and_duplicates() {
        let misspelled = speller().check("Teh fox and teh dgo");
        let words = misspelled.iter().map(|m| m.word.as_str()).collect::<Vec<_>>();

        assert_eq!(words, vec!["teh", "and", "teh", "dgo"]);
        assert_eq!(misspelled[0].surface, "Teh");
        assert_eq!(misspelled[0].previous, None);
        assert_eq!(misspelled[3].previous.as_deref(), Some("teh"));
        assert_eq!(misspelled[3].index, 16);
    }

    #[test]
    fn check_reports_numbers() {
        let misspelled = speller().check("the 42 dog");

        assert_eq!(misspelled.len(), 1);
        assert_eq!(misspelled[0].word, "42");
        assert_eq!(misspelled[0].previous.as_deref(), Some("the"));
    }

    #[test]
    fn suggest_uses_document_context() {
        let speller = speller();
        let misspelled = speller.clone().check("over the lazzy dog");
        let m = &misspelled[0];

        let suggestions = speller.suggest(&m.word, m.previous.as_deref()).unwrap();
        assert_eq!(suggestions[0].value(), "lazy");
        assert!(suggestions[0].probability() > 0.0);
    }

    #[test]
    fn config_from_json() {
        let config: SpellerConfig = serde_json::from_str(
            r#"{"threshold": {"exactly": 1}, "n_best": 3, "rank_by_distance": false}"#,
        )
        .unwrap();

        assert_eq!(config.threshold, DistanceThreshold::Exactly(1));
        assert_eq!(config.n_best, 3);
        assert!(!config.rank_by_distance);
    }

    #[test]
    fn thresholds() {
        assert!(DistanceThreshold::AtMost(2).accepts(0));
        assert!(!DistanceThreshold::AtMost(2).accepts(3));
        assert!(DistanceThreshold::Exactly(1).accepts(1));
        assert!(!DistanceThreshold::Exactly(1).accepts(0));
    }
}
