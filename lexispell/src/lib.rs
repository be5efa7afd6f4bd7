/*! Spell-checking and correction against a merged dictionary vocabulary.

A [`Vocabulary`] is built once from heterogeneous dictionary sources (mixed
encodings, ragged or malformed rows) plus the recurring terms of a domain
corpus. Tokens missing from it are misspelled. Suggestions are vocabulary
words within a small Levenshtein distance, reranked by a bigram
[`LanguageModel`] trained on the same corpus when the preceding word is
known.

# Usage examples

```
use lexispell::vocabulary::DictionarySource;

let sources = vec![DictionarySource::new("words.csv", "quick\nbrown\nfox\nthe\nlazy\ndog\n")];
let vocabulary = lexispell::build_vocabulary(sources).unwrap();
let model = lexispell::train_language_model("the quick brown fox jumps over the lazy dog");

assert_eq!(lexispell::check("Teh quick brown fox", &vocabulary), vec!["teh"]);
assert_eq!(lexispell::suggest("teh", &vocabulary, &model, None).unwrap()[0], "the");
```

Further examples of how to use the library can be found in
[`lexispell-bin`] in the same repository.

[`lexispell-bin`]: (../lexispell-bin)

*/

pub mod corpus;
pub mod model;
pub mod speller;
pub mod tokenizer;
pub mod vocabulary;

use serde::Serialize;
use smol_str::SmolStr;

pub use crate::corpus::{CorpusConfig, CorpusExtract, CorpusTokenizer};
pub use crate::model::LanguageModel;
pub use crate::speller::error::SpellerError;
pub use crate::speller::{DistanceThreshold, Speller, SpellerConfig, VocabularySpeller};
pub use crate::tokenizer::Document;
pub use crate::vocabulary::error::BuildError;
pub use crate::vocabulary::{BuildReport, DictionarySource, Vocabulary, VocabularyConfig};

use crate::speller::worker::SuggestionWorker;
use crate::vocabulary::VocabularyBuilder;

/// Result of [`build_dictionary`].
#[derive(Debug, Serialize)]
pub struct BuildOutput {
    #[serde(skip)]
    pub vocabulary: Vocabulary,
    /// cleaned corpus text and filtered corpus tokens
    #[serde(skip)]
    pub corpus: CorpusExtract,
    pub report: BuildReport,
}

/// Merges `sources` into a vocabulary with the default encoding chain.
pub fn build_vocabulary<I>(sources: I) -> Result<Vocabulary, BuildError>
where
    I: IntoIterator<Item = DictionarySource>,
{
    VocabularyBuilder::new(VocabularyConfig::default())
        .sources(sources)
        .build()
        .map(|(vocabulary, _)| vocabulary)
}

/// Builds the vocabulary from `sources` plus the filtered tokens of
/// `corpus_text`, and cleans the corpus for language model training.
pub fn build_dictionary<I>(
    sources: I,
    corpus_text: &str,
    vocabulary_config: VocabularyConfig,
    corpus_config: CorpusConfig,
) -> Result<BuildOutput, BuildError>
where
    I: IntoIterator<Item = DictionarySource>,
{
    let corpus = CorpusTokenizer::new(corpus_config).extract(corpus_text);

    let (vocabulary, report) = VocabularyBuilder::new(vocabulary_config)
        .sources(sources)
        .words(corpus.tokens.iter().cloned())
        .build()?;

    Ok(BuildOutput {
        vocabulary,
        corpus,
        report,
    })
}

/// Trains the bigram model on `corpus_text` after [`corpus::clean`], so raw
/// and pre-cleaned text give the same model.
pub fn train_language_model(corpus_text: &str) -> LanguageModel {
    LanguageModel::train(&corpus::clean(corpus_text))
}

/// Lowercased misspelled words of `text` in document order, duplicates kept.
pub fn check(text: &str, vocabulary: &Vocabulary) -> Vec<SmolStr> {
    speller::check_document(&Document::new(text), vocabulary)
        .into_iter()
        .map(|m| m.word)
        .collect()
}

/// At most five corrections for `word`, best first.
#[inline]
pub fn suggest(
    word: &str,
    vocabulary: &Vocabulary,
    model: &LanguageModel,
    previous: Option<&str>,
) -> Result<Vec<SmolStr>, SpellerError> {
    suggest_with_config(word, vocabulary, model, previous, &SpellerConfig::default())
}

pub fn suggest_with_config(
    word: &str,
    vocabulary: &Vocabulary,
    model: &LanguageModel,
    previous: Option<&str>,
    config: &SpellerConfig,
) -> Result<Vec<SmolStr>, SpellerError> {
    let suggestions = SuggestionWorker::new(vocabulary, model, word, config).suggest(previous)?;
    Ok(suggestions.into_iter().map(|s| s.value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speller::MAX_SUGGESTIONS;

    fn vocabulary() -> Vocabulary {
        Vocabulary::from_words(["quick", "brown", "fox", "jumps", "lazy", "dog"])
    }

    fn model() -> LanguageModel {
        LanguageModel::from_tokens([
            "the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog",
        ])
    }

    #[test]
    fn bigrams_from_training() {
        let model = model();

        assert!(model.bigram_probability("the", "quick") > 0.0);
        assert_eq!(model.bigram_probability("the", "zebra"), 0.0);
    }

    #[test]
    fn check_finds_unknown_words() {
        assert_eq!(check("Teh quick brown fox", &vocabulary()), vec!["teh"]);
    }

    #[test]
    fn check_includes_digit_runs() {
        assert_eq!(check("quick 42 fox", &vocabulary()), vec!["42"]);
    }

    #[test]
    fn suggest_without_candidates_is_empty() {
        let suggestions = suggest("teh", &vocabulary(), &model(), None).unwrap();
        assert!(suggestions.is_empty());

        let mut words = vocabulary().words().to_vec();
        words.push("the".into());
        let vocabulary = Vocabulary::from_words(words);
        assert_eq!(suggest("teh", &vocabulary, &model(), None).unwrap(), vec!["the"]);
    }

    #[test]
    fn context_promotes_likely_follower() {
        let vocabulary = Vocabulary::from_words([
            "quick", "brown", "fox", "jumps", "lazy", "dog", "the", "dogs", "bog",
        ]);
        let model = train_language_model("the lazy dog");
        assert_eq!(model.bigram_probability("lazy", "dog"), 0.5);

        let config = SpellerConfig {
            rank_by_distance: false,
            ..SpellerConfig::default()
        };
        let suggestions =
            suggest_with_config("dogg", &vocabulary, &model, Some("lazy"), &config).unwrap();
        assert_eq!(suggestions, vec!["dog", "bog", "dogs"]);
    }

    #[test]
    fn bad_sources_do_not_fail_build() {
        let sources = vec![
            DictionarySource::new("empty.csv", ""),
            DictionarySource::new("junk.csv", "123,45\n!!!,?\n\"\"\n"),
            DictionarySource::new("words.csv", "Quick,adj\nbrown\n"),
        ];

        let vocabulary = build_vocabulary(sources).unwrap();
        assert_eq!(vocabulary.words(), &["brown", "quick"]);
    }

    #[test]
    fn all_sources_bad_is_an_error() {
        let sources = vec![
            DictionarySource::new("empty.csv", ""),
            DictionarySource::new("junk.csv", "123\n"),
        ];

        assert!(matches!(
            build_vocabulary(sources),
            Err(BuildError::EmptyVocabulary { sources: 2, skipped: 0 })
        ));
    }

    #[test]
    fn dictionary_merges_corpus_terms() {
        let corpus = "Lexeme lexeme Lexeme lexeme. Morpheme morpheme Morpheme, x x x x x";
        let output = build_dictionary(
            vec![DictionarySource::new("words.csv", "word\n")],
            corpus,
            VocabularyConfig::default(),
            CorpusConfig {
                min_length: 1,
                min_frequency: 1,
            },
        )
        .unwrap();

        assert_eq!(output.vocabulary.words(), &["lexeme", "morpheme", "word"]);
        assert_eq!(
            output.corpus.cleaned,
            "Lexeme lexeme Lexeme lexeme Morpheme morpheme Morpheme x x x x x"
        );
        assert_eq!(output.report.base_words, 1);
        assert_eq!(output.report.vocabulary_words, 3);
    }

    #[test]
    fn suggest_is_deterministic_and_bounded() {
        let vocabulary = Vocabulary::from_words([
            "cat", "bat", "hat", "mat", "rat", "sat", "vat", "pat", "fat", "cap", "car", "cot",
        ]);
        let model = train_language_model("the fat cat sat on the mat");

        for previous in [None, Some("the"), Some("unseen")] {
            let first = suggest("cta", &vocabulary, &model, previous).unwrap();
            let second = suggest("cta", &vocabulary, &model, previous).unwrap();

            assert_eq!(first, second);
            assert!(first.len() <= MAX_SUGGESTIONS);
        }
    }

    #[test]
    fn training_cleans_raw_corpus() {
        let model = train_language_model("Take the f1 car, then (the) bus.");

        assert_eq!(model.unigram_count("f1"), 0);
        assert_eq!(model.unigram_count("f"), 1);
        assert!(model.bigram_probability("the", "bus") > 0.0);
    }

    #[test]
    fn untrained_model_is_reported() {
        let result = suggest("dogg", &vocabulary(), &LanguageModel::default(), Some("lazy"));
        assert!(matches!(result, Err(SpellerError::UntrainedModel(_))));
    }
}
