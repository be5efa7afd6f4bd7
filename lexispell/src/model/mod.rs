//! Unigram and bigram frequency model of a training corpus.
//!
//! Probabilities are plain relative frequencies: each table is normalized by
//! its own total. There is no smoothing, so an unseen word or pair has
//! probability zero. When reranking suggestions this means "no preference",
//! which keeps the ranking identical to the plain frequency model.
use hashbrown::HashMap;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use rayon::prelude::*;
use smol_str::SmolStr;

use crate::tokenizer::case_handling::lower_case;
use crate::tokenizer::Tokenize;

/// Raw occurrence counts. Counts from independent shards merge by summing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NgramCounts {
    unigrams: HashMap<SmolStr, u64>,
    bigrams: HashMap<SmolStr, HashMap<SmolStr, u64>>,
    total_unigrams: u64,
    total_bigrams: u64,
}

impl NgramCounts {
    /// Counts unigrams and adjacent pairs in one pass.
    pub fn count<I, S>(tokens: I) -> NgramCounts
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let mut counts = NgramCounts::default();
        let mut previous: Option<SmolStr> = None;

        for token in tokens {
            let token = token.into();
            *counts.unigrams.entry(token.clone()).or_insert(0) += 1;
            counts.total_unigrams += 1;

            if let Some(prev) = previous.take() {
                *counts
                    .bigrams
                    .entry(prev)
                    .or_default()
                    .entry(token.clone())
                    .or_insert(0) += 1;
                counts.total_bigrams += 1;
            }

            previous = Some(token);
        }

        counts
    }

    pub fn merge(mut self, other: NgramCounts) -> NgramCounts {
        for (word, count) in other.unigrams {
            *self.unigrams.entry(word).or_insert(0) += count;
        }
        for (first, followers) in other.bigrams {
            let entry = self.bigrams.entry(first).or_default();
            for (second, count) in followers {
                *entry.entry(second).or_insert(0) += count;
            }
        }
        self.total_unigrams += other.total_unigrams;
        self.total_bigrams += other.total_bigrams;
        self
    }
}

/// Immutable once built; retrain to change it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LanguageModel {
    counts: NgramCounts,
}

fn training_tokens(text: &str) -> impl Iterator<Item = SmolStr> + '_ {
    text.word_runs().map(|(_, word)| lower_case(word))
}

impl LanguageModel {
    /// Lowercases `text`, splits it into runs of word characters and counts them.
    pub fn train(text: &str) -> LanguageModel {
        let model = LanguageModel::from_tokens(training_tokens(text));
        log::debug!(
            "trained language model: {} unigrams ({} distinct), {} bigrams",
            model.counts.total_unigrams,
            model.counts.unigrams.len(),
            model.counts.total_bigrams
        );
        model
    }

    pub fn from_tokens<I, S>(tokens: I) -> LanguageModel
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        LanguageModel {
            counts: NgramCounts::count(tokens),
        }
    }

    /// Trains on each shard in parallel and sums the counts. Pairs spanning
    /// two shards are not counted.
    pub fn from_shards<S: AsRef<str> + Sync>(shards: &[S]) -> LanguageModel {
        let counts = shards
            .par_iter()
            .map(|shard| NgramCounts::count(training_tokens(shard.as_ref())))
            .reduce(NgramCounts::default, NgramCounts::merge);

        LanguageModel { counts }
    }

    pub fn from_counts(counts: NgramCounts) -> LanguageModel {
        LanguageModel { counts }
    }

    /// Whether any token has been observed.
    pub fn is_trained(&self) -> bool {
        self.counts.total_unigrams > 0
    }

    pub fn total_unigrams(&self) -> u64 {
        self.counts.total_unigrams
    }

    pub fn total_bigrams(&self) -> u64 {
        self.counts.total_bigrams
    }

    pub fn unigram_count(&self, word: &str) -> u64 {
        self.counts.unigrams.get(word).copied().unwrap_or(0)
    }

    pub fn bigram_count(&self, first: &str, second: &str) -> u64 {
        self.counts
            .bigrams
            .get(first)
            .and_then(|followers| followers.get(second))
            .copied()
            .unwrap_or(0)
    }

    pub fn unigram_probability(&self, word: &str) -> f64 {
        ratio(self.unigram_count(word), self.counts.total_unigrams)
    }

    pub fn bigram_probability(&self, first: &str, second: &str) -> f64 {
        ratio(self.bigram_count(first, second), self.counts.total_bigrams)
    }

    pub fn is_known_bigram(&self, first: &str, second: &str) -> bool {
        self.bigram_count(first, second) > 0
    }

    /// P(second | first) = count(first, second) / count(first).
    pub fn conditional_probability(&self, first: &str, second: &str) -> f64 {
        ratio(self.bigram_count(first, second), self.unigram_count(first))
    }

    /// Observed followers of `first` with their conditional probabilities,
    /// sorted by word.
    pub fn successors(&self, first: &str) -> Vec<(SmolStr, f64)> {
        let base = self.unigram_count(first);
        let mut out = self
            .counts
            .bigrams
            .get(first)
            .map(|followers| {
                followers
                    .iter()
                    .map(|(word, count)| (word.clone(), ratio(*count, base)))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn unigrams(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.counts
            .unigrams
            .iter()
            .map(move |(word, count)| (word.as_str(), ratio(*count, self.counts.total_unigrams)))
    }

    pub fn bigrams(&self) -> impl Iterator<Item = ((&str, &str), f64)> + '_ {
        self.counts.bigrams.iter().flat_map(move |(first, followers)| {
            followers.iter().map(move |(second, count)| {
                (
                    (first.as_str(), second.as_str()),
                    ratio(*count, self.counts.total_bigrams),
                )
            })
        })
    }

    /// Random walk over the bigram table starting at `seed`, each step
    /// weighted by the pair count. Returns the seed followed by at most
    /// `num_words` words; stops early at a word with no observed follower.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        seed: &str,
        num_words: usize,
        rng: &mut R,
    ) -> Vec<SmolStr> {
        let mut current = lower_case(seed);
        let mut out = vec![current.clone()];

        for _ in 0..num_words {
            let successors = self.successors(&current);
            if successors.is_empty() {
                break;
            }

            let weights = successors
                .iter()
                .map(|(word, _)| self.bigram_count(&current, word))
                .collect::<Vec<_>>();
            let dist = match WeightedIndex::<u64>::new(&weights) {
                Ok(dist) => dist,
                Err(e) => {
                    log::warn!("cannot continue from '{}': {}", current, e);
                    break;
                }
            };

            current = successors[dist.sample(rng)].0.clone();
            out.push(current.clone());
        }

        out
    }
}

#[inline(always)]
fn ratio(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
