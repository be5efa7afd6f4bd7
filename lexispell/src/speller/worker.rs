use std::cmp::Ordering;

use smol_str::SmolStr;

use super::error::SpellerError;
use super::{SpellerConfig, MAX_SUGGESTIONS};
use crate::model::LanguageModel;
use crate::speller::suggestion::Suggestion;
use crate::tokenizer::case_handling::lower_case;
use crate::vocabulary::Vocabulary;

pub(crate) struct SuggestionWorker<'a> {
    vocabulary: &'a Vocabulary,
    model: &'a LanguageModel,
    input: SmolStr,
    config: &'a SpellerConfig,
}

impl<'a> SuggestionWorker<'a> {
    #[inline(always)]
    pub(crate) fn new(
        vocabulary: &'a Vocabulary,
        model: &'a LanguageModel,
        word: &str,
        config: &'a SpellerConfig,
    ) -> SuggestionWorker<'a> {
        SuggestionWorker {
            vocabulary,
            model,
            input: lower_case(word),
            config,
        }
    }

    /// Every vocabulary word within the distance threshold, in vocabulary
    /// (lexicographic) order, then stably ordered by distance if configured.
    pub(crate) fn candidates(&self) -> Vec<Suggestion> {
        let max_distance = self.config.threshold.max_distance();
        let input_len = self.input.chars().count();

        let mut candidates = self
            .vocabulary
            .iter()
            .filter_map(|entry| {
                // Vocabulary words are ASCII, so byte length is char length.
                if entry.len().abs_diff(input_len) > max_distance {
                    return None;
                }

                let distance = strsim::levenshtein(&self.input, entry);
                if self.config.threshold.accepts(distance) {
                    Some(Suggestion::new(SmolStr::new(entry), distance, 0.0))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        if self.config.rank_by_distance {
            candidates.sort_by_key(|s| s.distance);
        }

        candidates
    }

    /// Stable sort by descending P(previous, candidate); ties keep their order.
    fn rerank(&self, candidates: &mut [Suggestion], previous: &str) {
        for candidate in candidates.iter_mut() {
            candidate.probability = self.model.bigram_probability(previous, &candidate.value);
        }

        candidates.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
    }

    pub(crate) fn suggest(&self, previous: Option<&str>) -> Result<Vec<Suggestion>, SpellerError> {
        if self.input.is_empty() {
            return Ok(vec![]);
        }

        let previous = previous.map(lower_case);
        if let Some(previous) = &previous {
            if !self.model.is_trained() {
                return Err(SpellerError::UntrainedModel(previous.to_string()));
            }
        }

        log::trace!("Beginning suggest for '{}'", self.input);
        let mut candidates = self.candidates();

        if let Some(previous) = &previous {
            self.rerank(&mut candidates, previous);
        }

        candidates.truncate(self.config.n_best.min(MAX_SUGGESTIONS));
        Ok(candidates)
    }
}
