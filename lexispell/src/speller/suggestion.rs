//! Suggestion for a spelling correction.
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// Suggestion for a spelling correction
pub struct Suggestion {
    /// the suggested vocabulary word
    pub value: SmolStr,
    /// edit distance from the misspelled word
    pub distance: usize,
    /// probability of following the previous word, 0 without context
    pub probability: f64,
}

impl Suggestion {
    /// creates a spelling correction suggestion
    pub fn new(value: SmolStr, distance: usize, probability: f64) -> Suggestion {
        Suggestion {
            value,
            distance,
            probability,
        }
    }

    /// gets the suggested word
    pub fn value(&self) -> &str {
        &self.value
    }

    /// gets the edit distance of the suggestion
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// gets the context probability used for ranking
    pub fn probability(&self) -> f64 {
        self.probability
    }
}
