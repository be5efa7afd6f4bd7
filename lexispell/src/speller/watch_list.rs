//! Advisory warnings for easily confused words.
//!
//! A warning only says "double-check this word"; it never changes whether
//! a token is considered misspelled.
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::tokenizer::case_handling::lower_case;

lazy_static! {
    // Letters with an optional apostrophe suffix, so "they're" is one word.
    static ref WATCHED_WORD: Regex =
        Regex::new(r"[A-Za-z]+(?:['\u{2019}][A-Za-z]+)?").expect("watched word pattern");
}

const DEFAULT_GROUPS: &[&[&str]] = &[
    &["their", "there", "they're"],
    &["your", "you're"],
    &["its", "it's"],
    &["to", "too", "two"],
    &["then", "than"],
    &["affect", "effect"],
    &["lose", "loose"],
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWarning {
    /// the word as written
    pub word: SmolStr,
    /// byte offset in the text
    pub index: usize,
    /// the other members of the word's group
    pub alternatives: Vec<SmolStr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchList {
    groups: Vec<Vec<SmolStr>>,
}

impl Default for WatchList {
    fn default() -> WatchList {
        WatchList::new(DEFAULT_GROUPS.iter().map(|g| g.iter().copied()))
    }
}

impl WatchList {
    pub fn new<G, W, S>(groups: G) -> WatchList
    where
        G: IntoIterator<Item = W>,
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups = groups
            .into_iter()
            .map(|g| g.into_iter().map(|w| normalize_apostrophe(w.as_ref())).collect::<Vec<_>>())
            .filter(|g| g.len() > 1)
            .collect();

        WatchList { groups }
    }

    pub fn groups(&self) -> &[Vec<SmolStr>] {
        &self.groups
    }

    /// The group containing `word`, if any.
    pub fn group_of(&self, word: &str) -> Option<&[SmolStr]> {
        let word = normalize_apostrophe(word);
        self.groups
            .iter()
            .find(|g| g.contains(&word))
            .map(Vec::as_slice)
    }

    /// A warning for every watched word in `text`, in text order.
    pub fn scan(&self, text: &str) -> Vec<ContextWarning> {
        WATCHED_WORD
            .find_iter(text)
            .filter_map(|m| {
                let word = normalize_apostrophe(m.as_str());
                let group = self.group_of(&word)?;

                Some(ContextWarning {
                    word: SmolStr::new(m.as_str()),
                    index: m.start(),
                    alternatives: group.iter().filter(|w| **w != word).cloned().collect(),
                })
            })
            .collect()
    }
}

#[inline(always)]
fn normalize_apostrophe(word: &str) -> SmolStr {
    lower_case(&word.replace('\u{2019}', "'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_finds_group_members() {
        let warnings = WatchList::default().scan("Their car is faster then they’re expecting.");

        assert_eq!(
            warnings.iter().map(|w| w.word.as_str()).collect::<Vec<_>>(),
            vec!["Their", "then", "they’re"]
        );
        assert_eq!(warnings[0].index, 0);
        assert_eq!(warnings[0].alternatives, vec![SmolStr::new("there"), SmolStr::new("they're")]);
        assert_eq!(warnings[1].alternatives, vec![SmolStr::new("than")]);
        assert_eq!(warnings[2].index, 25);
    }

    #[test]
    fn custom_groups() {
        let list = WatchList::new(vec![vec!["brake", "break"], vec!["lonely"]]);

        assert_eq!(list.groups().len(), 1);
        assert!(list.group_of("Break").is_some());
        assert!(list.group_of("lonely").is_none());
        assert!(list.scan("the brakes failed").is_empty());
    }
}
