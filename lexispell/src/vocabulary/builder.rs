use hashbrown::HashSet;
use rayon::prelude::*;
use serde::Serialize;
use smol_str::SmolStr;

use super::error::{BuildError, SourceError};
use super::source::DictionarySource;
use super::{Vocabulary, VocabularyConfig};

/// Summary of a vocabulary build. Recovered source and record errors are
/// kept in `errors`; a report with errors describes a partial success.
#[derive(Debug, Default, Serialize)]
pub struct BuildReport {
    pub sources: usize,
    pub skipped_sources: Vec<String>,
    pub skipped_rows: usize,
    /// distinct raw words across all readable sources
    pub base_words: usize,
    /// words added on top of the sources, e.g. corpus tokens
    pub extra_words: usize,
    pub vocabulary_words: usize,
    #[serde(skip)]
    pub errors: Vec<SourceError>,
}

impl BuildReport {
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Merges dictionary sources and extra word lists into one [`Vocabulary`].
#[derive(Debug, Default)]
pub struct VocabularyBuilder {
    config: VocabularyConfig,
    sources: Vec<DictionarySource>,
    extra_words: Vec<SmolStr>,
}

impl VocabularyBuilder {
    pub fn new(config: VocabularyConfig) -> VocabularyBuilder {
        VocabularyBuilder {
            config,
            sources: vec![],
            extra_words: vec![],
        }
    }

    pub fn source(mut self, source: DictionarySource) -> VocabularyBuilder {
        self.sources.push(source);
        self
    }

    pub fn sources<I>(mut self, sources: I) -> VocabularyBuilder
    where
        I: IntoIterator<Item = DictionarySource>,
    {
        self.sources.extend(sources);
        self
    }

    pub fn words<I, S>(mut self, words: I) -> VocabularyBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.extra_words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Reads every source (in parallel), skipping those that cannot be
    /// decoded, then normalizes and deduplicates the merged words.
    ///
    /// Fails only if no word survives.
    pub fn build(self) -> Result<(Vocabulary, BuildReport), BuildError> {
        let VocabularyBuilder {
            config,
            sources,
            extra_words,
        } = self;

        let results = sources
            .par_iter()
            .map(|source| source.read_words(&config.encodings))
            .collect::<Vec<_>>();

        let mut report = BuildReport {
            sources: sources.len(),
            extra_words: extra_words.len(),
            ..BuildReport::default()
        };
        let mut base = HashSet::new();

        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(words) => {
                    report.skipped_rows += words.skipped_rows.len();
                    report.errors.extend(words.skipped_rows);
                    base.extend(words.words);
                }
                Err(e) => {
                    log::warn!("skipping source: {}", e);
                    report.skipped_sources.push(source.name().to_string());
                    report.errors.push(e);
                }
            }
        }

        report.base_words = base.len();

        let vocabulary = Vocabulary::from_words(base.iter().chain(extra_words.iter()));
        report.vocabulary_words = vocabulary.len();

        if vocabulary.is_empty() {
            return Err(BuildError::EmptyVocabulary {
                sources: report.sources,
                skipped: report.skipped_sources.len(),
            });
        }

        log::debug!(
            "built vocabulary of {} words from {} sources ({} skipped)",
            report.vocabulary_words,
            report.sources,
            report.skipped_sources.len()
        );

        Ok((vocabulary, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Encoding;

    #[test]
    fn merges_and_normalizes() {
        let (vocab, report) = VocabularyBuilder::default()
            .source(DictionarySource::new("A.csv", "Aback,adv\nabase,v\n"))
            .source(DictionarySource::new("B.csv", "brown\naback\nre-enter\n"))
            .words(["aerodynamics", "brown"])
            .build()
            .unwrap();

        assert_eq!(
            vocab.iter().collect::<Vec<_>>(),
            vec!["aback", "abase", "aerodynamics", "brown", "reenter"]
        );
        assert_eq!(report.sources, 2);
        assert_eq!(report.base_words, 5);
        assert_eq!(report.extra_words, 2);
        assert_eq!(report.vocabulary_words, 5);
        assert!(!report.is_partial());
    }

    #[test]
    fn bad_source_is_skipped() {
        let config = VocabularyConfig {
            encodings: vec![Encoding::Utf8],
            ..VocabularyConfig::default()
        };

        let (vocab, report) = VocabularyBuilder::new(config)
            .source(DictionarySource::new("bad.csv", &b"\xff\xfe\xfd"[..]))
            .source(DictionarySource::new("empty.csv", ""))
            .source(DictionarySource::new("good.csv", "quick\nbrown\n"))
            .build()
            .unwrap();

        assert_eq!(vocab.len(), 2);
        assert_eq!(report.skipped_sources, vec!["bad.csv".to_string()]);
        assert!(report.is_partial());
    }

    #[test]
    fn malformed_row_is_partial_success() {
        let (vocab, report) = VocabularyBuilder::default()
            .source(DictionarySource::new("A.csv", "abandon,v\nabase,v\n\"aback,adv\n"))
            .source(DictionarySource::new("B.csv", "brown\n"))
            .build()
            .unwrap();

        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["abandon", "abase", "brown"]);
        assert_eq!(report.skipped_rows, 1);
        assert!(report.skipped_sources.is_empty());
        assert!(report.is_partial());
    }

    #[test]
    fn all_sources_unreadable() {
        let config = VocabularyConfig {
            encodings: vec![Encoding::Utf8],
            ..VocabularyConfig::default()
        };

        let err = VocabularyBuilder::new(config)
            .source(DictionarySource::new("bad.csv", &b"\xff"[..]))
            .source(DictionarySource::new("digits.csv", "1\n2\n3\n"))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            BuildError::EmptyVocabulary {
                sources: 2,
                skipped: 1
            }
        ));
    }
}
