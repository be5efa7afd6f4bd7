//! The set of words considered correctly spelled.
//!
//! A [`Vocabulary`] is built once from dictionary sources (and optionally a
//! corpus, see [`crate::corpus`]) and is read-only afterwards. Its words are
//! lowercase ASCII letters, sorted and unique, so enumeration order is the
//! same on every run.
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

pub mod builder;
pub mod encoding;
pub mod error;
pub mod source;

pub use self::builder::{BuildReport, VocabularyBuilder};
pub use self::encoding::Encoding;
use self::encoding::DEFAULT_ENCODINGS;
use self::error::{BuildError, PersistError};
pub use self::source::DictionarySource;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Encodings tried, in order, for every source
    pub encodings: Vec<Encoding>,
    /// File names of sources parsed with quoting disabled
    pub lenient_sources: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> VocabularyConfig {
        VocabularyConfig {
            encodings: DEFAULT_ENCODINGS.to_vec(),
            lenient_sources: vec![],
        }
    }
}

impl VocabularyConfig {
    pub fn is_lenient(&self, name: &str) -> bool {
        self.lenient_sources.iter().any(|x| x == name)
    }
}

/// Strips everything but ASCII letters and lowercases the rest. Returns
/// `None` when nothing is left.
pub fn normalize(word: &str) -> Option<SmolStr> {
    let normalized = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect::<SmolStr>();

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<SmolStr>,
}

impl Vocabulary {
    /// Normalizes, sorts and deduplicates `words`.
    pub fn from_words<I, S>(words: I) -> Vocabulary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words
            .into_iter()
            .filter_map(|w| normalize(w.as_ref()))
            .collect::<Vec<_>>();
        words.sort_unstable();
        words.dedup();

        Vocabulary { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Exact membership test; callers lowercase first.
    pub fn contains(&self, word: &str) -> bool {
        self.words
            .binary_search_by(|w| w.as_str().cmp(word))
            .is_ok()
    }

    /// Words in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(SmolStr::as_str)
    }

    pub fn words(&self) -> &[SmolStr] {
        &self.words
    }

    /// Words containing `term` (case-insensitive), in lexicographic order.
    pub fn search<'a>(&'a self, term: &str) -> impl Iterator<Item = &'a str> + 'a {
        let term = term.to_lowercase();
        self.iter().filter(move |w| w.contains(term.as_str()))
    }

    /// Writes every word as one comma-delimited record.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), PersistError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(writer);

        writer.write_record(self.words.iter().map(SmolStr::as_str))?;
        writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?;
        log::debug!("saved {} words to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads the union of all fields of all records.
    pub fn read_from<R: Read>(reader: R) -> Result<Vocabulary, BuildError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut words = vec![];
        for record in reader.records() {
            let record = record.map_err(PersistError::from)?;
            words.extend(record.iter().map(SmolStr::new));
        }

        let vocabulary = Vocabulary::from_words(words);
        if vocabulary.is_empty() {
            return Err(BuildError::EmptyVocabulary {
                sources: 1,
                skipped: 0,
            });
        }

        Ok(vocabulary)
    }

    pub fn load(path: &Path) -> Result<Vocabulary, BuildError> {
        let file = std::fs::File::open(path)
            .map_err(|e| BuildError::Io(path.to_string_lossy().to_string(), e))?;
        let vocabulary = Vocabulary::read_from(std::io::BufReader::new(file))?;
        log::debug!("loaded {} words from {}", vocabulary.len(), path.display());
        Ok(vocabulary)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Vocabulary::from_words(iter)
    }
}
