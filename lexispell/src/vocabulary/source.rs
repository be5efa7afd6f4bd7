//! Raw dictionary sources: CSV-like records whose first field is a word.
use std::path::Path;

use itertools::Itertools;
use smol_str::SmolStr;

use super::encoding::{decode_with_fallback, Encoding};
use super::error::{BuildError, SourceError};
use super::VocabularyConfig;

/// One dictionary source, held as undecoded bytes.
#[derive(Clone, Debug)]
pub struct DictionarySource {
    name: String,
    bytes: Vec<u8>,
    lenient: bool,
}

/// The words read from one source.
#[derive(Debug)]
pub struct SourceWords {
    pub encoding: Encoding,
    pub words: Vec<SmolStr>,
    pub skipped_rows: Vec<SourceError>,
}

impl DictionarySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> DictionarySource {
        DictionarySource {
            name: name.into(),
            bytes: bytes.into(),
            lenient: false,
        }
    }

    /// Parses this source with quoting disabled, so stray or unbalanced
    /// quote characters become part of the field instead of swallowing
    /// the rest of the file.
    pub fn lenient(mut self, lenient: bool) -> DictionarySource {
        self.lenient = lenient;
        self
    }

    pub fn from_path(path: &Path) -> Result<DictionarySource, BuildError> {
        let bytes = std::fs::read(path)
            .map_err(|e| BuildError::Io(path.to_string_lossy().to_string(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(DictionarySource::new(name, bytes))
    }

    /// Every `.csv` file in `dir`, sorted by file name. Files listed in
    /// `config.lenient_sources` are marked lenient.
    pub fn from_dir(
        dir: &Path,
        config: &VocabularyConfig,
    ) -> Result<Vec<DictionarySource>, BuildError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| BuildError::Io(dir.to_string_lossy().to_string(), e))?;

        let paths = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "csv"))
            .sorted()
            .collect::<Vec<_>>();

        paths
            .iter()
            .map(|path| {
                let source = DictionarySource::from_path(path)?;
                let lenient = config.is_lenient(source.name());
                Ok(source.lenient(lenient))
            })
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Decodes the source with the first working encoding in `encodings` and
    /// collects the first field of every record.
    pub fn read_words(&self, encodings: &[Encoding]) -> Result<SourceWords, SourceError> {
        let (encoding, text) =
            decode_with_fallback(&self.bytes, encodings).ok_or_else(|| SourceError::Decode {
                name: self.name.clone(),
                tried: encodings.len(),
            })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(!self.lenient)
            .from_reader(text.as_bytes());

        let mut words = vec![];
        let mut skipped_rows = vec![];

        for (row, record) in reader.records().enumerate() {
            let record = match record {
                // A quote left open swallows every following line into one
                // field; such a record is not a word.
                Ok(record) if record.iter().any(|f| f.contains(['\n', '\r'])) => {
                    Err("unterminated quoted field".to_string())
                }
                Ok(record) => Ok(record),
                Err(e) => Err(e.to_string()),
            };

            match record {
                Ok(record) => {
                    if let Some(word) = record.get(0).filter(|w| !w.is_empty()) {
                        words.push(SmolStr::new(word));
                    }
                }
                Err(reason) => {
                    log::warn!("{}: skipping malformed record {}: {}", self.name, row, reason);
                    skipped_rows.push(SourceError::Parse {
                        name: self.name.clone(),
                        row,
                        reason,
                    });
                }
            }
        }

        log::debug!(
            "{}: {} words as {} ({} rows skipped)",
            self.name,
            words.len(),
            encoding,
            skipped_rows.len()
        );

        Ok(SourceWords {
            encoding,
            words,
            skipped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::encoding::DEFAULT_ENCODINGS;

    #[test]
    fn first_field_only() {
        let source = DictionarySource::new("Bword.csv", "Brown,adj,colour\nbrowse,v\n\nbrush\n");
        let words = source.read_words(&DEFAULT_ENCODINGS).unwrap();

        assert_eq!(words.encoding, Encoding::Utf8);
        assert_eq!(words.words, vec!["Brown", "browse", "brush"]);
        assert!(words.skipped_rows.is_empty());
    }

    #[test]
    fn latin1_source() {
        let source = DictionarySource::new("Cword.csv", &b"caf\xe9,n\ncafe,n\n"[..]);
        let words = source.read_words(&DEFAULT_ENCODINGS).unwrap();

        assert_eq!(words.encoding, Encoding::Latin1);
        assert_eq!(words.words, vec!["café", "cafe"]);
    }

    #[test]
    fn undecodable_source() {
        let source = DictionarySource::new("Zword.csv", &b"\xff\xfe"[..]);
        let err = source.read_words(&[Encoding::Utf8]).unwrap_err();

        assert!(matches!(err, SourceError::Decode { tried: 1, .. }));
        assert_eq!(err.source_name(), "Zword.csv");
    }

    #[test]
    fn lenient_source_keeps_quote_characters() {
        let bytes = "abandon,v\n\"aback,adv\nabase,v\n";

        let strict = DictionarySource::new("Aword.csv", bytes);
        let strict_words = strict.read_words(&DEFAULT_ENCODINGS).unwrap();
        assert_eq!(strict_words.words, vec!["abandon"]);
        assert_eq!(strict_words.skipped_rows.len(), 1);

        let lenient = DictionarySource::new("Aword.csv", bytes).lenient(true);
        let lenient_words = lenient.read_words(&DEFAULT_ENCODINGS).unwrap();
        assert_eq!(lenient_words.words, vec!["abandon", "\"aback", "abase"]);
    }

    #[test]
    fn unterminated_trailing_quote_is_skipped() {
        let source =
            DictionarySource::new("Aword.csv", "abandon,v\nabase,v\n\"aback,adv\nabacus\n");
        let words = source.read_words(&DEFAULT_ENCODINGS).unwrap();

        assert_eq!(words.words, vec!["abandon", "abase"]);
        assert_eq!(words.skipped_rows.len(), 1);
        assert!(matches!(
            &words.skipped_rows[0],
            SourceError::Parse { row: 2, .. }
        ));
    }

    #[test]
    fn directory_sources_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Bword.csv"), "brown\n").unwrap();
        std::fs::write(dir.path().join("Aword.csv"), "aback\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();

        let config = VocabularyConfig {
            lenient_sources: vec!["Aword.csv".into()],
            ..VocabularyConfig::default()
        };
        let sources = DictionarySource::from_dir(dir.path(), &config).unwrap();

        assert_eq!(
            sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            vec!["Aword.csv", "Bword.csv"]
        );
        assert!(sources[0].is_lenient());
        assert!(!sources[1].is_lenient());
    }
}
