use chrono::prelude::*;
use std::error::Error;
use std::{
    io::Write,
    path::Path,
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};

use distance::damerau_levenshtein;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use lexispell::corpus::clean;
use lexispell::speller::suggestion::Suggestion;
use lexispell::speller::{Speller, SpellerConfig, VocabularySpeller};
use lexispell::{LanguageModel, Vocabulary};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use structopt::clap::{App, AppSettings, Arg};

static CFG: SpellerConfig = SpellerConfig::default();

/// One typo to evaluate: the misspelling, the intended word and optionally
/// the word before it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TestCase {
    input: String,
    expected: String,
    previous: Option<String>,
}

fn load_words(path: &Path, max_words: Option<usize>) -> Result<Vec<TestCase>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| {
            let input = r.get(0)?;
            let expected = r.get(1)?;
            Some(TestCase {
                input: input.to_string(),
                expected: expected.to_string(),
                previous: r.get(2).filter(|x| !x.is_empty()).map(str::to_string),
            })
        })
        .take(max_words.unwrap_or(usize::MAX))
        .collect())
}

#[derive(Debug, Default, Serialize, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
struct Time {
    secs: u64,
    subsec_nanos: u32,
}

impl From<Duration> for Time {
    fn from(d: Duration) -> Time {
        Time {
            secs: d.as_secs(),
            subsec_nanos: d.subsec_nanos(),
        }
    }
}

impl Time {
    fn as_duration(&self) -> Duration {
        Duration::new(self.secs, self.subsec_nanos)
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let ms = self.secs * 1000 + (self.subsec_nanos as u64 / 1_000_000);
        write!(f, "{}ms", ms)
    }
}

#[derive(Debug, Serialize)]
struct AccuracyResult<'a> {
    input: &'a str,
    expected: &'a str,
    previous: Option<&'a str>,
    distance: usize,
    suggestions: Vec<Suggestion>,
    position: Option<usize>,
    time: Time,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    vocabulary_words: usize,
    trained_tokens: u64,
    config: &'a SpellerConfig,
    summary: Summary,
    results: Vec<AccuracyResult<'a>>,
    start_timestamp: Time,
    total_time: Time,
}

#[derive(Serialize, Default, Debug, Clone)]
struct Summary {
    total_words: u32,
    first_position: u32,
    top_five: u32,
    any_position: u32,
    no_suggestions: u32,
    only_wrong: u32,
    slowest_lookup: Time,
    fastest_lookup: Time,
    average_time: Time,
    average_time_95pc: Time,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let percent =
            |v: u32| -> String { format!("{:.2}%", v as f32 / self.total_words as f32 * 100f32) };

        write!(
            f,
            "[#1] {} [^5] {} [any] {} [none] {} [wrong] {} [fast] {} [slow] {} [avg] {}",
            percent(self.first_position),
            percent(self.top_five),
            percent(self.any_position),
            percent(self.no_suggestions),
            percent(self.only_wrong),
            self.fastest_lookup,
            self.slowest_lookup,
            self.average_time
        )
    }
}

fn average(times: &[Time]) -> Time {
    if times.is_empty() {
        return Time::default();
    }
    let total: Duration = times.iter().map(Time::as_duration).sum();
    Time::from(total / times.len() as u32)
}

impl Summary {
    fn new<'a>(results: &[AccuracyResult<'a>]) -> Summary {
        let mut summary = Summary::default();

        results.iter().for_each(|result| {
            summary.total_words += 1;

            if let Some(position) = result.position {
                summary.any_position += 1;

                if position == 0 {
                    summary.first_position += 1;
                }

                if position < 5 {
                    summary.top_five += 1;
                }
            } else if result.suggestions.is_empty() {
                summary.no_suggestions += 1;
            } else {
                summary.only_wrong += 1;
            }
        });

        let mut times = results.iter().map(|r| r.time).collect::<Vec<_>>();
        times.sort();

        if let (Some(fastest), Some(slowest)) = (times.first(), times.last()) {
            summary.fastest_lookup = *fastest;
            summary.slowest_lookup = *slowest;
        }
        summary.average_time = average(&times);
        summary.average_time_95pc = average(&times[..times.len() * 95 / 100]);

        summary
    }
}

fn load_speller(
    vocabulary: &str,
    corpus: Option<&str>,
    cfg: SpellerConfig,
) -> Result<Arc<VocabularySpeller>, Box<dyn Error>> {
    let vocabulary = Vocabulary::load(Path::new(vocabulary))?;
    let model = match corpus {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            LanguageModel::train(&clean(&String::from_utf8_lossy(&bytes)))
        }
        None => LanguageModel::default(),
    };

    Ok(VocabularySpeller::with_config(Arc::new(vocabulary), Arc::new(model), cfg))
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let matches = App::new("lexispell-accuracy")
        .setting(AppSettings::ArgRequiredElseHelp)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Accuracy testing for lexispell.")
        .arg(
            Arg::with_name("config")
                .short("c")
                .takes_value(true)
                .help("Provide JSON config file to override test defaults"),
        )
        .arg(
            Arg::with_name("words")
                .value_name("WORDS")
                .help(
                    "The 'input -> expected [-> previous]' list in tab-delimited value file (TSV)",
                ),
        )
        .arg(
            Arg::with_name("vocabulary")
                .value_name("VOCABULARY")
                .help("Use the given vocabulary file"),
        )
        .arg(
            Arg::with_name("corpus")
                .long("corpus")
                .takes_value(true)
                .help("Train the context model on the given corpus text"),
        )
        .arg(
            Arg::with_name("json-output")
                .short("o")
                .value_name("JSON-OUTPUT")
                .help("The file path for the JSON report output"),
        )
        .arg(
            Arg::with_name("tsv-output")
                .short("t")
                .value_name("TSV-OUTPUT")
                .help("The file path for the TSV line append"),
        )
        .arg(
            Arg::with_name("max-words")
                .short("w")
                .takes_value(true)
                .help("Truncate typos list to max number of words specified"),
        )
        .get_matches();

    let cfg: SpellerConfig = match matches.value_of("config") {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            serde_json::from_reader(file)?
        }
        None => CFG.clone(),
    };

    let speller = match matches.value_of("vocabulary") {
        Some(path) => load_speller(path, matches.value_of("corpus"), cfg.clone())?,
        None => {
            eprintln!("No vocabulary found for given path; aborting.");
            std::process::exit(1);
        }
    };

    let words = match matches.value_of("words") {
        Some(path) => load_words(
            Path::new(path),
            matches
                .value_of("max-words")
                .and_then(|x| x.parse::<usize>().ok()),
        )?,
        None => {
            eprintln!("No word list for given path; aborting.");
            std::process::exit(1);
        }
    };

    let pb = ProgressBar::new(words.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{percent}%] {wide_bar} {elapsed_precise}"),
    );

    let use_context = speller.model().is_trained();
    if !use_context {
        log::info!("no corpus given; previous words are ignored");
    }

    let start_time = Instant::now();
    let results = words
        .par_iter()
        .progress_with(pb)
        .map(|case| {
            let previous = case.previous.as_deref().filter(|_| use_context);

            let now = Instant::now();
            let suggestions = speller
                .clone()
                .suggest_with_config(&case.input, previous, &cfg)
                .unwrap_or_else(|e| {
                    log::warn!("{}: {}", case.input, e);
                    vec![]
                });
            let time = Time::from(now.elapsed());

            let position = suggestions.iter().position(|x| x.value == case.expected);

            let distance = damerau_levenshtein(&case.input, &case.expected);
            AccuracyResult {
                input: &case.input,
                expected: &case.expected,
                previous,
                distance,
                time,
                suggestions,
                position,
            }
        })
        .collect::<Vec<_>>();

    let total_time = Time::from(start_time.elapsed());
    let start_timestamp = Time::from(
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default(),
    );

    let summary = Summary::new(&results);
    println!("{}", summary);

    if let Some(path) = matches.value_of("json-output") {
        let output = std::fs::File::create(path)?;
        let report = Report {
            vocabulary_words: speller.vocabulary().len(),
            trained_tokens: speller.model().total_unigrams(),
            config: &cfg,
            summary,
            results,
            start_timestamp,
            total_time,
        };
        println!("Writing JSON report…");
        serde_json::to_writer_pretty(output, &report)?;
    } else if let Some(path) = matches.value_of("tsv-output") {
        let mut output = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let md = output.metadata()?;
        if md.len() == 0 {
            output.write_all(b"date\ttotal\ttop1\ttop5\tany\tno suggs\twrong suggs\tavg time\n")?;
        }
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            Local::now().to_rfc3339(),
            summary.total_words,
            summary.first_position,
            summary.top_five,
            summary.any_position,
            summary.no_suggestions,
            summary.only_wrong,
            summary.average_time
        )?;
    };

    println!("Done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result<'a>(position: Option<usize>, suggestions: usize, millis: u64) -> AccuracyResult<'a> {
        AccuracyResult {
            input: "teh",
            expected: "the",
            previous: None,
            distance: 1,
            suggestions: (0..suggestions)
                .map(|_| Suggestion::new("the".into(), 2, 0.0))
                .collect(),
            position,
            time: Time::from(Duration::from_millis(millis)),
        }
    }

    #[test]
    fn summary_counts() {
        let results = vec![
            result(Some(0), 3, 4),
            result(Some(4), 5, 2),
            result(None, 0, 8),
            result(None, 2, 6),
        ];
        let summary = Summary::new(&results);

        assert_eq!(summary.total_words, 4);
        assert_eq!(summary.first_position, 1);
        assert_eq!(summary.top_five, 2);
        assert_eq!(summary.any_position, 2);
        assert_eq!(summary.no_suggestions, 1);
        assert_eq!(summary.only_wrong, 1);
        assert_eq!(summary.fastest_lookup.to_string(), "2ms");
        assert_eq!(summary.slowest_lookup.to_string(), "8ms");
        assert_eq!(summary.average_time.to_string(), "5ms");
    }

    #[test]
    fn empty_summary() {
        let summary = Summary::new(&[]);
        assert_eq!(summary.total_words, 0);
        assert_eq!(summary.average_time, Time::default());
    }

    #[test]
    fn word_list_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typos.tsv");
        let typos = "# input\texpected\tprevious\nteh\tthe\nlazzy\tlazy\tthe\ndgo\n";
        std::fs::write(&path, typos).unwrap();

        let cases = load_words(&path, None).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].previous, None);
        assert_eq!(cases[1].previous.as_deref(), Some("the"));

        assert_eq!(load_words(&path, Some(1)).unwrap().len(), 1);
    }
}
