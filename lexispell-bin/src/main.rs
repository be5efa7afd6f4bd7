use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use gumdrop::Options;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use lexispell::corpus::{clean, CorpusConfig, CorpusStats};
use lexispell::speller::suggestion::Suggestion;
use lexispell::speller::watch_list::{ContextWarning, WatchList};
use lexispell::speller::{DistanceThreshold, Speller, SpellerConfig, VocabularySpeller};
use lexispell::tokenizer::{Document, Tokenize};
use lexispell::vocabulary::{BuildReport, DictionarySource, Vocabulary, VocabularyConfig};
use lexispell::LanguageModel;

trait OutputWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool);
    fn write_suggestions(&mut self, word: &str, suggestions: &[Suggestion]);
    fn write_warning(&mut self, warning: &ContextWarning);
    fn finish(&mut self) -> anyhow::Result<()>;
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        println!(
            "Input: {}\t\t[{}]",
            &word,
            if is_correct { "CORRECT" } else { "INCORRECT" }
        );
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        for sugg in suggestions {
            println!("{}\t\t{}\t{:.6}", sugg.value(), sugg.distance(), sugg.probability());
        }
        println!();
    }

    fn write_warning(&mut self, warning: &ContextWarning) {
        let alternatives = warning
            .alternatives
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>();
        println!(
            "Note: '{}' at {} is easily confused with {}",
            warning.word,
            warning.index,
            alternatives.join(", ")
        );
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SuggestionRequest {
    word: String,
    is_correct: bool,
    suggestions: Vec<Suggestion>,
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<SuggestionRequest>,
    warnings: Vec<ContextWarning>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter {
            results: vec![],
            warnings: vec![],
        }
    }
}

impl OutputWriter for JsonWriter {
    fn write_correction(&mut self, word: &str, is_correct: bool) {
        self.results.push(SuggestionRequest {
            word: word.to_owned(),
            is_correct,
            suggestions: vec![],
        });
    }

    fn write_suggestions(&mut self, _word: &str, suggestions: &[Suggestion]) {
        if let Some(last) = self.results.last_mut() {
            last.suggestions = suggestions.to_vec();
        }
    }

    fn write_warning(&mut self, warning: &ContextWarning) {
        self.warnings.push(warning.clone());
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

fn writer(use_json: bool) -> Box<dyn OutputWriter> {
    if use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "build a vocabulary file from dictionary sources and a corpus")]
    Build(BuildArgs),

    #[options(help = "check text against a vocabulary")]
    Check(CheckArgs),

    #[options(help = "get suggestions for provided words")]
    Suggest(SuggestArgs),

    #[options(help = "print input in word-separated tokenized form")]
    Tokenize(TokenizeArgs),

    #[options(help = "list vocabulary words containing a term")]
    Explore(ExploreArgs),

    #[options(help = "generate text from the corpus bigram model")]
    Generate(GenerateArgs),
}

#[derive(Debug, Options)]
struct BuildArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "directory of .csv dictionary sources", required)]
    dictionaries: PathBuf,

    #[options(help = "corpus text file")]
    corpus: Option<PathBuf>,

    #[options(help = "vocabulary file to write", required)]
    output: PathBuf,

    #[options(no_short, help = "file to write the cleaned corpus to")]
    cleaned_corpus: Option<PathBuf>,

    #[options(
        no_short,
        meta = "NAME",
        help = "parse this source without quoting (repeatable)"
    )]
    lenient: Vec<String>,

    #[options(no_short, help = "corpus tokens must be longer than this")]
    min_length: Option<usize>,

    #[options(no_short, help = "corpus tokens must occur more often than this")]
    min_frequency: Option<usize>,

    #[options(no_short, long = "json", help = "print the build report as JSON")]
    use_json: bool,
}

#[derive(Debug, Options)]
struct CheckArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "vocabulary file to check against", required)]
    vocabulary: PathBuf,

    #[options(no_short, help = "corpus text file for context ranking")]
    corpus: Option<PathBuf>,

    #[options(help = "show suggestions for misspelled words")]
    suggest: bool,

    #[options(short = "S", help = "always show suggestions even if word is correct")]
    always_suggest: bool,

    #[options(help = "JSON file with suggestion settings")]
    config: Option<PathBuf>,

    #[options(no_short, help = "maximum edit distance for suggestions")]
    max_distance: Option<usize>,

    #[options(no_short, help = "only suggest words at exactly the maximum edit distance")]
    exact: bool,

    #[options(help = "maximum number of results")]
    nbest: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "text to be checked")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct SuggestArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "vocabulary file to suggest from", required)]
    vocabulary: PathBuf,

    #[options(no_short, help = "corpus text file for context ranking")]
    corpus: Option<PathBuf>,

    #[options(help = "word preceding the provided words")]
    previous: Option<String>,

    #[options(short = "S", help = "always show suggestions even if word is correct")]
    always_suggest: bool,

    #[options(help = "JSON file with suggestion settings")]
    config: Option<PathBuf>,

    #[options(no_short, help = "maximum edit distance for suggestions")]
    max_distance: Option<usize>,

    #[options(no_short, help = "only suggest words at exactly the maximum edit distance")]
    exact: bool,

    #[options(help = "maximum number of results")]
    nbest: Option<usize>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "words to be processed")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct TokenizeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(short = "w", long = "words", help = "show words only")]
    is_words_only: bool,

    #[options(free, help = "text to be tokenized")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct ExploreArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "vocabulary file to explore", required)]
    vocabulary: PathBuf,

    #[options(free, help = "term to search for")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct GenerateArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "corpus text file to train on", required)]
    corpus: PathBuf,

    #[options(help = "first word of the generated text", required)]
    seed: String,

    #[options(short = "n", help = "number of words to generate (default 20)")]
    num_words: Option<usize>,

    #[options(no_short, help = "seed for the random number generator")]
    rng_seed: Option<u64>,
}

fn read_stdin() -> anyhow::Result<String> {
    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading stdin")?;
    Ok(buffer)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn load_vocabulary(path: &Path) -> anyhow::Result<Vocabulary> {
    Vocabulary::load(path).with_context(|| format!("loading vocabulary {}", path.display()))
}

/// An untrained model when no corpus is given.
fn load_model(corpus: Option<&Path>) -> anyhow::Result<LanguageModel> {
    match corpus {
        Some(path) => Ok(LanguageModel::train(&clean(&read_text(path)?))),
        None => Ok(LanguageModel::default()),
    }
}

fn speller_config(
    path: Option<&Path>,
    max_distance: Option<usize>,
    exact: bool,
    nbest: Option<usize>,
) -> anyhow::Result<SpellerConfig> {
    let mut config = match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SpellerConfig::default(),
    };

    let distance = max_distance.unwrap_or_else(|| config.threshold.max_distance());
    if exact {
        config.threshold = DistanceThreshold::Exactly(distance);
    } else if max_distance.is_some() {
        config.threshold = DistanceThreshold::AtMost(distance);
    }

    if let Some(v) = nbest {
        config.n_best = v;
    }

    Ok(config)
}

fn build(args: BuildArgs) -> anyhow::Result<()> {
    let vocabulary_config = VocabularyConfig {
        lenient_sources: args.lenient,
        ..VocabularyConfig::default()
    };
    let defaults = CorpusConfig::default();
    let corpus_config = CorpusConfig {
        min_length: args.min_length.unwrap_or(defaults.min_length),
        min_frequency: args.min_frequency.unwrap_or(defaults.min_frequency),
    };

    let sources = DictionarySource::from_dir(&args.dictionaries, &vocabulary_config)?;
    log::info!("{} sources in {}", sources.len(), args.dictionaries.display());
    let corpus_text = match &args.corpus {
        Some(path) => read_text(path)?,
        None => String::new(),
    };

    let output =
        lexispell::build_dictionary(sources, &corpus_text, vocabulary_config, corpus_config)?;

    output
        .vocabulary
        .save(&args.output)
        .with_context(|| format!("writing vocabulary {}", args.output.display()))?;

    if let Some(path) = &args.cleaned_corpus {
        std::fs::write(path, &output.corpus.cleaned)
            .with_context(|| format!("writing cleaned corpus {}", path.display()))?;
    }

    print_build_summary(&output.report, &output.corpus.stats, args.use_json)
}

#[derive(Serialize)]
struct BuildSummary<'a> {
    report: &'a BuildReport,
    corpus: &'a CorpusStats,
}

fn print_build_summary(
    report: &BuildReport,
    corpus: &CorpusStats,
    use_json: bool,
) -> anyhow::Result<()> {
    if use_json {
        println!("{}", serde_json::to_string_pretty(&BuildSummary { report, corpus })?);
        return Ok(());
    }

    println!("Raw corpus characters:     {}", corpus.raw_chars);
    println!("Base dictionary words:     {}", report.base_words);
    println!("Final vocabulary words:    {}", report.vocabulary_words);
    println!("Cleaned corpus characters: {}", corpus.cleaned_chars);
    println!("Unique corpus tokens:      {}", corpus.unique_tokens);
    println!("Filtered corpus tokens:    {}", corpus.filtered_tokens);
    println!(
        "Skipped sources:           {} of {}",
        report.skipped_sources.len(),
        report.sources
    );
    for name in &report.skipped_sources {
        println!("  {}", name);
    }
    if report.skipped_rows > 0 {
        println!("Skipped rows:              {}", report.skipped_rows);
    }

    Ok(())
}

fn check(args: CheckArgs) -> anyhow::Result<()> {
    let config = speller_config(args.config.as_deref(), args.max_distance, args.exact, args.nbest)?;
    let vocabulary = load_vocabulary(&args.vocabulary)?;
    let model = load_model(args.corpus.as_deref())?;
    let speller = VocabularySpeller::with_config(Arc::new(vocabulary), Arc::new(model), config);

    let text = if args.inputs.is_empty() {
        read_stdin()?
    } else {
        args.inputs.join(" ")
    };

    let mut writer = writer(args.use_json);
    let document = Document::new(&text);

    for token in &document {
        let is_correct = speller.vocabulary().contains(&token.value);
        writer.write_correction(&token.surface, is_correct);

        if args.suggest && (args.always_suggest || !is_correct) {
            // Without a corpus there is nothing to rank by.
            let previous = document
                .previous_word(token.position)
                .filter(|_| speller.model().is_trained());
            let suggestions = speller.clone().suggest(&token.value, previous)?;
            writer.write_suggestions(&token.surface, &suggestions);
        }
    }

    for warning in WatchList::default().scan(&text) {
        writer.write_warning(&warning);
    }

    writer.finish()
}

fn suggest(args: SuggestArgs) -> anyhow::Result<()> {
    let config = speller_config(args.config.as_deref(), args.max_distance, args.exact, args.nbest)?;
    let vocabulary = load_vocabulary(&args.vocabulary)?;
    let model = load_model(args.corpus.as_deref())?;
    let speller = VocabularySpeller::with_config(Arc::new(vocabulary), Arc::new(model), config);

    let words: Vec<String> = if args.inputs.is_empty() {
        read_stdin()?
            .trim()
            .split('\n')
            .map(|x| x.trim().to_string())
            .filter(|x| !x.is_empty())
            .collect()
    } else {
        args.inputs
    };

    let mut writer = writer(args.use_json);
    let previous = args.previous.as_deref();

    for word in words {
        let is_correct = speller.clone().is_correct(&word);
        writer.write_correction(&word, is_correct);

        if args.always_suggest || !is_correct {
            let suggestions = speller.clone().suggest(&word, previous)?;
            writer.write_suggestions(&word, &suggestions);
        }
    }

    writer.finish()
}

fn tokenize(args: TokenizeArgs) -> anyhow::Result<()> {
    let inputs: String = if args.inputs.is_empty() {
        read_stdin()?
    } else {
        args.inputs.join(" ")
    };

    if args.is_words_only {
        for (index, token) in inputs.word_indices() {
            println!("{:>4}: \"{}\"", index, token);
        }
    } else {
        for (index, token) in inputs.word_runs() {
            println!("{:>4}: \"{}\"", index, token);
        }
    }

    Ok(())
}

fn explore(args: ExploreArgs) -> anyhow::Result<()> {
    let vocabulary = load_vocabulary(&args.vocabulary)?;
    let term = args.inputs.join(" ");

    let mut found = 0;
    for word in vocabulary.search(&term) {
        println!("{}", word);
        found += 1;
    }
    eprintln!("{} of {} words", found, vocabulary.len());

    Ok(())
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let model = load_model(Some(&args.corpus))?;
    if !model.is_trained() {
        anyhow::bail!("corpus {} contains no words", args.corpus.display());
    }

    let mut rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let words = model.generate(&args.seed, args.num_words.unwrap_or(20), &mut rng);
    println!(
        "{}",
        words.iter().map(|w| w.as_str()).collect::<Vec<_>>().join(" ")
    );

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Build(args)) => build(args),
        Some(Command::Check(args)) => check(args),
        Some(Command::Suggest(args)) => suggest(args),
        Some(Command::Tokenize(args)) => tokenize(args),
        Some(Command::Explore(args)) => explore(args),
        Some(Command::Generate(args)) => generate(args),
    }
}
