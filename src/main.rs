use std::{
    fs::File,
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use speechtag::{
    wrap_utterance, BaselineTagger, Dataset, Evaluation, HmmTagger, StringTable, Tagger, END,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TaggerKind {
    Baseline,
    Viterbi,
}

impl std::fmt::Display for TaggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaggerKind::Baseline => write!(f, "baseline"),
            TaggerKind::Viterbi => write!(f, "viterbi"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Argv {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Tagged training corpus, one `word=TAG` sentence per line.
    #[arg(long, default_value = "data/brown-training.txt")]
    training_file: PathBuf,
    /// Tagged corpus to evaluate against; without it, utterances read from
    /// stdin are tagged interactively.
    #[arg(long)]
    test_file: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = TaggerKind::Viterbi)]
    tagger: TaggerKind,
    /// Dump the trained probability model as JSON.
    #[arg(short, long)]
    model: Option<PathBuf>,
}

fn main() -> speechtag::Result<()> {
    let argv = Argv::parse();
    let mut logger = env_logger::builder();
    if argv.verbose > 0 {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();
    log::info!("argv: {:?}", argv);

    let mut train_set = Dataset::default();
    train_set.read_file(File::open(&argv.training_file)?)?;
    log::info!(
        "training corpus: {} sentences, {} tokens",
        train_set.len(),
        train_set.total_words()
    );

    match argv.tagger {
        TaggerKind::Baseline => {
            if argv.model.is_some() {
                log::warn!("--model only applies to the viterbi tagger");
            }
            let mut tagger = BaselineTagger::train(&train_set)?;
            run(&mut tagger, &argv)
        }
        TaggerKind::Viterbi => {
            let model = speechtag::train(&train_set)?;
            if let Some(path) = &argv.model {
                model.dump(path)?;
                log::info!("model dumped to {}", path.display());
            }
            let mut tagger = HmmTagger::new(&model);
            run(&mut tagger, &argv)
        }
    }
}

fn run<T: Tagger>(tagger: &mut T, argv: &Argv) -> speechtag::Result<()> {
    match &argv.test_file {
        Some(path) => evaluate(tagger, path),
        None => console(tagger),
    }
}

fn evaluate<T: Tagger>(tagger: &mut T, path: &Path) -> speechtag::Result<()> {
    let mut test_set = Dataset::default();
    test_set.read_file(File::open(path)?)?;
    let mut evaluation = Evaluation::default();
    for sent in &test_set.sents {
        let tagged = tagger.tag(&sent.words)?;
        let refs: Vec<&str> = sent
            .tags
            .iter()
            .map(|&t| test_set.tags.to_str(t).expect("tag id out of vocabulary"))
            .collect();
        let preds: Vec<&str> = tagged.iter().map(|(_, t)| t.as_str()).collect();
        evaluation.accumulate(&refs, &preds);
    }
    let est = evaluation.evaluate();
    println!("{evaluation}");
    log::info!("estimation: {:?}", est);
    Ok(())
}

fn console<T: Tagger>(tagger: &mut T) -> speechtag::Result<()> {
    println!("Say something:");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("stop listening") {
            println!("Stopping.");
            break;
        }
        let words = wrap_utterance(text);
        let tagged = tagger.tag(&words)?;
        let rendered: Vec<String> = tagged
            .iter()
            .skip(1)
            .filter(|(w, _)| w.as_str() != END)
            .map(|(w, t)| format!("{w}/{t}"))
            .collect();
        println!("{}", rendered.join(" "));
        println!("Say something again:");
    }
    Ok(())
}
