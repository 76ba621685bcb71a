mod cli;
mod clipboard;
mod config;
mod page;
mod transcript;
mod utils;
mod wiki;
mod wordfreq;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use clipboard::SystemClipboard;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use page::{HtmlPage, Selector};
use tracing_subscriber::{EnvFilter, fmt};
use transcript::{CaptionSource, combine, copy_captions};
use wiki::WikipediaClient;
use wordfreq::{CorpusOptions, collect_corpus, write_frequency_csv};

fn main() -> Result<()> {
    // Logs go to stderr so `show` output stays pipeable.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Copy {
            file,
            container_class,
            segment_class,
        }) => {
            let selector = resolve_selector(&config, container_class, segment_class);
            handle_copy(file, selector)?;
        }
        Some(Commands::Show {
            file,
            container_class,
            segment_class,
        }) => {
            let selector = resolve_selector(&config, container_class, segment_class);
            handle_show(file, selector)?;
        }
        Some(Commands::Wordfreq {
            output,
            lang,
            max_articles,
            target_words,
            top,
        }) => {
            handle_wordfreq(output, &lang, max_articles, target_words, top)?;
        }
        None => {
            // No command - copy from stdin
            handle_copy(None, config.selector())?;
        }
    }

    Ok(())
}

fn resolve_selector(
    config: &Config,
    container_class: Option<String>,
    segment_class: Option<String>,
) -> Selector {
    Selector::new(
        container_class.unwrap_or_else(|| config.container_class.clone()),
        segment_class.unwrap_or_else(|| config.segment_class.clone()),
    )
}

fn load_page(file: Option<PathBuf>, selector: Selector) -> Result<HtmlPage> {
    match file {
        Some(path) => HtmlPage::from_path(&path, selector),
        None => HtmlPage::from_reader(std::io::stdin().lock(), selector),
    }
}

fn handle_copy(file: Option<PathBuf>, selector: Selector) -> Result<()> {
    let page = load_page(file, selector)?;
    let mut clipboard = SystemClipboard::new();

    let outcome = copy_captions(&page, &mut clipboard)?;

    println!(
        "✓ Copied {} caption segment(s) to the clipboard",
        outcome.segment_count
    );

    Ok(())
}

fn handle_show(file: Option<PathBuf>, selector: Selector) -> Result<()> {
    let page = load_page(file, selector)?;
    let segments = page.segments()?;

    println!("{}", combine(&segments));

    Ok(())
}

fn handle_wordfreq(
    output: PathBuf,
    lang: &str,
    max_articles: usize,
    target_words: Option<u64>,
    top: usize,
) -> Result<()> {
    let mut client = WikipediaClient::new(lang)?;
    let options = CorpusOptions {
        max_articles,
        target_words,
    };

    let progress = match target_words {
        Some(target) => ProgressBar::new(target),
        None => ProgressBar::new(max_articles as u64),
    };
    let style = ProgressStyle::default_bar()
        .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress.set_message("collecting articles");

    let corpus = collect_corpus(&mut client, &options, Some(&progress))?;
    progress.finish_and_clear();

    if corpus.is_empty() {
        println!("No words collected.");
        return Ok(());
    }

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    write_frequency_csv(file, &corpus, top)?;

    println!(
        "✓ Collected {} words from {} articles",
        corpus.total_words(),
        corpus.article_count()
    );
    println!(
        "✓ Wrote top {} words to {}",
        top.min(corpus.distinct_words()),
        output.display()
    );

    Ok(())
}
