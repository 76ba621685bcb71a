use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

// Letters and apostrophes only; digits and punctuation split words.
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b[a-z']+\b").unwrap());

/// Extracts shorter than this are usually disambiguation pages or stubs.
pub const MIN_ARTICLE_WORDS: usize = 50;

const MAX_CONSECUTIVE_FAILURES: u32 = 10;
const MAX_CONSECUTIVE_SKIPS: u32 = 50;

/// Provider of article plaintexts for corpus building. The real
/// implementation talks to the MediaWiki API; tests inject a fake.
pub trait ArticleSource {
    fn fetch_article(&mut self) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// Stop after this many accepted articles.
    pub max_articles: usize,
    /// Stop once this many words have been collected, if set.
    pub target_words: Option<u64>,
}

/// Lowercase word tokens of a text, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Word counts accumulated over a set of articles.
#[derive(Debug, Default)]
pub struct Corpus {
    counts: HashMap<String, u64>,
    total_words: u64,
    article_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    pub fn article_count(&self) -> usize {
        self.article_count
    }

    pub fn distinct_words(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_words == 0
    }

    pub fn add_article(&mut self, tokens: &[String]) {
        for token in tokens {
            *self.counts.entry(token.clone()).or_insert(0) += 1;
        }
        self.total_words += tokens.len() as u64;
        self.article_count += 1;
    }

    /// Top `n` words by count. Ties break alphabetically so the ranking is
    /// stable across runs.
    pub fn top_words(&self, n: usize) -> Vec<WordCount> {
        let mut rows: Vec<WordCount> = self
            .counts
            .iter()
            .map(|(word, count)| WordCount {
                word: word.clone(),
                count: *count,
            })
            .collect();
        rows.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        rows.truncate(n);
        rows
    }
}

/// Pull articles from `source` until an article or word budget is reached.
///
/// Per-article fetch errors are tolerated and logged; only a run of
/// consecutive failures aborts the collection. Empty and too-short extracts
/// are skipped, and a long run of those ends the collection early with
/// whatever was gathered so far.
pub fn collect_corpus(
    source: &mut dyn ArticleSource,
    options: &CorpusOptions,
    progress: Option<&ProgressBar>,
) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    let mut failures = 0u32;
    let mut skips = 0u32;

    while corpus.article_count() < options.max_articles {
        if let Some(target) = options.target_words {
            if corpus.total_words() >= target {
                break;
            }
        }

        let text = match source.fetch_article() {
            Ok(text) => {
                failures = 0;
                text
            }
            Err(err) => {
                failures += 1;
                warn!(%err, failures, "failed to fetch article");
                if failures >= MAX_CONSECUTIVE_FAILURES {
                    return Err(err.context("Giving up after repeated fetch failures"));
                }
                continue;
            }
        };

        let tokens = tokenize(&text);
        if tokens.len() < MIN_ARTICLE_WORDS {
            debug!(token_count = tokens.len(), "skipping short extract");
            skips += 1;
            if skips >= MAX_CONSECUTIVE_SKIPS {
                warn!("too many unusable extracts in a row; stopping early");
                break;
            }
            continue;
        }
        skips = 0;

        corpus.add_article(&tokens);

        if let Some(bar) = progress {
            match options.target_words {
                Some(_) => bar.set_position(corpus.total_words()),
                None => bar.set_position(corpus.article_count() as u64),
            }
        }
    }

    Ok(corpus)
}

/// Write the top `top_n` words as CSV: rank, word, count, and frequency
/// normalized per million corpus words.
pub fn write_frequency_csv(writer: impl Write, corpus: &Corpus, top_n: usize) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["rank", "word", "count", "freq_per_million"])
        .context("Failed to write CSV header")?;

    let per_million = 1_000_000.0 / corpus.total_words() as f64;
    for (idx, row) in corpus.top_words(top_n).iter().enumerate() {
        let freq = round6(row.count as f64 * per_million);
        csv_writer
            .write_record([
                (idx + 1).to_string(),
                row.word.clone(),
                row.count.to_string(),
                freq.to_string(),
            ])
            .context("Failed to write CSV row")?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
