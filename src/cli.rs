use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "subcopy")]
#[command(
    about = "Copy the captions rendered on a saved video player page to the clipboard",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract captions and copy the transcript to the clipboard (the default)
    Copy {
        /// Player page to read; stdin when omitted
        file: Option<PathBuf>,

        /// Class of the caption container element
        #[arg(long)]
        container_class: Option<String>,

        /// Class of the caption segment elements
        #[arg(long)]
        segment_class: Option<String>,
    },
    /// Print the transcript to stdout without touching the clipboard
    Show {
        /// Player page to read; stdin when omitted
        file: Option<PathBuf>,

        /// Class of the caption container element
        #[arg(long)]
        container_class: Option<String>,

        /// Class of the caption segment elements
        #[arg(long)]
        segment_class: Option<String>,
    },
    /// Build a word-frequency CSV from random Wikipedia articles
    Wordfreq {
        /// Output CSV path
        #[arg(short, long, default_value = "wordfreq.csv")]
        output: PathBuf,

        /// Wikipedia language edition to sample
        #[arg(long, default_value = "en")]
        lang: String,

        /// Maximum number of articles to fetch
        #[arg(long, default_value_t = 100)]
        max_articles: usize,

        /// Stop once this many words have been collected
        #[arg(long)]
        target_words: Option<u64>,

        /// Number of top-ranked words to write
        #[arg(long, default_value_t = 1000)]
        top: usize,
    },
}
