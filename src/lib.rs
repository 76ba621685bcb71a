pub mod cli;
pub mod clipboard;
pub mod config;
pub mod page;
pub mod transcript;
pub mod utils;
pub mod wiki;
pub mod wordfreq;
