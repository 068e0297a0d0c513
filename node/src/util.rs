use anyhow::{Context, Result};
use nomenclator_lib::names::parse_words;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const ADJECTIVES: &str = include_str!("../data/adjectives.txt");
pub const NOUNS: &str = include_str!("../data/nouns.txt");

/// Send all log output to `path`, appending to what is already there.
pub fn init_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

/// Words from `path` when given, otherwise from the embedded list.
pub fn load_words(path: Option<&str>, embedded: &'static str) -> Result<Vec<String>> {
    let words = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read word list {}", path))?;
            parse_words(&text)
        }
        None => parse_words(embedded),
    };
    Ok(words)
}
