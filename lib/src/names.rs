//! Name allocation.
//!
//! Two variants with different guarantees live here:
//! [`WordNames`] draws adjective-noun pairs from local word lists and never
//! hands out the same name twice within its lifetime, while [`RemoteNames`]
//! asks an external service and passes along whatever it answers, repeats
//! included.

use crate::error::Result;
use std::future::Future;

mod remote;
mod word;

pub use remote::RemoteNames;
pub use word::WordNames;

pub trait NameSource: Send {
    /// Produce the next name for a pairing.
    fn next_name(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Number of distinct names this source can ever produce, when known.
    fn capacity(&self) -> Option<usize> {
        None
    }
}

/// Split a word list on whitespace, dropping bracketed annotations.
pub fn parse_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|word| !word.contains('[') && !word.contains(']'))
        .map(str::to_owned)
        .collect()
}
