use super::NameSource;
use crate::error::{NomenError, Result};
use crate::MAX_NAME_RETRIES;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::future::{ready, Future};

/// Adjective-noun names, each handed out at most once.
///
/// Picks are sampled with rejection: a pick that was already used is thrown
/// away and drawn again, up to [`MAX_NAME_RETRIES`] times. Close to full
/// occupancy the retries pile up and exhaustion becomes likely even though
/// a few names may still be free.
pub struct WordNames<R = StdRng> {
    adjectives: Vec<String>,
    nouns: Vec<String>,
    used: HashSet<String>,
    rng: R,
}

impl WordNames<StdRng> {
    pub fn new(adjectives: Vec<String>, nouns: Vec<String>) -> Result<Self> {
        Self::with_rng(adjectives, nouns, StdRng::from_entropy())
    }
}

impl<R: Rng> WordNames<R> {
    pub fn with_rng(adjectives: Vec<String>, nouns: Vec<String>, rng: R) -> Result<Self> {
        if adjectives.is_empty() {
            return Err(NomenError::EmptyWordList("adjectives"));
        }
        if nouns.is_empty() {
            return Err(NomenError::EmptyWordList("nouns"));
        }
        Ok(WordNames {
            adjectives,
            nouns,
            used: HashSet::new(),
            rng,
        })
    }

    pub fn capacity(&self) -> usize {
        self.adjectives.len().saturating_mul(self.nouns.len())
    }

    pub fn used(&self) -> usize {
        self.used.len()
    }

    pub fn allocate_unique(&mut self) -> Result<String> {
        for _ in 0..MAX_NAME_RETRIES {
            let adjective = &self.adjectives[self.rng.gen_range(0..self.adjectives.len())];
            let noun = &self.nouns[self.rng.gen_range(0..self.nouns.len())];
            let name = format!("{}-{}", adjective, noun);

            if !self.used.contains(&name) {
                self.used.insert(name.clone());
                return Ok(name);
            }
        }
        Err(NomenError::NameSpaceExhausted {
            attempts: MAX_NAME_RETRIES,
            used: self.used.len(),
            capacity: self.capacity(),
        })
    }
}

impl<R: Rng + Send> NameSource for WordNames<R> {
    fn next_name(&mut self) -> impl Future<Output = Result<String>> + Send {
        ready(self.allocate_unique())
    }

    fn capacity(&self) -> Option<usize> {
        Some(WordNames::capacity(self))
    }
}
