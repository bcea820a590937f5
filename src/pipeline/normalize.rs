//! Portuguese text normalization.
//!
//! Order matters and is fixed:
//! 1. lowercase
//! 2. strip ASCII punctuation
//! 3. split on whitespace
//! 4. drop stopwords
//! 5. stem, repeating until the stem is stable; a stem that is itself a
//!    stopword is dropped
//! 6. rejoin with single spaces
//!
//! The output is a fixed point: normalizing already-normalized text returns
//! it unchanged.

use std::collections::HashSet;
use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};

use super::stopwords::STOPWORDS_PT;

/// Deterministic text normalizer holding the stopword set and stemmer.
///
/// Built once at startup and shared read-only across requests.
pub struct Normalizer {
    stopwords: HashSet<&'static str>,
    stemmer: Stemmer,
}

impl Normalizer {
    /// Portuguese normalizer with the standard stopword list.
    pub fn portuguese() -> Self {
        Self {
            stopwords: STOPWORDS_PT.iter().copied().collect(),
            stemmer: Stemmer::create(Algorithm::Portuguese),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Normalize `text` into a space-separated sequence of stems.
    pub fn normalize(&self, text: &str) -> String {
        let folded = strip_ascii_punctuation(&text.to_lowercase());

        folded
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .map(|token| self.stem(token))
            .filter(|stem| !self.is_stopword(stem))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Snowball is not idempotent (`precisamos` -> `precis` -> `prec`), so
    /// keep stemming until nothing changes. Every change shortens the word.
    fn stem(&self, token: &str) -> String {
        let mut current = token.to_string();
        for _ in 0..token.len() {
            let next = self.stemmer.stem(&current);
            if next.as_ref() == current.as_str() {
                break;
            }
            current = next.into_owned();
        }
        current
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::portuguese()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("stopwords", &self.stopwords.len())
            .field("stemmer", &"portuguese")
            .finish()
    }
}

/// Remove the conventional ASCII punctuation set. Unicode punctuation
/// (e.g. `«`, `—`) is left alone.
fn strip_ascii_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}
