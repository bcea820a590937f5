//! Email classification pipeline.
//!
//! Every request flows through:
//! 1. `extract::extract_text()` — upload bytes to text (`.txt` / `.pdf`)
//! 2. `Normalizer::normalize()` — lowercase, strip punctuation, drop stopwords, stem
//! 3. `Classifier::classify()` — keyword stems against the normalized text
//! 4. `ReplyGenerator::generate()` — one LLM call, failures rendered as text
//!
//! All linguistic state is built once at startup and never mutated.

pub mod classify;
pub mod extract;
pub mod normalize;
pub mod processor;
pub mod stopwords;
pub mod types;

pub use classify::{Category, Classifier, KeywordSet, MatchMode};
pub use normalize::Normalizer;
pub use processor::{EmailProcessor, SharedProcessor};
pub use types::{ClassificationResult, InboundEmail};
