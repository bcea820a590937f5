//! Keyword classifier over normalized text.
//!
//! Keywords are stemmed with the same [`Normalizer`] used for incoming
//! emails. Snowball does not always bring singular and plural to one stem
//! (`reunião` -> `reuniã`, `reuniões` -> `reuniõ`), so each keyword is listed
//! with its plural and every distinct stem is kept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::normalize::Normalizer;

/// Words whose presence marks an email as productive. The first form of each
/// entry is the keyword; the rest are inflections stemmed alongside it.
pub const PRODUCTIVE_KEYWORDS: &[&[&str]] = &[
    &["projeto", "projetos"],
    &["reunião", "reuniões"],
    &["tarefa", "tarefas"],
    &["prazo", "prazos"],
    &["entrega", "entregas"],
    &["solicitação", "solicitações"],
    &["ajuda", "ajudas"],
    &["erro", "erros"],
];

/// Email category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Produtivo")]
    Productive,
    #[serde(rename = "Improdutivo")]
    Unproductive,
}

impl Category {
    /// Label used on the wire and in the reply prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Productive => "Produtivo",
            Self::Unproductive => "Improdutivo",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How keyword stems are matched against the normalized text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// A stem matches anywhere in the text, including inside longer tokens.
    #[default]
    Substring,
    /// A stem must equal a whole token.
    Token,
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "token" => Ok(Self::Token),
            other => Err(format!("unknown match mode '{other}' (expected substring or token)")),
        }
    }
}

/// Stemmed productivity keywords, in declaration order.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    stems: Vec<String>,
}

impl KeywordSet {
    /// Stem every form of every keyword with `normalizer`. Forms that
    /// normalize to nothing (e.g. a stopword) are dropped, since an empty stem
    /// would match every text; duplicate stems are kept once.
    pub fn build(normalizer: &Normalizer, keywords: &[&[&str]]) -> Self {
        let mut stems: Vec<String> = Vec::with_capacity(keywords.len());
        for form in keywords.iter().flat_map(|forms| forms.iter()) {
            let stem = normalizer.normalize(form);
            if !stem.is_empty() && !stems.contains(&stem) {
                stems.push(stem);
            }
        }
        Self { stems }
    }

    /// The default productivity keyword set.
    pub fn productive(normalizer: &Normalizer) -> Self {
        Self::build(normalizer, PRODUCTIVE_KEYWORDS)
    }

    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }
}

/// Keyword-membership classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    keywords: KeywordSet,
    mode: MatchMode,
}

impl Classifier {
    pub fn new(keywords: KeywordSet, mode: MatchMode) -> Self {
        Self { keywords, mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// First keyword stem found in `normalized`, if any.
    pub fn matched_keyword(&self, normalized: &str) -> Option<&str> {
        self.keywords
            .stems()
            .iter()
            .find(|stem| match self.mode {
                MatchMode::Substring => normalized.contains(stem.as_str()),
                MatchMode::Token => normalized.split_whitespace().any(|t| t == stem.as_str()),
            })
            .map(String::as_str)
    }

    /// Classify already-normalized text.
    pub fn classify(&self, normalized: &str) -> Category {
        match self.matched_keyword(normalized) {
            Some(keyword) => {
                debug!(keyword = keyword, "Matched productivity keyword");
                Category::Productive
            }
            None => Category::Unproductive,
        }
    }
}
