//! Email processor — runs one email through extract → normalize → classify →
//! reply.

use std::io::Cursor;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::llm::{ReplyConfig, ReplyGenerator, create_provider};
use crate::pipeline::classify::{Category, Classifier, KeywordSet, MatchMode};
use crate::pipeline::extract::extract_text;
use crate::pipeline::normalize::Normalizer;
use crate::pipeline::types::{ClassificationResult, InboundEmail};

/// Classification pipeline.
///
/// Holds only immutable state (stopwords, stemmer, keyword stems, HTTP
/// client), so a single instance is shared across all requests without
/// locking.
pub struct EmailProcessor {
    normalizer: Normalizer,
    classifier: Classifier,
    reply: ReplyGenerator,
}

impl EmailProcessor {
    /// Build a processor around the Portuguese normalizer and the default
    /// productivity keywords.
    pub fn new(reply: ReplyGenerator, mode: MatchMode) -> Self {
        let normalizer = Normalizer::portuguese();
        let keywords = KeywordSet::productive(&normalizer);
        debug!(stems = ?keywords.stems(), mode = ?mode, "Keyword set built");

        Self {
            classifier: Classifier::new(keywords, mode),
            normalizer,
            reply,
        }
    }

    /// Build a processor talking to the configured chat-completion API.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let llm = create_provider(&config.llm)?;
        let reply = ReplyGenerator::new(llm, ReplyConfig::from(&config.llm));
        Ok(Self::new(reply, config.match_mode))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Normalize and classify `text` without asking for a reply.
    pub fn classify_text(&self, text: &str) -> (String, Category) {
        let normalized = self.normalizer.normalize(text);
        let category = self.classifier.classify(&normalized);
        (normalized, category)
    }

    /// Resolve an inbound email to its text. Files are decoded on the
    /// blocking pool; PDF parsing is CPU-bound and a panicking parser must
    /// not take the request task down with it.
    pub async fn read_text(&self, email: InboundEmail) -> Result<String> {
        match email {
            InboundEmail::Text(text) => Ok(text),
            InboundEmail::File { name, data } => {
                let text = tokio::task::spawn_blocking(move || {
                    extract_text(&name, &mut Cursor::new(data))
                })
                .await
                .map_err(|e| Error::Task(format!("Falha ao processar o arquivo: {}", e)))??;
                Ok(text)
            }
        }
    }

    /// Run the full pipeline for one email.
    pub async fn process(&self, email: InboundEmail) -> Result<ClassificationResult> {
        let source = email.label();
        let original = self.read_text(email).await?;

        let (normalized, category) = self.classify_text(&original);
        info!(
            source = source,
            chars = original.chars().count(),
            tokens = normalized.split_whitespace().count(),
            category = %category,
            "Email classified"
        );

        let suggested_reply = self.reply.generate(&original, category).await;

        Ok(ClassificationResult {
            category,
            suggested_reply,
            original_text: original,
            normalized_text: Some(normalized),
        })
    }
}

/// Shared handle used by the HTTP layer.
pub type SharedProcessor = Arc<EmailProcessor>;
