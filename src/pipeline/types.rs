//! Shared types for the classification pipeline.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::classify::Category;

// ── Inbound email ───────────────────────────────────────────────────

/// Email as received by the HTTP layer.
#[derive(Debug, Clone)]
pub enum InboundEmail {
    /// Raw text pasted into the form.
    Text(String),
    /// Uploaded file; the name decides how it is decoded.
    File { name: String, data: Bytes },
}

impl InboundEmail {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::File { .. } => "file",
        }
    }
}

// ── Classification result ───────────────────────────────────────────

/// Response payload for one classified email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "categoria")]
    pub category: Category,
    #[serde(rename = "resposta_sugerida")]
    pub suggested_reply: String,
    #[serde(rename = "texto_original")]
    pub original_text: String,
    #[serde(rename = "texto_processado", skip_serializing_if = "Option::is_none")]
    pub normalized_text: Option<String>,
}
