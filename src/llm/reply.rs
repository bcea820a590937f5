//! Reply generator: asks the LLM for a suggested answer to a classified email.
//!
//! Generation never fails the caller. Provider errors are rendered into the
//! returned string so the classification response still goes out.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::error::LlmError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};
use crate::pipeline::classify::Category;

pub const SYSTEM_PROMPT: &str =
    "Você é um assistente que responde emails de forma produtiva e objetiva.";

/// Returned when the provider answered but produced no usable content.
pub const FALLBACK_REPLY: &str = "Não foi possível gerar uma resposta.";

/// Returned when the provider's body was not JSON.
pub const DECODE_FAILURE_REPLY: &str =
    "Erro ao decodificar resposta da API (resposta não é JSON).";

/// Sampling parameters for reply generation.
#[derive(Debug, Clone)]
pub struct ReplyConfig {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 300,
        }
    }
}

impl From<&LlmConfig> for ReplyConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Generates suggested replies through an [`LlmProvider`].
pub struct ReplyGenerator {
    llm: Arc<dyn LlmProvider>,
    config: ReplyConfig,
}

impl ReplyGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, config: ReplyConfig) -> Self {
        Self { llm, config }
    }

    /// Build the completion request for `text` classified as `category`.
    pub fn build_request(&self, text: &str, category: Category) -> CompletionRequest {
        let user_prompt = format!(
            "Email recebido:\n{text}\n\n\
             Classificação do email: {category}\n\n\
             Baseado na classificação, escreva uma resposta apropriada, clara e objetiva.",
            text = text,
            category = category.label(),
        );

        CompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
    }

    /// One provider call. `Ok(None)` means the provider answered without
    /// usable content.
    pub async fn try_generate(
        &self,
        text: &str,
        category: Category,
    ) -> Result<Option<String>, LlmError> {
        let request = self.build_request(text, category);
        let response = self.llm.complete(request).await?;
        Ok(response.content.filter(|c| !c.is_empty()))
    }

    /// Suggested reply for `text`, or a descriptive string when generation
    /// failed.
    pub async fn generate(&self, text: &str, category: Category) -> String {
        match self.try_generate(text, category).await {
            Ok(Some(reply)) => {
                info!(
                    model = self.llm.model_name(),
                    reply_len = reply.len(),
                    "Reply generated"
                );
                reply
            }
            Ok(None) => {
                warn!(model = self.llm.model_name(), "Provider returned no reply content");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                warn!(model = self.llm.model_name(), error = %e, "Reply generation failed");
                render_failure(&e)
            }
        }
    }
}

/// User-facing text for a provider failure.
pub fn render_failure(err: &LlmError) -> String {
    match err {
        LlmError::Http { detail, .. } => format!("Erro HTTP: {}", detail),
        LlmError::Transport(detail) => format!("Erro na requisição: {}", detail),
        LlmError::Decode(_) => DECODE_FAILURE_REPLY.to_string(),
    }
}
