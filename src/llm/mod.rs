//! LLM integration for reply suggestions.
//!
//! Talks to any OpenAI-compatible chat-completions endpoint over reqwest.
//! `ReplyGenerator` only sees the `LlmProvider` trait, so tests can swap in
//! stub providers.

pub mod client;
pub mod provider;
pub mod reply;

pub use client::ChatCompletionsClient;
pub use provider::*;
pub use reply::{ReplyConfig, ReplyGenerator};

use std::sync::Arc;

use tracing::info;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let client = ChatCompletionsClient::new(config)?;
    info!("Using chat completions at {} (model: {})", config.api_url, config.model);
    Ok(Arc::new(client))
}
