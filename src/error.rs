//! Error types for the email classifier.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Configuration-related errors. Raised at startup only.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Text extraction errors.
///
/// The `Display` output is what callers see in the `erro` field, so the
/// messages stay in the service's user-facing language.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Formato de arquivo não suportado. Use .txt ou .pdf")]
    UnsupportedFormat,

    #[error("Conteúdo do arquivo não é UTF-8 válido: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Falha ao extrair texto do PDF: {0}")]
    Pdf(String),

    #[error("Falha ao ler o arquivo: {0}")]
    Io(#[from] std::io::Error),
}

/// Chat-completion provider errors.
///
/// These never reach the HTTP caller as a failure: the reply generator
/// renders them into the suggested-reply string.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Http {
                status: status.as_u16(),
                detail: err.to_string(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Nenhum conteúdo ou arquivo enviado.")]
    InputMissing,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InputMissing => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        // Extraction failures are reported as server errors, same as any other
        // pipeline failure.
        Self::Internal(err.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Extract(e) => e.into(),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "erro": self.to_string() }))).into_response()
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
