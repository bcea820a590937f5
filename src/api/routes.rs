//! HTTP surface: `POST /classificar-email` plus a health check.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    response::IntoResponse,
    routing::{get, post},
};
use bytes::Bytes;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::pipeline::{ClassificationResult, InboundEmail, SharedProcessor};

/// Largest accepted request body. Uploads are read fully into memory.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: SharedProcessor,
}

/// Build the Axum router. CORS is wide open: any origin, method and header.
pub fn classify_routes(processor: SharedProcessor) -> Router {
    let state = AppState { processor };

    Router::new()
        .route("/classificar-email", post(classify_email))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::very_permissive())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "email-classifier"
    }))
}

// ── Classification ──────────────────────────────────────────────────────

async fn classify_email(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let span = info_span!("classify", request_id = %Uuid::new_v4());

    async move {
        let email = read_form(multipart).await.inspect_err(|e| {
            warn!(error = %e, "Rejected classification request");
        })?;

        let result = state.processor.process(email).await.map_err(|e| {
            error!(error = %e, "Classification failed");
            ApiError::from(e)
        })?;

        Ok(Json(result))
    }
    .instrument(span)
    .await
}

/// Pull the `content` and `file` fields out of the form. The file wins when
/// both are present; a body that is not multipart at all counts as empty.
async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<InboundEmail, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(%rejection, "Request body is not multipart form data");
            return Err(ApiError::InputMissing);
        }
    };

    let mut content: Option<String> = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(internal)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("content") => {
                content = Some(field.text().await.map_err(internal)?);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(internal)?;
                // Browsers send an empty, unnamed part when no file was picked.
                if !(file_name.is_empty() && data.is_empty()) {
                    file = Some((file_name, data));
                }
            }
            other => {
                debug!(field = ?other, "Ignoring unknown form field");
            }
        }
    }

    if let Some((name, data)) = file {
        return Ok(InboundEmail::File { name, data });
    }

    match content {
        Some(text) if !text.is_empty() => Ok(InboundEmail::Text(text)),
        _ => Err(ApiError::InputMissing),
    }
}

fn internal(err: impl std::fmt::Display) -> ApiError {
    ApiError::Internal(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::error::LlmError;
    use crate::llm::{CompletionRequest, CompletionResponse, LlmProvider, ReplyConfig, ReplyGenerator};
    use crate::pipeline::{EmailProcessor, MatchMode};

    const BOUNDARY: &str = "XBOUNDARYX";

    struct CannedLlm;

    #[async_trait]
    impl LlmProvider for CannedLlm {
        fn model_name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                content: Some("Resposta sugerida.".into()),
            })
        }
    }

    fn app() -> Router {
        let reply = ReplyGenerator::new(Arc::new(CannedLlm), ReplyConfig::default());
        classify_routes(Arc::new(EmailProcessor::new(reply, MatchMode::Substring)))
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_form(parts: &[Part<'_>]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/classificar-email")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn text_content_is_classified() {
        let (status, json) = post_form(&[Part::Text("content", "Qual o prazo do projeto?")]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["categoria"], "Produtivo");
        assert_eq!(json["resposta_sugerida"], "Resposta sugerida.");
        assert_eq!(json["texto_original"], "Qual o prazo do projeto?");
        assert!(json["texto_processado"].is_string());
    }

    #[tokio::test]
    async fn greeting_is_unproductive() {
        let (status, json) = post_form(&[Part::Text("content", "Bom dia, tudo bem?")]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["categoria"], "Improdutivo");
    }

    #[tokio::test]
    async fn missing_input_is_bad_request() {
        let (status, json) = post_form(&[Part::Text("subject", "Oi")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"erro": "Nenhum conteúdo ou arquivo enviado."}));
    }

    #[tokio::test]
    async fn empty_content_is_bad_request() {
        let (status, _) = post_form(&[Part::Text("content", "")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unnamed_empty_file_part_is_ignored() {
        let (status, json) = post_form(&[
            Part::Text("content", "Bom dia"),
            Part::File("file", "", b""),
        ])
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["texto_original"], "Bom dia");
    }

    #[tokio::test]
    async fn file_takes_precedence_over_content() {
        let (status, json) = post_form(&[
            Part::Text("content", "Bom dia, tudo bem?"),
            Part::File("file", "email.txt", "Houve um erro no deploy".as_bytes()),
        ])
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["texto_original"], "Houve um erro no deploy");
        assert_eq!(json["categoria"], "Produtivo");
    }

    #[tokio::test]
    async fn pdf_upload_is_classified() {
        let pdf = crate::pipeline::extract::fixtures::sample_pdf(&["Prazo da entrega do projeto"]);
        let (status, json) = post_form(&[Part::File("file", "email.pdf", &pdf)]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["categoria"], "Produtivo");
        assert!(json["texto_original"].as_str().unwrap().contains("Prazo"));
    }

    #[tokio::test]
    async fn unsupported_file_is_server_error() {
        let (status, json) = post_form(&[Part::File("file", "report.docx", b"PK\x03\x04")]).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["erro"].as_str().unwrap().contains("não suportado"));
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/classificar-email")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/classificar-email")
            .header(header::ORIGIN, "https://mail.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://mail.example.com"
        );
    }
}
