//! Generative model clients.
//!
//! [`ModelClient`] is the seam between the content generator and whatever
//! produces text. [`GeminiClient`] talks to the Generative Language API over
//! HTTPS; tests substitute in-process fakes.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{Credential, GenerationConfig};
use crate::error::{LingoError, Result};
use crate::generation::prompt::GenerationRequest;

/// Raw model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    /// Text body, expected to be JSON.
    pub body: String,
}

impl ModelResponse {
    /// Wrap a response body.
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

/// One request/response exchange with a generative model.
///
/// Implementations must not retry; retry policy belongs to the caller.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Client name for logging.
    fn name(&self) -> &str;

    /// Send the prompt with its output schema and return the body text.
    async fn complete(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<ModelResponse>;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<ModelResponse> {
        (**self).complete(request, credential).await
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    model: String,
    http_client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client for the configured endpoint and model.
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Full URL of the generate call.
    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// JSON body for a request.
    pub fn request_body(request: &GenerationRequest) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": request.output_schema,
            },
        })
    }

    /// Turn an HTTP status and the (possibly unreadable) body into model text.
    ///
    /// Non-success statuses become model errors carrying the API's own
    /// message when the body has one.
    pub fn response_text(status: StatusCode, body: Result<String>) -> Result<String> {
        if !status.is_success() {
            let message = body
                .ok()
                .and_then(|raw| serde_json::from_str::<ApiError>(&raw).ok())
                .map(|err| err.error.message)
                .unwrap_or_else(|| "request failed".to_string());
            return Err(LingoError::model(format!("status {}: {}", status, message)));
        }

        Self::extract_text(&body?)
    }

    /// Concatenate the text parts of the first candidate.
    ///
    /// A response without candidates yields an empty string, which the
    /// schema validator rejects as an empty body.
    pub fn extract_text(raw: &str) -> Result<String> {
        let response: ApiResponse = serde_json::from_str(raw)
            .map_err(|e| LingoError::model(format!("unreadable response envelope: {}", e)))?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        Ok(text)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        request: &GenerationRequest,
        credential: &Credential,
    ) -> Result<ModelResponse> {
        tracing::debug!(model = %self.model, url = %self.url(), "sending generateContent request");

        let response = self
            .http_client
            .post(self.url())
            .header("x-goog-api-key", credential.expose())
            .json(&Self::request_body(request))
            .send()
            .await
            .map_err(|e| LingoError::model(format!("network error: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LingoError::model(format!("failed to read body: {}", e)));

        Ok(ModelResponse::new(Self::response_text(status, body)?))
    }
}
