//! Text generation client.
//!
//! [`TextGenerator`] is the seam between the tool workflow and the remote
//! model. [`GeminiClient`] implements it against the Gemini
//! `generateContent` REST endpoint. One call is one HTTP request: there is
//! no retry, no timeout, and no caching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiKey;
use crate::error::GenerationError;

/// Default Gemini API host.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default model used for pitch kits.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Produces text for a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` to the model and return its text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if the request fails or the model returns
    /// no usable text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    api_key: ApiKey,
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client for `model` on the API host `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Network`] if the HTTP client cannot be built.
    pub fn new(api_key: ApiKey, api_base: &str, model: &str) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pitchdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            api_base.trim_end_matches('/'),
            model
        );

        Ok(Self {
            api_key,
            endpoint,
            model: model.to_owned(),
            client,
        })
    }

    /// The model this client talks to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "calling generateContent");

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        parse_response(status, &body)
    }
}

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Turn an HTTP status and body into the model's text or an error.
///
/// Non-success statuses surface the API's own `error.message` when the body
/// carries one. On success the text of every part of the first candidate is
/// joined in order.
fn parse_response(status: u16, body: &str) -> Result<String, GenerationError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiErrorEnvelope>(body)
            .map(|env| env.error.message)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    format!("generation API returned HTTP {status}")
                } else {
                    body.trim().to_owned()
                }
            });
        return Err(GenerationError::Api { status, message });
    }

    let parsed: GenerateResponse = serde_json::from_str(body)?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|fb| fb.block_reason) {
        return Err(GenerationError::Blocked { reason });
    }

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text)
}
