//! Text-generation clients used to narrate an analysis
use std::time::Duration;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::error::SummaryError;

const GEMINI_TEMPERATURE: f32 = 0.4;
const GEMINI_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Anything that turns a prompt into prose
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError>;
}

/// Builds the shared HTTP client with the caller-level timeout applied
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, SummaryError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SummaryError::Network(format!("Failed to build HTTP client: {}", e)))
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ProxyResponse {
    text: Option<String>,
}

/// Trusted intermediary that holds the model credentials server-side
///
/// Contract: `POST {"prompt": "..."}` answers `{"text": "..."}`.
pub struct ProxyClient {
    http: reqwest::Client,
    url: String,
}

impl ProxyClient {
    pub fn new(url: impl Into<String>, http: reqwest::Client) -> Self {
        Self { http, url: url.into() }
    }
}

#[async_trait]
impl TextGenerator for ProxyClient {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let response = self
            .http
            .post(&self.url)
            .json(&ProxyRequest { prompt })
            .send()
            .await?;

        let status = response.status();
        debug!("Summary proxy answered {}", status.as_u16());
        if !status.is_success() {
            return Err(error_status(response).await);
        }

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::InvalidResponse(e.to_string()))?;
        non_empty(body.text)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Direct call to the Gemini `generateContent` endpoint with an API key
///
/// Only used as a fallback when explicitly enabled; the key goes in a header, never the URL.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_url: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            api_url: api_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini-direct"
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummaryError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: GEMINI_TEMPERATURE,
                max_output_tokens: GEMINI_MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        debug!("Gemini answered {}", status.as_u16());
        if !status.is_success() {
            return Err(error_status(response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::InvalidResponse(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);
        non_empty(text)
    }
}

async fn error_status(response: reqwest::Response) -> SummaryError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    SummaryError::Api { status, message }
}

fn non_empty(text: Option<String>) -> Result<String, SummaryError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(SummaryError::MissingText),
    }
}
