//! Hosted LLM client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Default Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// LLM errors.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key configured (set GOOGLE_API_KEY)")]
    MissingApiKey,

    #[error("Cannot connect to LLM service at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("LLM service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse LLM response: {0}")]
    ResponseParsing(String),

    #[error("LLM returned no text")]
    EmptyResponse,

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Prompt serialization error: {0}")]
    Prompt(#[from] serde_json::Error),
}

pub type LlmResult<T> = Result<T, LlmError>;

/// Text prompt in, text answer out.
pub trait LlmClient {
    fn generate(&self, prompt: &str) -> LlmResult<String>;
}

/// Gemini `generateContent` client over blocking HTTP.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> LlmResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
            timeout_secs,
        })
    }

    /// Public endpoint, default model and timeout.
    pub fn with_api_key(api_key: Option<String>) -> LlmResult<Self> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key, DEFAULT_TIMEOUT_SECS)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Request body for `generateContent`.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response body from `generateContent`.
#[derive(Deserialize)]
struct GenerateResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Join the text parts of the first candidate.
pub fn parse_generate_response(body: &str) -> LlmResult<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

impl LlmClient for GeminiClient {
    fn generate(&self, prompt: &str) -> LlmResult<String> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                let err = if e.is_connect() {
                    LlmError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.timeout_secs)
                } else {
                    LlmError::HttpClient(e.to_string())
                };
                error!(error = %err, "LLM request failed");
                err
            })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        if !status.is_success() {
            error!(status = status.as_u16(), "LLM service returned an error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_generate_response(&text)
    }
}

/// Mock LLM client for testing. Returns a fixed response and counts calls.
pub struct MockLlmClient {
    response: Result<String, String>,
    calls: std::cell::Cell<usize>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: std::cell::Cell::new(0),
        }
    }

    /// Client whose every call fails with an API error carrying `body`.
    pub fn failing(body: &str) -> Self {
        Self {
            response: Err(body.to_string()),
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _prompt: &str) -> LlmResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.response.clone().map_err(|body| LlmError::Api { status: 500, body })
    }
}
