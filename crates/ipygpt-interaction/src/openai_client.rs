//! OpenAIClient - Direct REST client for the OpenAI Chat Completions API.
//!
//! The base URL defaults to the public endpoint and can be pointed elsewhere
//! with `OPENAI_BASE_URL` (any OpenAI-compatible server works).

use async_trait::async_trait;
use ipygpt_core::{ChatBackend, ChatMessage, ChatRequest, IpygptError, ModelInfo, Result};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Backend implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    base_url: String,
}

impl OpenAIClient {
    /// Creates a client for the given base URL (e.g. `https://api.openai.com/v1`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uses `OPENAI_BASE_URL` when set, the public endpoint otherwise.
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            model = body.model,
            messages = body.messages.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| IpygptError::api(None, format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            IpygptError::api(None, format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ChatBackend for OpenAIClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        self.send_request(&request.api_key, &body).await
    }

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|err| IpygptError::api(None, format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ModelsResponse = response.json().await.map_err(|err| {
            IpygptError::api(None, format!("Failed to parse OpenAI models list: {err}"))
        })?;
        tracing::debug!(count = parsed.data.len(), "fetched models");
        Ok(parsed.data)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    data: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| IpygptError::api(None, "OpenAI API returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<u64>) -> IpygptError {
    let mut message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.clone());

    if message.trim().is_empty() {
        message = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    if let Some(seconds) = retry_after {
        message = format!("{message} (retry after {seconds}s)");
    }

    tracing::warn!(status = status.as_u16(), "OpenAI API returned an error");
    IpygptError::api(Some(status.as_u16()), message)
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<u64> {
    let value = header?.to_str().ok()?;
    // HTTP-date form is ignored
    value.trim().parse::<u64>().ok()
}
