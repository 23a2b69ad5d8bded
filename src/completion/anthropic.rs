use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::consts::API_KEY_ENV;

use super::Completion;

const API_VERSION: &str = "2023-06-01";

/// A completion client that calls the Anthropic Messages API.
///
/// Sends the prompt as a single user message and returns the text of the
/// first content block. One request per call: no retries, no streaming.
pub struct AnthropicClient {
    http: reqwest::Client,
    config: CompletionConfig,
}

impl AnthropicClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            bail!("no Anthropic API key configured. Set {API_KEY_ENV}.");
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn extract_text(response: ApiResponse) -> Result<String> {
        match response.content.into_iter().next() {
            Some(ContentBlock {
                content_type,
                text: Some(text),
            }) if content_type == "text" => Ok(text),
            _ => bail!("unexpected response format from Anthropic API"),
        }
    }
}

#[async_trait]
impl Completion for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages = [Message {
            role: "user",
            content: prompt,
        }];
        let body = ApiRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: &messages,
        };

        let resp = self
            .http
            .post(&self.config.api_url)
            .header("anthropic-version", API_VERSION)
            .header("x-api-key", &self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .context("failed to reach Anthropic API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Anthropic API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp
            .json()
            .await
            .context("failed to decode Anthropic API response")?;

        if let Some(usage) = &api_resp.usage {
            debug!(
                model = %self.config.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "completion finished"
            );
        }

        Self::extract_text(api_resp)
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [Message<'a>],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
