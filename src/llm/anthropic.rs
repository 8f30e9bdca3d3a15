use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::AuthStorage;

use super::{Completion, LanguageModel, Prompt, Provider, TokenUsage};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8192;

/// Calls the Anthropic Messages API.
pub struct AnthropicModel {
    model: String,
    auth: AuthStorage,
    client: reqwest::Client,
}

impl AnthropicModel {
    pub fn new(model: Option<String>, auth: AuthStorage) -> Self {
        Self {
            model: model.unwrap_or_else(|| Provider::Anthropic.default_model().to_string()),
            auth,
            client: reqwest::Client::new(),
        }
    }

    fn build_request<'a>(&'a self, prompt: &'a Prompt) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: prompt.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &prompt.user,
            }],
        }
    }

    fn collect_text(resp: &ApiResponse) -> String {
        resp.content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[async_trait]
impl LanguageModel for AnthropicModel {
    fn provider(&self) -> &str {
        Provider::Anthropic.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<Completion> {
        let api_key = self.auth.api_key(Provider::Anthropic)?.ok_or_else(|| {
            anyhow!(
                "no Anthropic credentials found. Run `costlens login anthropic` or set ANTHROPIC_API_KEY."
            )
        })?;

        let resp = self
            .client
            .post(API_URL)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("x-api-key", &api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Anthropic API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp.json().await?;
        let text = Self::collect_text(&api_resp);
        if text.is_empty() {
            bail!("Anthropic API returned empty response");
        }

        let usage = api_resp.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        });
        if let Some(u) = usage {
            debug!(input = u.input_tokens, output = u.output_tokens, "anthropic token usage");
        }

        Ok(Completion { text, usage })
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
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
